// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! Field-weighted fuzzy scoring and the primary/fallback ranking tiers.

use crate::text::{allowed_distance, levenshtein, tokenize};

const SCORE_FIELD_EQUAL: i64 = 200;
const SCORE_FIELD_PREFIX: i64 = 180;
const SCORE_FIELD_SUBSTRING: i64 = 160;
const SCORE_TOKEN_EQUAL: i64 = 200;
const SCORE_TOKEN_PREFIX: i64 = 150;
const SCORE_TOKEN_EDIT_BASE: i64 = 140;
const SCORE_TOKEN_EDIT_STEP: i64 = 20;

const BONUS_PROJECT: i64 = 300;
const BONUS_ROLE: i64 = 250;
const BONUS_SPECIALIZATION: i64 = 250;

const PENALTY_UNMATCHED_TOKEN: i64 = 30;
const PENALTY_PARTIAL_BROADCAST: i64 = 100;

/// One agent as the scorer sees it. All fields are plain profile text; the
/// caller is responsible for having normalized `project`.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub project: String,
    pub role: String,
    pub specialization: String,
    pub github: String,
    pub branch: String,
}

/// Search filter. Empty strings mean "not filtered on".
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub query: String,
    pub project: String,
    pub role: String,
    pub specialization: String,
}

/// A scored candidate, ready for tier selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked {
    pub id: String,
    pub score: i64,
    pub matched_tokens: usize,
    pub total_tokens: usize,
}

impl Ranked {
    /// All query tokens matched (trivially true without a query).
    pub fn is_full_match(&self) -> bool {
        self.matched_tokens == self.total_tokens
    }
}

/// Score a single needle against a single haystack field.
///
/// Returns the best score found, or `None` when nothing in the field comes
/// close enough.
fn field_match(needle: &str, haystack: &str) -> Option<i64> {
    let needle = needle.trim().to_lowercase();
    let haystack = haystack.trim().to_lowercase();
    if needle.is_empty() || haystack.is_empty() {
        return None;
    }

    if haystack == needle {
        return Some(SCORE_FIELD_EQUAL);
    }
    if haystack.starts_with(&needle) {
        return Some(SCORE_FIELD_PREFIX);
    }
    if haystack.contains(&needle) {
        return Some(SCORE_FIELD_SUBSTRING);
    }

    let needle_len = needle.chars().count();
    let mut best: Option<i64> = None;
    for token in tokenize(&haystack) {
        let score = if token == needle {
            Some(SCORE_TOKEN_EQUAL)
        } else if token.starts_with(&needle) || needle.starts_with(&token) {
            Some(SCORE_TOKEN_PREFIX)
        } else {
            let longer = needle_len.max(token.chars().count());
            let d = levenshtein(&needle, &token);
            if d <= allowed_distance(longer) {
                Some(SCORE_TOKEN_EDIT_BASE - SCORE_TOKEN_EDIT_STEP * d as i64)
            } else {
                None
            }
        };
        if let Some(s) = score {
            best = Some(best.map_or(s, |b: i64| b.max(s)));
        }
    }
    best
}

/// Evaluate one candidate against the filter. `None` means rejected.
fn evaluate(candidate: &Candidate, filter: &Filter) -> Option<Ranked> {
    let mut score: i64 = 0;

    // Hard filters: each, when present, must match its profile field.
    if !filter.project.trim().is_empty() {
        score += BONUS_PROJECT + field_match(&filter.project, &candidate.project)?;
    }
    if !filter.role.trim().is_empty() {
        score += BONUS_ROLE + field_match(&filter.role, &candidate.role)?;
    }
    if !filter.specialization.trim().is_empty() {
        score += BONUS_SPECIALIZATION + field_match(&filter.specialization, &candidate.specialization)?;
    }

    let haystack = [
        &candidate.name,
        &candidate.description,
        &candidate.project,
        &candidate.role,
        &candidate.specialization,
        &candidate.github,
        &candidate.branch,
    ];

    let tokens = tokenize(&filter.query);
    let mut matched = 0usize;
    for token in &tokens {
        let best = haystack
            .iter()
            .filter_map(|field| field_match(token, field))
            .max();
        if let Some(s) = best {
            score += s;
            matched += 1;
        }
    }

    if tokens.is_empty() {
        // No query: give any live candidate a nominal score so the stable
        // id ordering applies.
        if haystack.iter().any(|f| !f.trim().is_empty()) {
            score += 1;
        }
    } else {
        if matched == 0 {
            return None;
        }
        score -= PENALTY_UNMATCHED_TOKEN * (tokens.len() - matched) as i64;
    }

    Some(Ranked {
        id: candidate.id.clone(),
        score,
        matched_tokens: matched,
        total_tokens: tokens.len(),
    })
}

/// Rank `candidates` against `filter` and select up to `limit`.
///
/// Candidates that matched every query token (or where no query was given)
/// form the primary tier; partial matches form the fallback tier, returned
/// only when the primary tier is empty and a query was present.
///
/// `demote_partial` applies the broadcast rule: partial matches lose 100
/// points before sorting so they can never outrank a full match.
pub fn rank(
    candidates: &[Candidate],
    filter: &Filter,
    limit: usize,
    demote_partial: bool,
) -> Vec<Ranked> {
    let mut scored: Vec<Ranked> = candidates
        .iter()
        .filter_map(|c| evaluate(c, filter))
        .collect();

    if demote_partial {
        for r in &mut scored {
            if !r.is_full_match() {
                r.score -= PENALTY_PARTIAL_BROADCAST;
            }
        }
    }

    scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));

    let (primary, fallback): (Vec<Ranked>, Vec<Ranked>) =
        scored.into_iter().partition(|r| r.is_full_match());

    let query_given = !tokenize(&filter.query).is_empty();
    let mut selected = if !primary.is_empty() || !query_given {
        primary
    } else {
        fallback
    };
    selected.truncate(limit);
    selected
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
