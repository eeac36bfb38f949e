// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! Agent profiles: validation, project-name normalization, status and
//! harness enums, and the patch type used by every profile mutation.

use serde::{Deserialize, Serialize};

use crate::error::BrokerError;

/// Work state of an agent. Transitions are driven only by the profile
/// update tool or by `declare_task_complete`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Working,
    Blocked,
    Done,
}

impl AgentStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "idle" => Some(Self::Idle),
            "working" => Some(Self::Working),
            "blocked" => Some(Self::Blocked),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Working => "working",
            Self::Blocked => "blocked",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The external runtime hosting an agent. Selects the push adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Harness {
    Opencode,
    ClaudeCode,
    Codex,
    Generic,
}

impl Harness {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "opencode" => Some(Self::Opencode),
            "claude-code" => Some(Self::ClaudeCode),
            "codex" => Some(Self::Codex),
            "generic" => Some(Self::Generic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opencode => "opencode",
            Self::ClaudeCode => "claude-code",
            Self::Codex => "codex",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mutable description of an agent. Mutated only through
/// [`ProfilePatch`]; `project` is always stored normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Display name; falls back to the agent id when blank.
    #[serde(default)]
    pub name: String,
    pub description: String,
    pub project: String,
    pub role: String,
    pub specialization: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub status: AgentStatus,
}

impl AgentProfile {
    /// Trim every field, normalize the project name, and validate the
    /// required fields.
    pub fn normalized(mut self) -> Result<Self, BrokerError> {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();
        self.role = self.role.trim().to_string();
        self.specialization = self.specialization.trim().to_string();
        self.github = self.github.trim().to_string();
        self.branch = self.branch.trim().to_string();
        self.project = normalize_project(&self.project);

        for (field, value) in [
            ("description", &self.description),
            ("project", &self.project),
            ("role", &self.role),
            ("specialization", &self.specialization),
        ] {
            if value.is_empty() {
                return Err(BrokerError::InvalidArgument(format!("{field} is required")));
            }
        }
        Ok(self)
    }
}

/// Partial profile update. Only non-empty fields are applied.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub project: Option<String>,
    pub role: Option<String>,
    pub specialization: Option<String>,
    pub github: Option<String>,
    pub branch: Option<String>,
    pub status: Option<AgentStatus>,
}

impl ProfilePatch {
    /// Treat a full profile as a patch of its non-empty fields. Used by
    /// `register_or_update_by_session` when the session is already bound.
    pub fn from_profile(profile: &AgentProfile) -> Self {
        let keep = |s: &str| {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        };
        Self {
            name: keep(&profile.name),
            description: keep(&profile.description),
            project: keep(&profile.project),
            role: keep(&profile.role),
            specialization: keep(&profile.specialization),
            github: keep(&profile.github),
            branch: keep(&profile.branch),
            status: None,
        }
    }

    /// Apply the non-empty fields onto `profile`. The result still needs
    /// [`AgentProfile::normalized`].
    pub fn apply_to(&self, profile: &mut AgentProfile) {
        let set = |target: &mut String, source: &Option<String>| {
            if let Some(v) = source {
                if !v.trim().is_empty() {
                    *target = v.trim().to_string();
                }
            }
        };
        set(&mut profile.name, &self.name);
        set(&mut profile.description, &self.description);
        set(&mut profile.project, &self.project);
        set(&mut profile.role, &self.role);
        set(&mut profile.specialization, &self.specialization);
        set(&mut profile.github, &self.github);
        set(&mut profile.branch, &self.branch);
        if let Some(status) = self.status {
            profile.status = status;
        }
    }
}

/// Canonical project name: lowercase, spaces and underscores become
/// hyphens, camel/Pascal boundaries are hyphen-split, hyphen runs collapse,
/// and leading/trailing hyphens are trimmed. Idempotent.
pub fn normalize_project(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev: Option<char> = None;
    for c in input.trim().chars() {
        match c {
            ' ' | '_' | '-' => out.push('-'),
            _ if c.is_uppercase() => {
                if prev.map_or(false, |p| p.is_lowercase() || p.is_ascii_digit()) {
                    out.push('-');
                }
                out.extend(c.to_lowercase());
            }
            _ => out.extend(c.to_lowercase()),
        }
        prev = Some(c);
    }

    let mut collapsed = String::with_capacity(out.len());
    let mut last_was_hyphen = false;
    for c in out.chars() {
        if c == '-' {
            if !last_was_hyphen {
                collapsed.push('-');
            }
            last_was_hyphen = true;
        } else {
            collapsed.push(c);
            last_was_hyphen = false;
        }
    }
    collapsed.trim_matches('-').to_string()
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_profile() -> AgentProfile {
        AgentProfile {
            name: "worker".to_string(),
            description: "does work".to_string(),
            project: "Civitas".to_string(),
            role: "backend engineer".to_string(),
            specialization: "go-backend".to_string(),
            ..AgentProfile::default()
        }
    }

    // ── normalize_project ──────────────────────────────────────────────────

    #[test]
    fn lowercases_and_hyphenates_spaces() {
        assert_eq!(normalize_project("My Project"), "my-project");
    }

    #[test]
    fn underscores_become_hyphens() {
        assert_eq!(normalize_project("my_project"), "my-project");
    }

    #[test]
    fn camel_case_boundaries_split() {
        assert_eq!(normalize_project("relayMesh"), "relay-mesh");
        assert_eq!(normalize_project("RelayMesh"), "relay-mesh");
    }

    #[test]
    fn digit_to_upper_boundary_splits() {
        assert_eq!(normalize_project("v2Beta"), "v2-beta");
    }

    #[test]
    fn hyphen_runs_collapse() {
        assert_eq!(normalize_project("a--b___c  d"), "a-b-c-d");
    }

    #[test]
    fn edge_hyphens_trimmed() {
        assert_eq!(normalize_project("-project-"), "project");
        assert_eq!(normalize_project("  _project_  "), "project");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["My Project", "relayMesh", "a--B__c", "V2Beta X", "plain"] {
            let once = normalize_project(raw);
            assert_eq!(normalize_project(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn consecutive_uppercase_stays_together() {
        // An acronym run has no lowercase-to-uppercase boundary.
        assert_eq!(normalize_project("HTTPServer"), "httpserver");
    }

    // ── AgentProfile::normalized ───────────────────────────────────────────

    #[test]
    fn normalized_trims_and_normalizes() {
        let p = AgentProfile {
            name: "  worker  ".to_string(),
            project: "My Project".to_string(),
            ..valid_profile()
        };
        let p = p.normalized().unwrap();
        assert_eq!(p.name, "worker");
        assert_eq!(p.project, "my-project");
    }

    #[test]
    fn missing_required_field_is_invalid() {
        for field in ["description", "project", "role", "specialization"] {
            let mut p = valid_profile();
            match field {
                "description" => p.description = "  ".to_string(),
                "project" => p.project = String::new(),
                "role" => p.role = String::new(),
                _ => p.specialization = String::new(),
            }
            let err = p.normalized().unwrap_err();
            assert!(err.to_string().contains(field), "{err}");
        }
    }

    #[test]
    fn blank_name_is_allowed() {
        let p = AgentProfile {
            name: String::new(),
            ..valid_profile()
        };
        assert!(p.normalized().is_ok());
    }

    #[test]
    fn default_status_is_idle() {
        assert_eq!(valid_profile().status, AgentStatus::Idle);
    }

    // ── ProfilePatch ───────────────────────────────────────────────────────

    #[test]
    fn patch_applies_only_non_empty_fields() {
        let mut p = valid_profile().normalized().unwrap();
        let patch = ProfilePatch {
            specialization: Some("distributed-systems".to_string()),
            role: Some("   ".to_string()),
            ..ProfilePatch::default()
        };
        patch.apply_to(&mut p);
        assert_eq!(p.specialization, "distributed-systems");
        assert_eq!(p.role, "backend engineer");
    }

    #[test]
    fn patch_can_set_status() {
        let mut p = valid_profile().normalized().unwrap();
        let patch = ProfilePatch {
            status: Some(AgentStatus::Working),
            ..ProfilePatch::default()
        };
        patch.apply_to(&mut p);
        assert_eq!(p.status, AgentStatus::Working);
    }

    #[test]
    fn from_profile_skips_blank_fields() {
        let patch = ProfilePatch::from_profile(&AgentProfile {
            name: String::new(),
            github: "  ".to_string(),
            ..valid_profile()
        });
        assert!(patch.name.is_none());
        assert!(patch.github.is_none());
        assert_eq!(patch.role.as_deref(), Some("backend engineer"));
        assert!(patch.status.is_none());
    }

    // ── enums ──────────────────────────────────────────────────────────────

    #[test]
    fn status_parse_round_trips() {
        for s in ["idle", "working", "blocked", "done"] {
            assert_eq!(AgentStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(AgentStatus::parse("sleeping").is_none());
    }

    #[test]
    fn harness_parse_round_trips() {
        for s in ["opencode", "claude-code", "codex", "generic"] {
            assert_eq!(Harness::parse(s).unwrap().as_str(), s);
        }
        assert!(Harness::parse("emacs").is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        let v = serde_json::to_value(AgentStatus::Done).unwrap();
        assert_eq!(v, serde_json::json!("done"));
    }

    #[test]
    fn harness_serializes_kebab_case() {
        let v = serde_json::to_value(Harness::ClaudeCode).unwrap();
        assert_eq!(v, serde_json::json!("claude-code"));
    }
}
