// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! The broker owns every piece of mutable state: the agents map, the
//! session index, the shared-context store, and each agent's inbound queue.
//! All of it lives behind one coarse mutex which is never held across an
//! await point — transport I/O happens outside the lock, and the delivery
//! callback reacquires it per message.
//!
//! Messages take exactly one path into a queue: `send` publishes to the
//! recipient's subject, the transport re-delivers to the subscription
//! callback, and the callback appends. `send` never touches the queue
//! directly, so in-memory arrival always mirrors what the durable stream
//! saw.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use relay_discovery::{rank, Candidate, Filter};
use relay_transport::{MessageCallback, Subscription, Transport};

use crate::error::BrokerError;
use crate::ids;
use crate::message::Message;
use crate::profile::{AgentProfile, AgentStatus, Harness, ProfilePatch, normalize_project};

/// Subject prefix for per-agent delivery.
pub const SUBJECT_PREFIX: &str = "relay.agent.";
/// Wildcard covering every agent subject; the stream is declared over this.
pub const SUBJECT_WILDCARD: &str = "relay.agent.>";

pub const DEFAULT_FETCH_LIMIT: usize = 10;
pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const DEFAULT_FIND_LIMIT: usize = 20;
pub const DEFAULT_BROADCAST_LIMIT: usize = 20;

/// Poll granularity of `wait_for_agents`.
const WAIT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// How many stream entries `message_status` scans before giving up.
const STATUS_SCAN_LIMIT: usize = 512;

pub fn agent_subject(id: &str) -> String {
    format!("{SUBJECT_PREFIX}{id}")
}

struct AgentState {
    id: String,
    profile: AgentProfile,
    subject: String,
    session_id: Option<String>,
    harness: Option<Harness>,
    queue: VecDeque<Message>,
    last_seen: DateTime<Utc>,
    last_fetch: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct State {
    agents: HashMap<String, AgentState>,
    subs: HashMap<String, Subscription>,
    session_index: HashMap<String, String>,
    context: HashMap<String, BTreeMap<String, String>>,
}

/// Full profile view returned by list/find/update operations.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSnapshot {
    pub id: String,
    pub name: String,
    pub description: String,
    pub project: String,
    pub role: String,
    pub specialization: String,
    pub github: String,
    pub branch: String,
    pub status: AgentStatus,
    pub last_seen: DateTime<Utc>,
    pub last_fetch: Option<DateTime<Utc>>,
    pub unread_messages: usize,
}

/// Compact row returned by `get_team_status` and `wait_for_agents`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusRow {
    pub id: String,
    pub name: String,
    pub role: String,
    pub project: String,
    pub status: AgentStatus,
    pub last_seen: DateTime<Utc>,
    pub last_fetch: Option<DateTime<Utc>>,
    pub unread_messages: usize,
}

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub messages: Vec<Message>,
    pub remaining: usize,
}

/// Target selection for `broadcast`. Empty strings mean unfiltered.
#[derive(Debug, Clone, Default)]
pub struct BroadcastFilter {
    pub query: String,
    pub project: String,
    pub role: String,
    pub specialization: String,
    /// 0 means the default limit.
    pub limit: usize,
}

/// Result of a broadcast fan-out. On a mid-fanout failure `messages` holds
/// the envelopes already sent and `error` the failure; nothing is rolled
/// back.
#[derive(Debug)]
pub struct BroadcastOutcome {
    pub messages: Vec<Message>,
    pub error: Option<BrokerError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Readiness {
    pub ready: bool,
    pub total_agents: usize,
    pub done_count: usize,
    pub pending_agents: Vec<String>,
}

/// Where a message currently is, as far as the broker can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    /// Still sitting in the recipient's in-memory queue.
    Pending,
    /// No longer queued but present in the durable stream — it was fetched,
    /// or the registry restarted since.
    Delivered,
}

impl DeliveryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Delivered => "delivered",
        }
    }
}

pub struct Broker {
    transport: Arc<dyn Transport>,
    state: Arc<Mutex<State>>,
}

impl Broker {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// The delivery callback holds only the agent id and a weak state
    /// reference; the agent record can be removed without invalidating the
    /// closure, and a vanished broker turns deliveries into no-ops.
    fn delivery_callback(&self, id: String) -> MessageCallback {
        let weak: Weak<Mutex<State>> = Arc::downgrade(&self.state);
        Arc::new(move |bytes: Vec<u8>| {
            let Ok(message) = serde_json::from_slice::<Message>(&bytes) else {
                debug!(agent = %id, "dropping malformed envelope");
                return;
            };
            if message.to != id {
                return;
            }
            let Some(state) = weak.upgrade() else { return };
            let mut st = match state.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(agent) = st.agents.get_mut(&id) {
                agent.queue.push_back(message);
            }
        })
    }

    // ── Registration ─────────────────────────────────────────────────────

    /// Validate the profile, subscribe the new agent's subject, and insert
    /// it into the registry. A subscribe failure aborts the registration.
    pub async fn register_agent(&self, profile: AgentProfile) -> Result<String, BrokerError> {
        let mut profile = profile.normalized()?;
        let id = ids::agent_id();
        if profile.name.is_empty() {
            profile.name = id.clone();
        }
        let subject = agent_subject(&id);

        let callback = self.delivery_callback(id.clone());
        let sub = self.transport.subscribe(&subject, callback).await?;

        let mut st = self.lock();
        let now = Utc::now();
        st.agents.insert(
            id.clone(),
            AgentState {
                id: id.clone(),
                profile,
                subject,
                session_id: None,
                harness: None,
                queue: VecDeque::new(),
                last_seen: now,
                last_fetch: None,
            },
        );
        st.subs.insert(id.clone(), sub);
        debug!(agent = %id, "registered");
        Ok(id)
    }

    /// Idempotent registration keyed by session id. An already-indexed
    /// session patches the existing agent and returns `(id, false)`; a
    /// stale index entry is dropped and the agent registered fresh.
    pub async fn register_or_update_by_session(
        &self,
        session_id: &str,
        profile: AgentProfile,
    ) -> Result<(String, bool), BrokerError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(BrokerError::SessionRequired);
        }

        {
            let mut st = self.lock();
            if let Some(existing) = st.session_index.get(session_id).cloned() {
                if let Some(agent) = st.agents.get_mut(&existing) {
                    let patch = ProfilePatch::from_profile(&profile);
                    let mut updated = agent.profile.clone();
                    patch.apply_to(&mut updated);
                    agent.profile = updated.normalized()?;
                    agent.session_id = Some(session_id.to_string());
                    agent.last_seen = Utc::now();
                    return Ok((existing, false));
                }
                // The indexed agent is gone; forget the entry and fall
                // through to fresh registration.
                st.session_index.remove(session_id);
            }
        }

        let id = self.register_agent(profile).await?;
        let mut st = self.lock();
        if let Some(agent) = st.agents.get_mut(&id) {
            agent.session_id = Some(session_id.to_string());
        }
        st.session_index.insert(session_id.to_string(), id.clone());
        Ok((id, true))
    }

    pub fn update_profile(
        &self,
        id: &str,
        patch: &ProfilePatch,
    ) -> Result<AgentSnapshot, BrokerError> {
        let mut st = self.lock();
        let agent = st
            .agents
            .get_mut(id)
            .ok_or_else(|| BrokerError::AgentNotFound(id.to_string()))?;
        let mut updated = agent.profile.clone();
        patch.apply_to(&mut updated);
        agent.profile = updated.normalized()?;
        agent.last_seen = Utc::now();
        Ok(snapshot(agent))
    }

    // ── Session bindings ─────────────────────────────────────────────────

    /// Bind `session_id` to the agent. `None` harness preserves whatever
    /// harness was recorded before.
    pub fn bind_session(
        &self,
        id: &str,
        session_id: &str,
        harness: Option<Harness>,
    ) -> Result<(), BrokerError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(BrokerError::SessionRequired);
        }
        let mut st = self.lock();
        if !st.agents.contains_key(id) {
            return Err(BrokerError::AgentNotFound(id.to_string()));
        }
        // A session binds to one agent; clear it off any previous owner.
        if let Some(previous) = st.session_index.insert(session_id.to_string(), id.to_string()) {
            if previous != id {
                if let Some(old) = st.agents.get_mut(&previous) {
                    old.session_id = None;
                }
            }
        }
        if let Some(agent) = st.agents.get_mut(id) {
            agent.session_id = Some(session_id.to_string());
            if let Some(h) = harness {
                agent.harness = Some(h);
            }
            agent.last_seen = Utc::now();
        }
        Ok(())
    }

    pub fn session_binding(
        &self,
        id: &str,
    ) -> Result<(Option<String>, Option<Harness>), BrokerError> {
        let st = self.lock();
        let agent = st
            .agents
            .get(id)
            .ok_or_else(|| BrokerError::AgentNotFound(id.to_string()))?;
        Ok((agent.session_id.clone(), agent.harness))
    }

    /// Session ids currently bound to some agent. Used by the resolver to
    /// skip sessions that are already taken.
    pub fn bound_sessions(&self) -> std::collections::HashSet<String> {
        self.lock().session_index.keys().cloned().collect()
    }

    // ── Messaging ────────────────────────────────────────────────────────

    /// Publish a message to the recipient's subject. The envelope reaches
    /// the recipient's queue only through the transport callback.
    pub async fn send(&self, from: &str, to: &str, body: &str) -> Result<Message, BrokerError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(BrokerError::InvalidArgument(
                "message body is required".to_string(),
            ));
        }

        let subject = {
            let st = self.lock();
            if !st.agents.contains_key(from) {
                return Err(BrokerError::SenderUnknown(from.to_string()));
            }
            let target = st
                .agents
                .get(to)
                .ok_or_else(|| BrokerError::TargetUnknown(to.to_string()))?;
            target.subject.clone()
        };

        let message = Message {
            id: ids::message_id(),
            from: from.to_string(),
            to: to.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
        };
        let payload = serde_json::to_vec(&message)
            .map_err(|e| BrokerError::Internal(format!("encoding envelope: {e}")))?;

        self.transport.publish(&subject, payload).await?;

        let mut st = self.lock();
        if let Some(sender) = st.agents.get_mut(from) {
            sender.last_seen = Utc::now();
        }
        Ok(message)
    }

    /// Drain up to `max` messages FIFO. 0 means the default limit.
    pub fn fetch(&self, id: &str, max: usize) -> Result<FetchResult, BrokerError> {
        let max = if max == 0 { DEFAULT_FETCH_LIMIT } else { max };
        let mut st = self.lock();
        let agent = st
            .agents
            .get_mut(id)
            .ok_or_else(|| BrokerError::AgentNotFound(id.to_string()))?;
        let n = max.min(agent.queue.len());
        let messages: Vec<Message> = agent.queue.drain(..n).collect();
        let now = Utc::now();
        agent.last_seen = now;
        agent.last_fetch = Some(now);
        Ok(FetchResult {
            remaining: agent.queue.len(),
            messages,
        })
    }

    /// Read an agent's messages back out of the durable stream, newest
    /// first internally, returned oldest-first. Entries for other agents
    /// and unparseable records are skipped.
    ///
    /// This is a pure stream read keyed by the envelope's `to` field — it
    /// works even for ids the current registry has never seen, which is
    /// what makes history usable after a broker restart.
    pub async fn fetch_history(&self, id: &str, max: usize) -> Result<Vec<Message>, BrokerError> {
        let max = if max == 0 { DEFAULT_HISTORY_LIMIT } else { max };
        let info = self.transport.stream_info().await?;
        if info.messages == 0 {
            return Ok(Vec::new());
        }

        let mut collected = Vec::new();
        let mut seq = info.last_seq;
        while seq >= info.first_seq && collected.len() < max {
            if let Some(bytes) = self.transport.message_by_seq(seq).await? {
                if let Ok(message) = serde_json::from_slice::<Message>(&bytes) {
                    if message.to == id {
                        collected.push(message);
                    }
                }
            }
            if seq == 0 {
                break;
            }
            seq -= 1;
        }
        collected.reverse();
        Ok(collected)
    }

    /// Fan a message out to every agent the filter selects, best match
    /// first, excluding the sender. A send failure halts the fan-out; the
    /// already-sent envelopes are returned alongside the error.
    pub async fn broadcast(
        &self,
        from: &str,
        body: &str,
        filter: &BroadcastFilter,
    ) -> Result<BroadcastOutcome, BrokerError> {
        if body.trim().is_empty() {
            return Err(BrokerError::InvalidArgument(
                "message body is required".to_string(),
            ));
        }
        let candidates = {
            let st = self.lock();
            if !st.agents.contains_key(from) {
                return Err(BrokerError::SenderUnknown(from.to_string()));
            }
            let mut all: Vec<Candidate> = st
                .agents
                .values()
                .filter(|a| a.id != from)
                .map(to_candidate)
                .collect();
            all.sort_by(|a, b| a.id.cmp(&b.id));
            all
        };

        let limit = if filter.limit == 0 {
            DEFAULT_BROADCAST_LIMIT
        } else {
            filter.limit
        };
        let ranked = rank(
            &candidates,
            &Filter {
                query: filter.query.clone(),
                project: filter.project.clone(),
                role: filter.role.clone(),
                specialization: filter.specialization.clone(),
            },
            limit,
            true,
        );

        let mut messages = Vec::new();
        for target in ranked {
            match self.send(from, &target.id, body).await {
                Ok(message) => messages.push(message),
                Err(err) => {
                    warn!(target = %target.id, error = %err, "broadcast halted");
                    return Ok(BroadcastOutcome {
                        messages,
                        error: Some(err),
                    });
                }
            }
        }
        Ok(BroadcastOutcome {
            messages,
            error: None,
        })
    }

    pub fn unread_count(&self, id: &str) -> Result<usize, BrokerError> {
        let st = self.lock();
        st.agents
            .get(id)
            .map(|a| a.queue.len())
            .ok_or_else(|| BrokerError::AgentNotFound(id.to_string()))
    }

    /// Where a message currently is: queued, or only in the durable stream.
    pub async fn message_status(&self, message_id: &str) -> Result<DeliveryState, BrokerError> {
        {
            let st = self.lock();
            for agent in st.agents.values() {
                if agent.queue.iter().any(|m| m.id == message_id) {
                    return Ok(DeliveryState::Pending);
                }
            }
        }

        let info = self.transport.stream_info().await?;
        if info.messages > 0 {
            let mut seq = info.last_seq;
            let mut scanned = 0usize;
            while seq >= info.first_seq && scanned < STATUS_SCAN_LIMIT {
                if let Some(bytes) = self.transport.message_by_seq(seq).await? {
                    if let Ok(message) = serde_json::from_slice::<Message>(&bytes) {
                        if message.id == message_id {
                            return Ok(DeliveryState::Delivered);
                        }
                    }
                }
                scanned += 1;
                if seq == 0 {
                    break;
                }
                seq -= 1;
            }
        }
        Err(BrokerError::MessageNotFound(message_id.to_string()))
    }

    // ── Discovery and status ─────────────────────────────────────────────

    pub fn list_agents(&self) -> Vec<AgentSnapshot> {
        let st = self.lock();
        let mut agents: Vec<AgentSnapshot> = st.agents.values().map(snapshot).collect();
        agents.sort_by(|a, b| a.id.cmp(&b.id));
        agents
    }

    /// Rank all agents against `filter` and return the selected snapshots
    /// in rank order. 0 means the default limit.
    pub fn find_agents(&self, filter: &Filter, limit: usize) -> Vec<AgentSnapshot> {
        let limit = if limit == 0 { DEFAULT_FIND_LIMIT } else { limit };
        let candidates = {
            let st = self.lock();
            let mut all: Vec<Candidate> = st.agents.values().map(to_candidate).collect();
            all.sort_by(|a, b| a.id.cmp(&b.id));
            all
        };
        let ranked = rank(&candidates, filter, limit, false);
        let st = self.lock();
        ranked
            .iter()
            .filter_map(|r| st.agents.get(&r.id).map(snapshot))
            .collect()
    }

    /// Status rows for every agent, optionally filtered by a project name.
    /// The filter matches when either normalized name contains the other.
    pub fn team_status(&self, project: Option<&str>) -> Vec<StatusRow> {
        let filter = project
            .map(normalize_project)
            .filter(|p| !p.is_empty());
        let st = self.lock();
        let mut rows: Vec<StatusRow> = st
            .agents
            .values()
            .filter(|a| match &filter {
                None => true,
                Some(p) => {
                    a.profile.project.contains(p.as_str()) || p.contains(&a.profile.project)
                }
            })
            .map(|a| StatusRow {
                id: a.id.clone(),
                name: a.profile.name.clone(),
                role: a.profile.role.clone(),
                project: a.profile.project.clone(),
                status: a.profile.status,
                last_seen: a.last_seen,
                last_fetch: a.last_fetch,
                unread_messages: a.queue.len(),
            })
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        rows
    }

    /// Poll `team_status` every two seconds until `min_count` agents show
    /// up for the project or the timeout elapses.
    pub async fn wait_for_agents(
        &self,
        project: &str,
        min_count: usize,
        timeout: Duration,
    ) -> (bool, Vec<StatusRow>) {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let rows = self.team_status(Some(project));
            if rows.len() >= min_count {
                return (true, rows);
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return (false, rows);
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    pub fn heartbeat(&self, id: &str) -> Result<DateTime<Utc>, BrokerError> {
        let mut st = self.lock();
        let agent = st
            .agents
            .get_mut(id)
            .ok_or_else(|| BrokerError::AgentNotFound(id.to_string()))?;
        agent.last_seen = Utc::now();
        Ok(agent.last_seen)
    }

    pub fn declare_done(&self, id: &str) -> Result<(), BrokerError> {
        let mut st = self.lock();
        let agent = st
            .agents
            .get_mut(id)
            .ok_or_else(|| BrokerError::AgentNotFound(id.to_string()))?;
        agent.profile.status = AgentStatus::Done;
        agent.last_seen = Utc::now();
        Ok(())
    }

    /// Ready iff at least one agent carries the project and every one of
    /// them is done.
    pub fn check_readiness(&self, project: &str) -> Result<Readiness, BrokerError> {
        let project = normalize_project(project);
        if project.is_empty() {
            return Err(BrokerError::InvalidArgument("project is required".to_string()));
        }
        let st = self.lock();
        let mut total = 0usize;
        let mut done = 0usize;
        let mut pending = Vec::new();
        for agent in st.agents.values() {
            if agent.profile.project != project {
                continue;
            }
            total += 1;
            if agent.profile.status == AgentStatus::Done {
                done += 1;
            } else {
                pending.push(agent.id.clone());
            }
        }
        pending.sort();
        Ok(Readiness {
            ready: total > 0 && done == total,
            total_agents: total,
            done_count: done,
            pending_agents: pending,
        })
    }

    // ── Shared context ───────────────────────────────────────────────────

    /// Store a value under `(project, key)`. An empty value deletes the
    /// key; returns the stored value, or `None` after a delete.
    pub fn shared_context_set(
        &self,
        project: &str,
        key: &str,
        value: &str,
    ) -> Result<Option<String>, BrokerError> {
        let project = normalize_project(project);
        if project.is_empty() {
            return Err(BrokerError::InvalidArgument("project is required".to_string()));
        }
        let key = key.trim();
        if key.is_empty() {
            return Err(BrokerError::InvalidArgument("key is required".to_string()));
        }
        let value = value.trim();

        let mut st = self.lock();
        if value.is_empty() {
            if let Some(entries) = st.context.get_mut(&project) {
                entries.remove(key);
                if entries.is_empty() {
                    st.context.remove(&project);
                }
            }
            return Ok(None);
        }
        st.context
            .entry(project)
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(Some(value.to_string()))
    }

    pub fn shared_context_get(
        &self,
        project: &str,
        key: &str,
    ) -> Result<Option<String>, BrokerError> {
        let project = normalize_project(project);
        if project.is_empty() {
            return Err(BrokerError::InvalidArgument("project is required".to_string()));
        }
        let key = key.trim();
        if key.is_empty() {
            return Err(BrokerError::InvalidArgument("key is required".to_string()));
        }
        let st = self.lock();
        Ok(st.context.get(&project).and_then(|m| m.get(key)).cloned())
    }

    /// A copy of the project's entries, sorted by key.
    pub fn shared_context_list(
        &self,
        project: &str,
    ) -> Result<BTreeMap<String, String>, BrokerError> {
        let project = normalize_project(project);
        if project.is_empty() {
            return Err(BrokerError::InvalidArgument("project is required".to_string()));
        }
        let st = self.lock();
        Ok(st.context.get(&project).cloned().unwrap_or_default())
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Remove agents not seen within `max_age`, unsubscribing their
    /// subjects. Returns the removed ids.
    pub fn prune_stale(&self, max_age: Duration) -> Vec<String> {
        let max_age = chrono::Duration::from_std(max_age)
            .unwrap_or_else(|_| chrono::Duration::days(3650));
        let cutoff = Utc::now() - max_age;

        let mut dropped_subs = Vec::new();
        let removed: Vec<String> = {
            let mut st = self.lock();
            let stale: Vec<String> = st
                .agents
                .values()
                .filter(|a| a.last_seen < cutoff)
                .map(|a| a.id.clone())
                .collect();
            for id in &stale {
                st.agents.remove(id);
                if let Some(sub) = st.subs.remove(id) {
                    dropped_subs.push(sub);
                }
                st.session_index.retain(|_, agent_id| *agent_id != *id);
            }
            stale
        };
        // Unsubscribe outside the lock; the transport may do work here.
        for sub in dropped_subs {
            sub.unsubscribe();
        }
        if !removed.is_empty() {
            debug!(count = removed.len(), "pruned stale agents");
        }
        removed
    }

    /// Unsubscribe everything and close the transport.
    pub async fn shutdown(&self) -> Result<(), BrokerError> {
        let subs: Vec<Subscription> = {
            let mut st = self.lock();
            st.subs.drain().map(|(_, sub)| sub).collect()
        };
        for sub in subs {
            sub.unsubscribe();
        }
        self.transport.close().await?;
        Ok(())
    }
}

fn to_candidate(agent: &AgentState) -> Candidate {
    Candidate {
        id: agent.id.clone(),
        name: agent.profile.name.clone(),
        description: agent.profile.description.clone(),
        project: agent.profile.project.clone(),
        role: agent.profile.role.clone(),
        specialization: agent.profile.specialization.clone(),
        github: agent.profile.github.clone(),
        branch: agent.profile.branch.clone(),
    }
}

fn snapshot(agent: &AgentState) -> AgentSnapshot {
    AgentSnapshot {
        id: agent.id.clone(),
        name: agent.profile.name.clone(),
        description: agent.profile.description.clone(),
        project: agent.profile.project.clone(),
        role: agent.profile.role.clone(),
        specialization: agent.profile.specialization.clone(),
        github: agent.profile.github.clone(),
        branch: agent.profile.branch.clone(),
        status: agent.profile.status,
        last_seen: agent.last_seen,
        last_fetch: agent.last_fetch,
        unread_messages: agent.queue.len(),
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
