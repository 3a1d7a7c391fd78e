//! Append-only audit trail of administrative mutations.
//!
//! Entries are immutable once appended; queries are read-only filters over
//! the full log, newest first. The store is a trait seam so deployments can
//! swap in a durable backend without touching the service layer.

use std::collections::VecDeque;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use etude_core::{AuditEntryId, UserId};

use crate::permission::Module;

// ─────────────────────────────────────────────────────────────────────────────
// Entry Model
// ─────────────────────────────────────────────────────────────────────────────

/// Administrative action recorded in the trail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    AssignRole,
    RemoveRole,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::AssignRole => "assign_role",
            AuditAction::RemoveRole => "remove_role",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of resource an entry refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Role,
    User,
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ResourceKind::Role => f.write_str("role"),
            ResourceKind::User => f.write_str("user"),
        }
    }
}

/// A fully formed, immutable trail entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    /// The acting user.
    pub user_id: UserId,
    pub user_name: String,
    pub action: AuditAction,
    pub module: Module,
    pub resource_type: ResourceKind,
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Draft of an entry as produced by the service layer.
///
/// The store assigns `id` and `timestamp` on append; callers cannot fabricate
/// either.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub user_id: UserId,
    pub user_name: String,
    pub action: AuditAction,
    pub module: Module,
    pub resource_type: ResourceKind,
    pub resource_id: String,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Query Filter
// ─────────────────────────────────────────────────────────────────────────────

/// Filters for querying the trail. All present filters are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    /// Exact match on the *actor*.
    pub user_id: Option<UserId>,
    pub module: Option<Module>,
    pub action: Option<AuditAction>,
    /// Inclusive lower bound on `timestamp`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `timestamp`.
    pub to: Option<DateTime<Utc>>,
    /// Cap on the number of (newest-first) results.
    pub limit: Option<usize>,
}

impl AuditFilter {
    fn matches(&self, entry: &AuditEntry) -> bool {
        if self.user_id.is_some_and(|u| u != entry.user_id) {
            return false;
        }
        if self.module.is_some_and(|m| m != entry.module) {
            return false;
        }
        if self.action.is_some_and(|a| a != entry.action) {
            return false;
        }
        if self.from.is_some_and(|t| entry.timestamp < t) {
            return false;
        }
        if self.to.is_some_and(|t| entry.timestamp > t) {
            return false;
        }
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// Append + filtered read over the trail.
///
/// Implementations must never block or fail the caller's primary operation:
/// a storage problem is logged and swallowed, not propagated.
pub trait AuditStore: Send + Sync {
    fn append(&self, record: AuditRecord);

    /// Matching entries, newest first.
    fn query(&self, filter: &AuditFilter) -> Vec<AuditEntry>;
}

/// In-memory append-only store.
///
/// Unbounded by default; `with_retention` caps the log by evicting oldest
/// entries so a long-lived process cannot grow without bound.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<VecDeque<AuditEntry>>,
    retention: Option<usize>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            retention: None,
        }
    }

    /// Keep at most `max_entries`, evicting oldest first.
    pub fn with_retention(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            retention: Some(max_entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, record: AuditRecord) {
        let entry = AuditEntry {
            id: AuditEntryId::new(),
            user_id: record.user_id,
            user_name: record.user_name,
            action: record.action,
            module: record.module,
            resource_type: record.resource_type,
            resource_id: record.resource_id,
            details: record.details,
            ip_address: record.ip_address,
            user_agent: record.user_agent,
            timestamp: Utc::now(),
        };

        match self.entries.write() {
            Ok(mut entries) => {
                entries.push_back(entry);
                if let Some(max) = self.retention {
                    while entries.len() > max {
                        entries.pop_front();
                    }
                }
            }
            Err(_) => warn!("audit store lock poisoned, entry dropped"),
        }
    }

    fn query(&self, filter: &AuditFilter) -> Vec<AuditEntry> {
        let entries = match self.entries.read() {
            Ok(entries) => entries,
            Err(_) => return vec![],
        };

        // Entries arrive in append order; walking in reverse keeps ties on
        // equal timestamps newest-first through the stable sort.
        let mut matched: Vec<AuditEntry> = entries
            .iter()
            .rev()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = filter.limit {
            matched.truncate(limit);
        }
        matched
    }
}
