//! Role model: a named, reusable bundle of per-module permission grants.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use etude_core::{Entity, RoleId, ValueObject};

use crate::permission::{Module, Permission};

// ─────────────────────────────────────────────────────────────────────────────
// Grant Conditions
// ─────────────────────────────────────────────────────────────────────────────

/// Optional constraints attached to a grant.
///
/// These are carried as data for callers (admin UI, downstream policy layers)
/// and are **not** evaluated by the permission check itself: the check
/// interface carries no resource context (owner, team, amount) to evaluate
/// them against. Callers that need them must read the matching grant and
/// enforce in their own context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantConditions {
    /// Restrict to resources owned by the acting user.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub own_only: bool,

    /// Restrict to resources owned by the acting user's team.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub team_only: bool,

    /// Cap on monetary operations, in whole currency units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<i64>,

    /// The grant is provisional pending a separate approval step.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    pub require_approval: bool,
}

impl ValueObject for GrantConditions {}

// ─────────────────────────────────────────────────────────────────────────────
// Role Permission (Grant)
// ─────────────────────────────────────────────────────────────────────────────

/// A module-scoped permission grant inside a role.
///
/// # Invariants
/// - A role holds at most one grant per module (the evaluator looks grants up
///   by module, so duplicates would be ambiguous). Enforced at role
///   creation/update time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    pub module: Module,
    pub permissions: BTreeSet<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<GrantConditions>,
}

impl RolePermission {
    pub fn new(module: Module, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            module,
            permissions: permissions.into_iter().collect(),
            conditions: None,
        }
    }

    /// Grant every permission on `module`.
    pub fn full(module: Module) -> Self {
        Self::new(module, Permission::ALL)
    }

    pub fn with_conditions(mut self, conditions: GrantConditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

impl ValueObject for RolePermission {}

/// Reject grant lists carrying more than one entry for the same module.
pub(crate) fn find_duplicate_module(grants: &[RolePermission]) -> Option<Module> {
    let mut seen = BTreeSet::new();
    for grant in grants {
        if !seen.insert(grant.module) {
            return Some(grant.module);
        }
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────────────────

/// A catalog role.
///
/// # Invariants
/// - `id` and `is_system` never change after creation.
/// - System roles are seeded at startup and are immutable (update/delete fail).
/// - `level` orders roles for display (lower = more privileged); it grants
///   nothing by itself. Checks are grant-based, never level-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub description: String,
    pub level: u8,
    pub grants: Vec<RolePermission>,
    pub is_system: bool,
    pub color: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Find this role's grant for `module`, if any.
    pub fn grant_for(&self, module: Module) -> Option<&RolePermission> {
        self.grants.iter().find(|g| g.module == module)
    }
}

impl Entity for Role {
    type Id = RoleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Payload for creating a custom role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRole {
    pub name: String,
    pub description: String,
    pub level: u8,
    pub grants: Vec<RolePermission>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

/// Partial update for a custom role.
///
/// `id` and `is_system` are deliberately absent: an update can never change
/// a role's identity or promote it to a system role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grants: Option<Vec<RolePermission>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}
