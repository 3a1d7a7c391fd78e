//! Access-control service: the single boundary the host application calls.
//!
//! One instance is constructed at process start and passed by reference to
//! callers (no ambient globals); tests construct their own instances for
//! isolation. The service wires the role registry, the assignment store and
//! the audit trail together, and owns the cascade and audit-emission policy.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use etude_core::{RoleId, UserId};

use crate::audit::{
    AuditAction, AuditEntry, AuditFilter, AuditRecord, AuditStore, InMemoryAuditStore,
    ResourceKind,
};
use crate::assignment::AssignmentStore;
use crate::evaluator;
use crate::evaluator::AccessExplanation;
use crate::permission::{Module, Permission};
use crate::registry::{RegistryError, RoleRegistry};
use crate::role::{NewRole, Role, RoleUpdate};

/// Identity of the administrative caller, recorded in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub name: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl Actor {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            ip_address: None,
            user_agent: None,
        }
    }

    pub fn with_request_metadata(
        mut self,
        ip_address: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        self.ip_address = Some(ip_address.into());
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// The RBAC engine.
///
/// Checks (`can` and friends) are read-only and decided against current
/// registry + assignment state: a role edit is visible to the very next
/// check. Only mutating operations write the audit trail; refused mutations
/// short-circuit before any entry is written.
pub struct AccessControl {
    registry: RoleRegistry,
    assignments: AssignmentStore,
    audit: Arc<dyn AuditStore>,
}

impl AccessControl {
    /// Build an engine with the system catalog seeded and an in-memory trail.
    pub fn new() -> Self {
        Self::with_audit_store(Arc::new(InMemoryAuditStore::new()))
    }

    /// Build an engine against a caller-supplied audit backend.
    pub fn with_audit_store(audit: Arc<dyn AuditStore>) -> Self {
        let registry = RoleRegistry::new();
        registry.seed();
        Self {
            registry,
            assignments: AssignmentStore::new(),
            audit,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permission Checks
    // ─────────────────────────────────────────────────────────────────────────

    /// Can `user_id` exercise `permission` on `module`?
    ///
    /// The gate every protected action calls before proceeding. A user with
    /// no roles is denied everything; an unknown module/permission pairing is
    /// an ordinary `false`, never an error.
    pub fn can(&self, user_id: UserId, module: Module, permission: Permission) -> bool {
        evaluator::allows(&self.roles_of(user_id), module, permission)
    }

    /// True iff every permission passes [`Self::can`].
    pub fn can_all(&self, user_id: UserId, module: Module, permissions: &[Permission]) -> bool {
        evaluator::allows_all(&self.roles_of(user_id), module, permissions)
    }

    /// True iff at least one permission passes [`Self::can`].
    pub fn can_any(&self, user_id: UserId, module: Module, permissions: &[Permission]) -> bool {
        evaluator::allows_any(&self.roles_of(user_id), module, permissions)
    }

    /// Union of everything the user's roles grant on `module`.
    pub fn permissions_of(&self, user_id: UserId, module: Module) -> BTreeSet<Permission> {
        evaluator::granted_permissions(&self.roles_of(user_id), module)
    }

    /// Explain a decision for admin surfaces ("why was this denied?").
    pub fn explain(
        &self,
        user_id: UserId,
        module: Module,
        permission: Permission,
    ) -> AccessExplanation {
        evaluator::explain(&self.roles_of(user_id), module, permission)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Assignments
    // ─────────────────────────────────────────────────────────────────────────

    /// The user's resolved roles.
    ///
    /// Ids that no longer resolve (role deleted concurrently) are silently
    /// dropped.
    pub fn roles_of(&self, user_id: UserId) -> Vec<Role> {
        self.assignments
            .role_ids_of(user_id)
            .into_iter()
            .filter_map(|id| self.registry.get(id))
            .collect()
    }

    /// Grant `role_id` to `user_id`.
    ///
    /// Returns `false` when the role does not exist or the user already holds
    /// it; an audit entry is written only when the set actually changes.
    pub fn assign_role(&self, actor: &Actor, user_id: UserId, role_id: RoleId) -> bool {
        let Some(role) = self.registry.get(role_id) else {
            warn!(%user_id, %role_id, "role assignment refused: unknown role");
            return false;
        };

        if !self.assignments.assign(user_id, role_id) {
            return false;
        }

        info!(%user_id, role = %role.name, "role assigned");
        self.record(
            actor,
            AuditAction::AssignRole,
            ResourceKind::User,
            user_id.to_string(),
            Some(json!({ "role_id": role_id, "role_name": role.name })),
        );
        true
    }

    /// Revoke `role_id` from `user_id`; audited only on an actual change.
    pub fn remove_role(&self, actor: &Actor, user_id: UserId, role_id: RoleId) -> bool {
        if !self.assignments.remove(user_id, role_id) {
            return false;
        }

        let role_name = self.registry.get(role_id).map(|r| r.name);
        info!(%user_id, %role_id, "role removed");
        self.record(
            actor,
            AuditAction::RemoveRole,
            ResourceKind::User,
            user_id.to_string(),
            Some(json!({ "role_id": role_id, "role_name": role_name })),
        );
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Role Administration
    // ─────────────────────────────────────────────────────────────────────────

    pub fn role(&self, role_id: RoleId) -> Option<Role> {
        self.registry.get(role_id)
    }

    pub fn roles(&self) -> Vec<Role> {
        self.registry.list()
    }

    pub fn create_role(&self, actor: &Actor, payload: NewRole) -> Result<Role, RegistryError> {
        let role = self.registry.create(payload)?;

        info!(role = %role.name, "role created");
        self.record(
            actor,
            AuditAction::Create,
            ResourceKind::Role,
            role.id.to_string(),
            Some(json!({ "name": role.name, "level": role.level })),
        );
        Ok(role)
    }

    pub fn update_role(
        &self,
        actor: &Actor,
        role_id: RoleId,
        partial: RoleUpdate,
    ) -> Result<Role, RegistryError> {
        let role = self.registry.update(role_id, partial).inspect_err(|e| {
            warn!(%role_id, error = %e, "role update refused");
        })?;

        info!(role = %role.name, "role updated");
        self.record(
            actor,
            AuditAction::Update,
            ResourceKind::Role,
            role.id.to_string(),
            Some(json!({ "name": role.name })),
        );
        Ok(role)
    }

    /// Delete a custom role and strip it from every user's assignment set.
    pub fn delete_role(&self, actor: &Actor, role_id: RoleId) -> Result<Role, RegistryError> {
        let role = self.registry.delete(role_id).inspect_err(|e| {
            warn!(%role_id, error = %e, "role delete refused");
        })?;

        let affected = self.assignments.remove_role_from_all(role_id);
        info!(role = %role.name, affected_users = affected.len(), "role deleted");
        self.record(
            actor,
            AuditAction::Delete,
            ResourceKind::Role,
            role.id.to_string(),
            Some(json!({ "name": role.name, "affected_users": affected.len() })),
        );
        Ok(role)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Audit
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the trail through the store's filter support.
    pub fn audit_log(&self, filter: &AuditFilter) -> Vec<AuditEntry> {
        self.audit.query(filter)
    }

    /// Administrative mutations land under the admin module in the trail.
    fn record(
        &self,
        actor: &Actor,
        action: AuditAction,
        resource_type: ResourceKind,
        resource_id: String,
        details: Option<serde_json::Value>,
    ) {
        self.audit.append(AuditRecord {
            user_id: actor.user_id,
            user_name: actor.name.clone(),
            action,
            module: Module::Admin,
            resource_type,
            resource_id,
            details,
            ip_address: actor.ip_address.clone(),
            user_agent: actor.user_agent.clone(),
        });
    }
}

impl Default for AccessControl {
    fn default() -> Self {
        Self::new()
    }
}
