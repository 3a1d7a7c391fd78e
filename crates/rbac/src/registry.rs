//! Role registry: owns the catalog of system and custom roles.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use thiserror::Error;
use tracing::warn;

use etude_core::RoleId;

use crate::catalog::SystemRole;
use crate::role::{find_duplicate_module, NewRole, Role, RoleUpdate};

/// Failure taxonomy for registry mutations.
///
/// These are values returned to the caller, never panics. `NotFound` and
/// `SystemRole` stay distinguishable for logs; host applications surface both
/// to end users as a generic "operation not permitted".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("role not found")]
    NotFound,

    #[error("system roles are immutable")]
    SystemRole,

    #[error("duplicate grant for module '{0}'")]
    DuplicateGrant(crate::permission::Module),
}

/// In-memory catalog of roles keyed by id.
///
/// Writes take the exclusive lock; reads share it. A poisoned lock degrades to
/// deny/empty rather than panic, so a permission check can never crash a
/// protected code path.
#[derive(Debug, Default)]
pub struct RoleRegistry {
    inner: RwLock<HashMap<RoleId, Role>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Seed the system role catalog.
    ///
    /// Idempotent: roles already present are left untouched, so calling this
    /// twice never duplicates or resets a role.
    pub fn seed(&self) {
        let seeded_at = Utc::now();
        if let Ok(mut map) = self.inner.write() {
            for sys in SystemRole::ALL {
                map.entry(sys.id()).or_insert_with(|| sys.definition(seeded_at));
            }
        }
    }

    /// Create a custom role with a fresh id and timestamps.
    pub fn create(&self, payload: NewRole) -> Result<Role, RegistryError> {
        if let Some(module) = find_duplicate_module(&payload.grants) {
            return Err(RegistryError::DuplicateGrant(module));
        }

        let now = Utc::now();
        let role = Role {
            id: RoleId::new(),
            name: payload.name,
            description: payload.description,
            level: payload.level,
            grants: payload.grants,
            is_system: false,
            color: payload.color,
            icon: payload.icon,
            created_at: now,
            updated_at: now,
        };

        match self.inner.write() {
            Ok(mut map) => {
                map.insert(role.id, role.clone());
                Ok(role)
            }
            Err(_) => {
                warn!("role registry lock poisoned, create refused");
                Err(RegistryError::NotFound)
            }
        }
    }

    /// Merge a partial update into a custom role and bump `updated_at`.
    ///
    /// `id` and `is_system` can never change: the payload has no way to carry
    /// them.
    pub fn update(&self, role_id: RoleId, partial: RoleUpdate) -> Result<Role, RegistryError> {
        if let Some(grants) = &partial.grants {
            if let Some(module) = find_duplicate_module(grants) {
                return Err(RegistryError::DuplicateGrant(module));
            }
        }

        let mut map = self.inner.write().map_err(|_| {
            warn!("role registry lock poisoned, update refused");
            RegistryError::NotFound
        })?;

        let role = map.get_mut(&role_id).ok_or(RegistryError::NotFound)?;
        if role.is_system {
            return Err(RegistryError::SystemRole);
        }

        if let Some(name) = partial.name {
            role.name = name;
        }
        if let Some(description) = partial.description {
            role.description = description;
        }
        if let Some(level) = partial.level {
            role.level = level;
        }
        if let Some(grants) = partial.grants {
            role.grants = grants;
        }
        if let Some(color) = partial.color {
            role.color = color;
        }
        if let Some(icon) = partial.icon {
            role.icon = icon;
        }
        role.updated_at = Utc::now();

        Ok(role.clone())
    }

    /// Remove a custom role, returning it for the caller's cascade + audit.
    pub fn delete(&self, role_id: RoleId) -> Result<Role, RegistryError> {
        let mut map = self.inner.write().map_err(|_| {
            warn!("role registry lock poisoned, delete refused");
            RegistryError::NotFound
        })?;

        let is_system = match map.get(&role_id) {
            None => return Err(RegistryError::NotFound),
            Some(role) => role.is_system,
        };
        if is_system {
            return Err(RegistryError::SystemRole);
        }

        map.remove(&role_id).ok_or(RegistryError::NotFound)
    }

    pub fn get(&self, role_id: RoleId) -> Option<Role> {
        let map = self.inner.read().ok()?;
        map.get(&role_id).cloned()
    }

    pub fn contains(&self, role_id: RoleId) -> bool {
        self.inner
            .read()
            .map(|map| map.contains_key(&role_id))
            .unwrap_or(false)
    }

    /// All roles, ordered for display (level, then name).
    pub fn list(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => return vec![],
        };
        roles.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));
        roles
    }
}
