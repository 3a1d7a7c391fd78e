//! User-role assignment store: the user→roles relation.
//!
//! Registry-existence validation and audit emission live in the service
//! layer; this store is a pure relation with duplicate suppression.

use std::collections::HashMap;
use std::sync::RwLock;

use etude_core::{RoleId, UserId};

/// In-memory user→roles relation.
#[derive(Debug, Default)]
pub struct AssignmentStore {
    inner: RwLock<HashMap<UserId, Vec<RoleId>>>,
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Add `role_id` to the user's set.
    ///
    /// Returns `true` iff the set actually changed; assigning an already-held
    /// role is a no-op, not an error.
    pub fn assign(&self, user_id: UserId, role_id: RoleId) -> bool {
        let Ok(mut map) = self.inner.write() else {
            return false;
        };
        let roles = map.entry(user_id).or_default();
        if roles.contains(&role_id) {
            return false;
        }
        roles.push(role_id);
        true
    }

    /// Remove `role_id` from the user's set, reporting whether it was held.
    pub fn remove(&self, user_id: UserId, role_id: RoleId) -> bool {
        let Ok(mut map) = self.inner.write() else {
            return false;
        };
        let Some(roles) = map.get_mut(&user_id) else {
            return false;
        };
        let before = roles.len();
        roles.retain(|id| *id != role_id);
        let changed = roles.len() != before;
        if roles.is_empty() {
            map.remove(&user_id);
        }
        changed
    }

    /// The user's current role ids (empty for unknown users).
    pub fn role_ids_of(&self, user_id: UserId) -> Vec<RoleId> {
        match self.inner.read() {
            Ok(map) => map.get(&user_id).cloned().unwrap_or_default(),
            Err(_) => vec![],
        }
    }

    /// Cascade support: strip `role_id` from every user's set.
    ///
    /// Returns the users whose set changed.
    pub fn remove_role_from_all(&self, role_id: RoleId) -> Vec<UserId> {
        let Ok(mut map) = self.inner.write() else {
            return vec![];
        };
        let mut affected = Vec::new();
        for (user_id, roles) in map.iter_mut() {
            let before = roles.len();
            roles.retain(|id| *id != role_id);
            if roles.len() != before {
                affected.push(*user_id);
            }
        }
        map.retain(|_, roles| !roles.is_empty());
        affected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_is_idempotent() {
        let store = AssignmentStore::new();
        let user = UserId::new();
        let role = RoleId::new();

        assert!(store.assign(user, role));
        assert!(!store.assign(user, role));
        assert_eq!(store.role_ids_of(user), vec![role]);
    }

    #[test]
    fn remove_reports_whether_set_changed() {
        let store = AssignmentStore::new();
        let user = UserId::new();
        let role = RoleId::new();

        assert!(!store.remove(user, role));
        store.assign(user, role);
        assert!(store.remove(user, role));
        assert!(store.role_ids_of(user).is_empty());
    }

    #[test]
    fn cascade_strips_role_from_every_user() {
        let store = AssignmentStore::new();
        let shared = RoleId::new();
        let other = RoleId::new();
        let u1 = UserId::new();
        let u2 = UserId::new();
        let u3 = UserId::new();

        store.assign(u1, shared);
        store.assign(u2, shared);
        store.assign(u2, other);
        store.assign(u3, other);

        let mut affected = store.remove_role_from_all(shared);
        affected.sort_by_key(|u| *u.as_uuid());
        let mut expected = vec![u1, u2];
        expected.sort_by_key(|u| *u.as_uuid());
        assert_eq!(affected, expected);

        assert!(store.role_ids_of(u1).is_empty());
        assert_eq!(store.role_ids_of(u2), vec![other]);
        assert_eq!(store.role_ids_of(u3), vec![other]);
    }
}
