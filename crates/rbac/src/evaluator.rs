//! Permission evaluation over a set of resolved roles.
//!
//! These are pure functions: no IO, no caching, no side effects. Checks are
//! existential over the role set (union semantics) and grant-based only;
//! a role's `level` never feeds into a decision. Conditions attached to a
//! matching grant are reported, not enforced (see `GrantConditions`).

use std::collections::BTreeSet;

use serde::Serialize;

use crate::permission::{Module, Permission};
use crate::role::Role;

/// Does any role grant `permission` on `module`?
pub fn allows(roles: &[Role], module: Module, permission: Permission) -> bool {
    roles
        .iter()
        .any(|role| role.grant_for(module).is_some_and(|g| g.allows(permission)))
}

/// Conjunction: every permission passes [`allows`].
pub fn allows_all(roles: &[Role], module: Module, permissions: &[Permission]) -> bool {
    permissions.iter().all(|p| allows(roles, module, *p))
}

/// Disjunction: at least one permission passes [`allows`].
pub fn allows_any(roles: &[Role], module: Module, permissions: &[Permission]) -> bool {
    permissions.iter().any(|p| allows(roles, module, *p))
}

/// Union of everything the roles grant on `module`.
pub fn granted_permissions(roles: &[Role], module: Module) -> BTreeSet<Permission> {
    let mut union = BTreeSet::new();
    for role in roles {
        if let Some(grant) = role.grant_for(module) {
            union.extend(grant.permissions.iter().copied());
        }
    }
    union
}

// ─────────────────────────────────────────────────────────────────────────────
// Decision Explanation
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an access decision.
///
/// Answers "why was this allowed/denied?" for admin surfaces, without
/// changing the decision itself.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    pub module: Module,
    pub permission: Permission,
    pub granted: bool,

    /// Names of the roles whose grant carries the permission.
    pub granting_roles: Vec<String>,

    /// Conditions attached to the granting grants (informational: the check
    /// itself does not evaluate them).
    pub attached_conditions: Vec<crate::role::GrantConditions>,

    /// Everything the user's roles grant on the module.
    pub effective_permissions: BTreeSet<Permission>,

    /// Human-readable reason for the decision.
    pub reason: String,
}

/// Explain an access decision over the resolved role set.
pub fn explain(roles: &[Role], module: Module, permission: Permission) -> AccessExplanation {
    let mut granting_roles = Vec::new();
    let mut attached_conditions = Vec::new();

    for role in roles {
        if let Some(grant) = role.grant_for(module) {
            if grant.allows(permission) {
                granting_roles.push(role.name.clone());
                if let Some(conditions) = &grant.conditions {
                    attached_conditions.push(conditions.clone());
                }
            }
        }
    }

    let effective_permissions = granted_permissions(roles, module);
    let granted = !granting_roles.is_empty();

    let reason = if roles.is_empty() {
        "user holds no roles".to_string()
    } else if granted {
        format!(
            "granted '{permission}' on '{module}' by: {}",
            granting_roles.join(", ")
        )
    } else {
        format!(
            "no role grants '{permission}' on '{module}' (effective: {:?})",
            effective_permissions
                .iter()
                .map(Permission::as_str)
                .collect::<Vec<_>>()
        )
    };

    AccessExplanation {
        module,
        permission,
        granted,
        granting_roles,
        attached_conditions,
        effective_permissions,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SystemRole;
    use crate::role::{GrantConditions, RolePermission};
    use chrono::Utc;
    use etude_core::RoleId;

    fn role_with(grants: Vec<RolePermission>) -> Role {
        let now = Utc::now();
        Role {
            id: RoleId::new(),
            name: "Test".to_string(),
            description: String::new(),
            level: 5,
            grants,
            is_system: false,
            color: String::new(),
            icon: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_role_set_denies_everything() {
        for module in Module::ALL {
            for permission in Permission::ALL {
                assert!(!allows(&[], module, permission));
            }
        }
    }

    #[test]
    fn allow_is_existential_across_roles() {
        let reader = role_with(vec![RolePermission::new(Module::Crm, [Permission::Read])]);
        let writer = role_with(vec![RolePermission::new(Module::Crm, [Permission::Update])]);
        let roles = vec![reader, writer];

        assert!(allows(&roles, Module::Crm, Permission::Read));
        assert!(allows(&roles, Module::Crm, Permission::Update));
        assert!(!allows(&roles, Module::Crm, Permission::Delete));
        assert!(!allows(&roles, Module::Admin, Permission::Read));
    }

    #[test]
    fn batch_checks_match_their_algebra() {
        let roles = vec![role_with(vec![RolePermission::new(
            Module::Dossiers,
            [Permission::Read, Permission::Update],
        )])];
        let ps = [Permission::Read, Permission::Update, Permission::Delete];

        assert_eq!(
            allows_all(&roles, Module::Dossiers, &ps),
            ps.iter().all(|p| allows(&roles, Module::Dossiers, *p))
        );
        assert_eq!(
            allows_any(&roles, Module::Dossiers, &ps),
            ps.iter().any(|p| allows(&roles, Module::Dossiers, *p))
        );
        assert!(!allows_all(&roles, Module::Dossiers, &ps));
        assert!(allows_any(&roles, Module::Dossiers, &ps));
    }

    #[test]
    fn granted_permissions_is_the_union() {
        let roles = vec![
            role_with(vec![RolePermission::new(
                Module::Comptabilite,
                [Permission::Read],
            )]),
            role_with(vec![RolePermission::new(
                Module::Comptabilite,
                [Permission::Export, Permission::Approve],
            )]),
        ];

        let union = granted_permissions(&roles, Module::Comptabilite);
        assert_eq!(
            union,
            BTreeSet::from([Permission::Read, Permission::Export, Permission::Approve])
        );
    }

    #[test]
    fn conditions_do_not_restrict_the_decision() {
        // A conditioned grant still answers true: conditions are data for the
        // caller, not policy evaluated here.
        let roles = vec![role_with(vec![RolePermission::new(
            Module::Dossiers,
            [Permission::Read],
        )
        .with_conditions(GrantConditions {
            own_only: true,
            ..GrantConditions::default()
        })])];

        assert!(allows(&roles, Module::Dossiers, Permission::Read));

        let explanation = explain(&roles, Module::Dossiers, Permission::Read);
        assert!(explanation.granted);
        assert_eq!(explanation.attached_conditions.len(), 1);
        assert!(explanation.attached_conditions[0].own_only);
    }

    #[test]
    fn lower_level_does_not_inherit_higher_level_grants() {
        // Clerc sits below Notaire in the hierarchy but never gains `sign`
        // from it: decisions are grant-based, not level-based.
        let now = Utc::now();
        let clerc = SystemRole::Clerc.definition(now);

        assert!(SystemRole::Notaire.definition(now).level < clerc.level);
        assert!(!allows(
            &[clerc],
            Module::Actes,
            Permission::Sign
        ));
    }

    #[test]
    fn explain_names_the_granting_roles() {
        let now = Utc::now();
        let notaire = SystemRole::Notaire.definition(now);
        let viewer = SystemRole::Viewer.definition(now);
        let roles = vec![notaire, viewer];

        let granted = explain(&roles, Module::Actes, Permission::Sign);
        assert!(granted.granted);
        assert_eq!(granted.granting_roles, vec!["Notaire".to_string()]);

        let denied = explain(&roles, Module::Admin, Permission::Delete);
        assert!(!denied.granted);
        assert!(denied.granting_roles.is_empty());
        assert!(denied.reason.contains("no role grants"));
    }
}
