//! Cross-component scenarios against the full engine.

use proptest::prelude::*;

use etude_core::UserId;
use etude_rbac::{
    AccessControl, Actor, AuditAction, AuditFilter, Module, NewRole, Permission, RolePermission,
    RoleUpdate, SystemRole,
};

fn actor() -> Actor {
    // Logging init is a no-op after the first test that reaches it.
    etude_observability::init();
    Actor::new(UserId::new(), "Maître Leroy").with_request_metadata("192.0.2.7", "etude-web/2.1")
}

fn crm_reader() -> NewRole {
    NewRole {
        name: "Négociateur".to_string(),
        description: "Suivi CRM".to_string(),
        level: 5,
        grants: vec![RolePermission::new(Module::Crm, [Permission::Read])],
        color: "#9e9e9e".to_string(),
        icon: "handshake".to_string(),
    }
}

#[test]
fn notaire_signs_actes_but_cannot_touch_admin() {
    let ac = AccessControl::new();
    let admin = actor();
    let u1 = UserId::new();

    assert!(ac.assign_role(&admin, u1, SystemRole::Notaire.id()));

    assert!(ac.can(u1, Module::Actes, Permission::Sign));
    assert!(!ac.can(u1, Module::Admin, Permission::Delete));
}

#[test]
fn custom_role_grants_exactly_what_it_says_until_deleted() {
    let ac = AccessControl::new();
    let admin = actor();
    let u2 = UserId::new();

    let role = ac.create_role(&admin, crm_reader()).unwrap();
    ac.assign_role(&admin, u2, role.id);

    assert!(ac.can(u2, Module::Crm, Permission::Read));
    assert!(!ac.can(u2, Module::Crm, Permission::Update));

    ac.delete_role(&admin, role.id).unwrap();
    assert!(!ac.can(u2, Module::Crm, Permission::Read));
}

#[test]
fn cascade_delete_revokes_for_every_assignee() {
    let ac = AccessControl::new();
    let admin = actor();
    let users: Vec<UserId> = (0..3).map(|_| UserId::new()).collect();

    let role = ac.create_role(&admin, crm_reader()).unwrap();
    for user in &users {
        ac.assign_role(&admin, *user, role.id);
    }
    for user in &users {
        assert!(ac.can(*user, Module::Crm, Permission::Read));
    }

    ac.delete_role(&admin, role.id).unwrap();
    for user in &users {
        assert!(!ac.can(*user, Module::Crm, Permission::Read));
        assert!(ac.roles_of(*user).is_empty());
    }
}

#[test]
fn audit_trail_contains_only_successful_mutations() {
    let ac = AccessControl::new();
    let admin = actor();

    // Three successful role mutations.
    let role = ac.create_role(&admin, crm_reader()).unwrap();
    ac.update_role(
        &admin,
        role.id,
        RoleUpdate {
            description: Some("Négociation immobilière".to_string()),
            ..RoleUpdate::default()
        },
    )
    .unwrap();
    ac.delete_role(&admin, role.id).unwrap();

    // One refused attempt on a system role: short-circuits before the trail.
    ac.update_role(
        &admin,
        SystemRole::SuperAdmin.id(),
        RoleUpdate {
            name: Some("Hacked".to_string()),
            ..RoleUpdate::default()
        },
    )
    .unwrap_err();

    let entries = ac.audit_log(&AuditFilter {
        module: Some(Module::Admin),
        ..AuditFilter::default()
    });

    let actions: Vec<AuditAction> = entries.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Delete, AuditAction::Update, AuditAction::Create],
        "newest first, refused attempt absent"
    );
    assert!(entries.iter().all(|e| e.user_name == "Maître Leroy"));
}

#[test]
fn can_all_and_can_any_match_their_definitions() {
    let ac = AccessControl::new();
    let admin = actor();
    let user = UserId::new();
    ac.assign_role(&admin, user, SystemRole::Clerc.id());

    let module = Module::Dossiers;
    let ps = [Permission::Read, Permission::Update, Permission::Delete];

    let conjunction = ps.iter().all(|p| ac.can(user, module, *p));
    let disjunction = ps.iter().any(|p| ac.can(user, module, *p));

    assert_eq!(ac.can_all(user, module, &ps), conjunction);
    assert_eq!(ac.can_any(user, module, &ps), disjunction);
    assert!(!conjunction);
    assert!(disjunction);
}

#[test]
fn hierarchy_level_never_implies_permissions() {
    let ac = AccessControl::new();
    let admin = actor();
    let user = UserId::new();

    // Stagiaire sits below Notaire in display order; it must not inherit
    // anything from roles above it.
    ac.assign_role(&admin, user, SystemRole::Stagiaire.id());

    assert!(!ac.can(user, Module::Actes, Permission::Sign));
    assert!(!ac.can(user, Module::Comptabilite, Permission::Read));
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Property: adding a role never shrinks a user's effective permission
    /// set on any module (union semantics).
    #[test]
    fn assigning_roles_is_monotone(
        indices in prop::collection::vec(0usize..SystemRole::ALL.len(), 1..5)
    ) {
        let ac = AccessControl::new();
        let admin = actor();
        let user = UserId::new();

        let mut previous: Vec<std::collections::BTreeSet<Permission>> =
            Module::ALL.iter().map(|m| ac.permissions_of(user, *m)).collect();

        for index in indices {
            ac.assign_role(&admin, user, SystemRole::ALL[index].id());

            let current: Vec<std::collections::BTreeSet<Permission>> =
                Module::ALL.iter().map(|m| ac.permissions_of(user, *m)).collect();

            for (before, after) in previous.iter().zip(current.iter()) {
                prop_assert!(after.is_superset(before));
            }
            previous = current;
        }
    }
}
