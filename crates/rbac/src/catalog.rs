//! Seeded system roles and their grant tables.
//!
//! The seven system roles mirror the staffing of a French étude notariale.
//! Their grant tables are authorization policy, not configuration: they are
//! hard-coded here and immutable at runtime (only assignable/removable).

use chrono::{DateTime, Utc};
use uuid::uuid;

use etude_core::RoleId;

use crate::permission::Module;
use crate::permission::Permission::{Approve, Create, Delete, Export, Import, Read, Sign, Update};
use crate::role::{GrantConditions, Role, RolePermission};

/// The closed set of seeded system roles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SystemRole {
    SuperAdmin,
    Notaire,
    Clerc,
    Secretaire,
    Comptable,
    Stagiaire,
    Viewer,
}

impl SystemRole {
    pub const ALL: [SystemRole; 7] = [
        SystemRole::SuperAdmin,
        SystemRole::Notaire,
        SystemRole::Clerc,
        SystemRole::Secretaire,
        SystemRole::Comptable,
        SystemRole::Stagiaire,
        SystemRole::Viewer,
    ];

    /// Stable, well-known identifier for this system role.
    ///
    /// Fixed ids let deployments reference system roles in configuration and
    /// keep assignments valid across restarts.
    pub const fn id(self) -> RoleId {
        match self {
            SystemRole::SuperAdmin => {
                RoleId::from_uuid(uuid!("00000000-0000-7000-8000-000000000001"))
            }
            SystemRole::Notaire => {
                RoleId::from_uuid(uuid!("00000000-0000-7000-8000-000000000002"))
            }
            SystemRole::Clerc => RoleId::from_uuid(uuid!("00000000-0000-7000-8000-000000000003")),
            SystemRole::Secretaire => {
                RoleId::from_uuid(uuid!("00000000-0000-7000-8000-000000000004"))
            }
            SystemRole::Comptable => {
                RoleId::from_uuid(uuid!("00000000-0000-7000-8000-000000000005"))
            }
            SystemRole::Stagiaire => {
                RoleId::from_uuid(uuid!("00000000-0000-7000-8000-000000000006"))
            }
            SystemRole::Viewer => RoleId::from_uuid(uuid!("00000000-0000-7000-8000-000000000007")),
        }
    }

    /// Build the seeded role definition, stamped with `seeded_at`.
    pub fn definition(self, seeded_at: DateTime<Utc>) -> Role {
        let (name, description, level, color, icon, grants) = match self {
            SystemRole::SuperAdmin => (
                "Super Admin",
                "Accès complet à tous les modules",
                1,
                "#d32f2f",
                "shield",
                Module::ALL.iter().map(|m| RolePermission::full(*m)).collect(),
            ),
            SystemRole::Notaire => (
                "Notaire",
                "Officier public : gestion complète des dossiers et signature des actes",
                2,
                "#1565c0",
                "stamp",
                vec![
                    RolePermission::new(Module::Dashboard, [Read]),
                    RolePermission::new(Module::Clients, [Read, Create, Update, Delete, Export]),
                    RolePermission::new(Module::Crm, [Read, Create, Update, Export]),
                    RolePermission::new(
                        Module::Dossiers,
                        [Read, Create, Update, Delete, Export, Approve],
                    ),
                    RolePermission::new(
                        Module::Actes,
                        [Read, Create, Update, Delete, Export, Approve, Sign],
                    ),
                    RolePermission::new(Module::Agenda, [Read, Create, Update, Delete]),
                    RolePermission::new(
                        Module::Documents,
                        [Read, Create, Update, Delete, Export, Import],
                    ),
                    RolePermission::new(Module::Comptabilite, [Read, Export, Approve]),
                    RolePermission::new(Module::Facturation, [Read, Create, Update, Approve]),
                    RolePermission::new(Module::Rapports, [Read, Export]),
                    RolePermission::new(Module::Archives, [Read, Export]),
                    RolePermission::new(Module::Settings, [Read]),
                ],
            ),
            SystemRole::Clerc => (
                "Clerc",
                "Rédaction des actes et instruction des dossiers, sous validation du notaire",
                3,
                "#2e7d32",
                "pen",
                vec![
                    RolePermission::new(Module::Dashboard, [Read]),
                    RolePermission::new(Module::Clients, [Read, Create, Update]),
                    RolePermission::new(Module::Dossiers, [Read, Create, Update, Export]),
                    RolePermission::new(Module::Actes, [Read, Create, Update]).with_conditions(
                        GrantConditions {
                            require_approval: true,
                            ..GrantConditions::default()
                        },
                    ),
                    RolePermission::new(Module::Agenda, [Read, Create, Update]),
                    RolePermission::new(Module::Documents, [Read, Create, Update, Import]),
                    RolePermission::new(Module::Rapports, [Read]),
                    RolePermission::new(Module::Archives, [Read]),
                ],
            ),
            SystemRole::Secretaire => (
                "Secrétaire",
                "Accueil, agenda et suivi administratif des clients",
                4,
                "#7b1fa2",
                "calendar",
                vec![
                    RolePermission::new(Module::Dashboard, [Read]),
                    RolePermission::new(Module::Clients, [Read, Create, Update]),
                    RolePermission::new(Module::Crm, [Read, Create, Update]),
                    RolePermission::new(Module::Dossiers, [Read, Create]),
                    RolePermission::new(Module::Agenda, [Read, Create, Update, Delete]),
                    RolePermission::new(Module::Documents, [Read, Create]),
                    RolePermission::new(Module::Facturation, [Read]),
                ],
            ),
            SystemRole::Comptable => (
                "Comptable",
                "Comptabilité de l'étude et facturation",
                4,
                "#ef6c00",
                "calculator",
                vec![
                    RolePermission::new(Module::Dashboard, [Read]),
                    RolePermission::new(Module::Clients, [Read]),
                    RolePermission::new(Module::Dossiers, [Read]),
                    RolePermission::new(
                        Module::Comptabilite,
                        [Read, Create, Update, Export, Import],
                    ),
                    RolePermission::new(Module::Facturation, [Read, Create, Update, Export])
                        .with_conditions(GrantConditions {
                            max_amount: Some(50_000),
                            ..GrantConditions::default()
                        }),
                    RolePermission::new(Module::Rapports, [Read, Export]),
                ],
            ),
            SystemRole::Stagiaire => (
                "Stagiaire",
                "Consultation encadrée, limitée aux dossiers confiés",
                5,
                "#00838f",
                "school",
                vec![
                    RolePermission::new(Module::Dashboard, [Read]),
                    RolePermission::new(Module::Clients, [Read]).with_conditions(GrantConditions {
                        team_only: true,
                        ..GrantConditions::default()
                    }),
                    RolePermission::new(Module::Dossiers, [Read, Update]).with_conditions(
                        GrantConditions {
                            own_only: true,
                            ..GrantConditions::default()
                        },
                    ),
                    RolePermission::new(Module::Actes, [Read]).with_conditions(GrantConditions {
                        own_only: true,
                        ..GrantConditions::default()
                    }),
                    RolePermission::new(Module::Documents, [Read]),
                ],
            ),
            SystemRole::Viewer => (
                "Viewer",
                "Consultation seule",
                6,
                "#546e7a",
                "eye",
                vec![
                    RolePermission::new(Module::Dashboard, [Read]),
                    RolePermission::new(Module::Clients, [Read]),
                    RolePermission::new(Module::Dossiers, [Read]),
                    RolePermission::new(Module::Actes, [Read]),
                    RolePermission::new(Module::Rapports, [Read]),
                ],
            ),
        };

        Role {
            id: self.id(),
            name: name.to_string(),
            description: description.to_string(),
            level,
            grants,
            is_system: true,
            color: color.to_string(),
            icon: icon.to_string(),
            created_at: seeded_at,
            updated_at: seeded_at,
        }
    }
}
