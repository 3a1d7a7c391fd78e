//! Closed permission and module vocabularies.
//!
//! Both sets are deliberately closed enums rather than free-form strings so
//! that grant tables and checks are exhaustive at compile time. Extending
//! either set is a redeploy, not a runtime operation.

use serde::{Deserialize, Serialize};

/// An atomic capability that can be granted on a module.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// View/list resources.
    Read,
    /// Create new resources.
    Create,
    /// Modify existing resources.
    Update,
    /// Remove resources.
    Delete,
    /// Export resources (PDF, spreadsheets, archives).
    Export,
    /// Import resources from external files.
    Import,
    /// Approve a pending operation (second pair of eyes).
    Approve,
    /// Legally sign an acte.
    Sign,
}

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Permission; 8] = [
        Permission::Read,
        Permission::Create,
        Permission::Update,
        Permission::Delete,
        Permission::Export,
        Permission::Import,
        Permission::Approve,
        Permission::Sign,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Create => "create",
            Permission::Update => "update",
            Permission::Delete => "delete",
            Permission::Export => "export",
            Permission::Import => "import",
            Permission::Approve => "approve",
            Permission::Sign => "sign",
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A functional area of the office application that permissions are scoped to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Dashboard,
    Clients,
    Crm,
    Dossiers,
    Actes,
    Agenda,
    Documents,
    Comptabilite,
    Facturation,
    Rapports,
    Archives,
    Admin,
    Settings,
}

impl Module {
    /// Every module, in declaration order.
    pub const ALL: [Module; 13] = [
        Module::Dashboard,
        Module::Clients,
        Module::Crm,
        Module::Dossiers,
        Module::Actes,
        Module::Agenda,
        Module::Documents,
        Module::Comptabilite,
        Module::Facturation,
        Module::Rapports,
        Module::Archives,
        Module::Admin,
        Module::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Clients => "clients",
            Module::Crm => "crm",
            Module::Dossiers => "dossiers",
            Module::Actes => "actes",
            Module::Agenda => "agenda",
            Module::Documents => "documents",
            Module::Comptabilite => "comptabilite",
            Module::Facturation => "facturation",
            Module::Rapports => "rapports",
            Module::Archives => "archives",
            Module::Admin => "admin",
            Module::Settings => "settings",
        }
    }
}

impl core::fmt::Display for Module {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_snake_case_strings() {
        assert_eq!(serde_json::to_string(&Permission::Sign).unwrap(), "\"sign\"");
        assert_eq!(
            serde_json::to_string(&Module::Comptabilite).unwrap(),
            "\"comptabilite\""
        );

        let m: Module = serde_json::from_str("\"dossiers\"").unwrap();
        assert_eq!(m, Module::Dossiers);
    }

    #[test]
    fn display_matches_wire_form() {
        for p in Permission::ALL {
            let wire = serde_json::to_string(&p).unwrap();
            assert_eq!(wire, format!("\"{p}\""));
        }
        for m in Module::ALL {
            let wire = serde_json::to_string(&m).unwrap();
            assert_eq!(wire, format!("\"{m}\""));
        }
    }
}
