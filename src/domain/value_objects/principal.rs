//! Principals as seen by workspace role assignments

use serde::{Deserialize, Serialize};

/// Kind of directory object a role is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PrincipalKind {
    #[default]
    User,
    Group,
    ServicePrincipal,
    ServicePrincipalProfile,
}

impl PrincipalKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Self::User),
            "group" => Some(Self::Group),
            "serviceprincipal" | "service-principal" | "app" => Some(Self::ServicePrincipal),
            "serviceprincipalprofile" => Some(Self::ServicePrincipalProfile),
            _ => None,
        }
    }
}

/// A directory object identified by its object ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: PrincipalKind,
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "userDetails", default, skip_serializing_if = "Option::is_none")]
    pub user_details: Option<UserDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>, kind: PrincipalKind) -> Self {
        Self {
            id: id.into(),
            kind,
            display_name: None,
            user_details: None,
        }
    }

    pub fn user_principal_name(&self) -> Option<&str> {
        self.user_details
            .as_ref()
            .and_then(|d| d.user_principal_name.as_deref())
    }

    /// Every identifier another service may report for this principal.
    /// Power BI names users by UPN, everything else by object ID.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids = vec![self.id.as_str()];
        ids.extend(self.user_principal_name());
        ids
    }

    /// Display name when the API returned one, otherwise the object ID
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}
