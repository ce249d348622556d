//! Identity types shared across CIRS services
//!
//! The identity provider is an external collaborator: it verifies a bearer
//! token and resolves it to a subject id. The subject's role comes from the
//! `profiles` table, defaulting to [`Role::Citizen`] when no profile exists.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated subject as reported by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Stable subject id assigned by the identity provider
    pub id: Uuid,
    /// Contact email if the provider exposes one
    #[serde(default)]
    pub email: Option<String>,
}

/// Access role attached to a subject
///
/// Stored as lowercase text in the `profiles` table. Unknown or missing
/// values resolve to `Citizen`, the least-privileged role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Citizen,
    Operator,
    Admin,
}

impl Role {
    /// Parse a stored role string, defaulting to `Citizen`
    pub fn from_db(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "operator" => Role::Operator,
            "admin" => Role::Admin,
            _ => Role::Citizen,
        }
    }

    /// Role name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Operator => "operator",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
