//! JWT claims types

use serde::{Deserialize, Serialize};

/// Claims carried by a Lingodesk access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email
    pub email: Option<String>,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}
