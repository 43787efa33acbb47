//! Customer and admin sessions.
//!
//! Sessions are created from login responses and destroyed at logout. The two
//! kinds are independent: an admin may also be signed in as a customer.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Role, UserId};

/// An opaque bearer token issued by the backend.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// A signed-in customer, as returned by `auth/login` and `auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    #[serde(default, alias = "_id", alias = "userId", skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub username: String,
    pub token: BearerToken,
    #[serde(default)]
    pub role: Role,
}

/// The `admin` object inside an admin login response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminProfile {
    pub username: String,
    #[serde(default)]
    pub role: Role,
}

/// Response body of `auth/admin-login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminLoginResponse {
    pub token: BearerToken,
    pub admin: AdminProfile,
}

/// Errors turning a login response into a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Access denied. Not an admin.")]
    NotAdmin,
}

/// A signed-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub username: String,
    pub token: BearerToken,
    pub role: Role,
}

impl TryFrom<AdminLoginResponse> for AdminSession {
    type Error = SessionError;

    fn try_from(response: AdminLoginResponse) -> Result<Self, Self::Error> {
        if response.admin.role != Role::Admin {
            return Err(SessionError::NotAdmin);
        }
        Ok(Self {
            username: response.admin.username,
            token: response.token,
            role: Role::Admin,
        })
    }
}
