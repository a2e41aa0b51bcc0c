mod http;
mod session;
mod watch;

pub use http::HttpAuthProvider;
pub use session::{clear_session, load_session, save_session};
pub use watch::SessionWatch;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A signed-in user. The `user_id` is lowercased on construction so every
/// store path derived from it is stable regardless of how the backend cases
/// its identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
}

impl Identity {
    pub fn new(user_id: &str, email: &str, access_token: String) -> Self {
        Self {
            user_id: user_id.to_lowercase(),
            email: email.to_string(),
            access_token,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("An account with this email already exists.")]
    EmailTaken,
    #[error("Sign-in service error: {0}")]
    Service(String),
    #[error("Network error: {0}")]
    Network(String),
}

/// Identity service. Calls block, so the app runs them on worker threads
/// and applies the results from its completion channel.
pub trait AuthProvider: Send + Sync {
    fn register(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
    fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
    /// Best-effort token revocation. The local session is gone either way.
    fn logout(&self, session: &Identity) -> Result<(), AuthError>;
}
