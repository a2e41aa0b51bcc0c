use serde::{Deserialize, Serialize};

use super::{AuthError, AuthProvider, Identity};

#[derive(Debug, Serialize)]
struct CredentialsDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionDto {
    user_id: String,
    access_token: String,
}

/// JSON auth client for `POST {base}/auth/{register,login,logout}`.
pub struct HttpAuthProvider {
    base_url: String,
}

impl HttpAuthProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    fn submit(&self, endpoint: &str, email: &str, password: &str) -> Result<Identity, AuthError> {
        let url = format!("{}/auth/{}", self.base_url, endpoint);
        let response = ureq::post(&url)
            .send_json(CredentialsDto { email, password })
            .map_err(map_auth_error)?;
        let session: SessionDto = response
            .into_json()
            .map_err(|e| AuthError::Service(e.to_string()))?;
        Ok(Identity::new(&session.user_id, email, session.access_token))
    }
}

impl AuthProvider for HttpAuthProvider {
    fn register(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.submit("register", email, password)
    }

    fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.submit("login", email, password)
    }

    fn logout(&self, session: &Identity) -> Result<(), AuthError> {
        let url = format!("{}/auth/logout", self.base_url);
        ureq::post(&url)
            .set("Authorization", &format!("Bearer {}", session.access_token))
            .call()
            .map_err(map_auth_error)?;
        Ok(())
    }
}

fn map_auth_error(err: ureq::Error) -> AuthError {
    match err {
        ureq::Error::Status(400 | 401 | 403, _) => AuthError::InvalidCredentials,
        ureq::Error::Status(409, _) => AuthError::EmailTaken,
        ureq::Error::Status(status, response) => {
            let message = response.into_string().unwrap_or_default();
            AuthError::Service(format!("{} {}", status, message.trim()))
        }
        ureq::Error::Transport(transport) => AuthError::Network(transport.to_string()),
    }
}
