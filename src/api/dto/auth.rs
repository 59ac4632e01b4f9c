/*
 * Responsibility
 * - credentials in, signed token out
 */
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("remember_me", &self.remember_me)
            .finish_non_exhaustive()
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() || self.username.len() > 50 {
            return Err("username must be 1..=50 chars");
        }
        if self.password.len() < 4 || self.password.len() > 100 {
            return Err("password must be 4..=100 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct JwtToken {
    pub id_token: String,
}
