use crate::token::AuthToken;

use super::Identity;

/// Body returned by the authentication service on a successful login
#[derive(Debug, serde::Deserialize)]
pub struct LoginResponse {
    pub access_token: AuthToken,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: Identity,
}
