//! Arguments sent to the authentication service

use secrecy::{ExposeSecret, SecretString};
use std::fmt::Debug;

#[derive(Clone)]
pub struct LoginReqArgs {
    pub username: String,
    pub password: SecretString,
}

impl LoginReqArgs {
    pub fn new<S: Into<String>>(username: S, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Body of the login request. Exposes the password so must never be logged
    pub fn to_json_body(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "password": self.password.expose_secret(),
        })
    }
}

impl Debug for LoginReqArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReqArgs")
            .field("username", &self.username)
            .field("has_password", &!self.password.expose_secret().is_empty())
            .finish()
    }
}
