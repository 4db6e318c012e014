#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid User or Password")]
    InvalidUserOrPassword,
    #[error("The user has not logged in")]
    NotLoggedIn,
    #[error("Session token was rejected: {0}")]
    TokenRejected(String),
    #[error("Request rejected with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("Failed to reach the authentication service")]
    Transport(#[source] anyhow::Error),
    #[error("Unexpected Error")]
    UnexpectedError(#[from] anyhow::Error),
}

impl AuthError {
    /// Returns `true` if the service answered and refused the credential, as
    /// opposed to the request not completing
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidUserOrPassword | Self::TokenRejected(_) | Self::Rejected { .. }
        )
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PermissionsError {
    #[error("unrecognized permission rule '{0}'")]
    UnknownRule(String),
    #[error("invalid group '{group}' in permission rule '{rule}'")]
    InvalidGroup { rule: String, group: String },
}
