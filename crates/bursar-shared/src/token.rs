use secrecy::{ExposeSecret, SecretString};

/// Opaque credential issued by the authentication service. The empty token is
/// the unauthenticated state
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    pub fn empty() -> Self {
        Self(SecretString::from(String::new()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Default for AuthToken {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<String> for AuthToken {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<&str> for AuthToken {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

impl<'de> serde::Deserialize<'de> for AuthToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = if self.is_empty() {
            "[EMPTY]"
        } else {
            "[REDACTED]"
        };
        f.debug_tuple("AuthToken").field(&shown).finish()
    }
}
