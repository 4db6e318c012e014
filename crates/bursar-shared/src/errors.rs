#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Empty not allowed")]
    Empty,
    #[error("Maximum length exceeded. {max} allowed but found {actual}")]
    MaxExceeded { max: usize, actual: usize },
}

/// A persisted value could not be turned back into its type
#[derive(Debug, thiserror::Error)]
#[error("failed to deserialize persisted {what}: {source}")]
pub struct DeserializationError {
    pub what: &'static str,
    #[source]
    pub source: serde_json::Error,
}

impl DeserializationError {
    pub fn new(what: &'static str, source: serde_json::Error) -> Self {
        Self { what, source }
    }
}
