//! Errors produced while constructing or decoding auth configurations.
//!
//! Every error here is a deterministic validation failure on a single input.
//! None of them are retried.

/// Error returned when an auth configuration cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfigError {
    /// The `source` discriminator is not in the active registry.
    UnknownAuthSource(String),
    /// A field is missing, has the wrong type, or is empty while the config is enabled.
    InvalidAuthConfig {
        /// The wire name of the offending field.
        field: String,
        /// Description of what is wrong with it.
        reason: String,
    },
}

impl AuthConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAuthConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::invalid(field, "is required")
    }

    pub(crate) fn empty_while_enabled(field: &str) -> Self {
        Self::invalid(field, "must not be empty when the config is enabled")
    }

    /// The field this error is about, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownAuthSource(_) => Some("source"),
            Self::InvalidAuthConfig { field, .. } => Some(field),
        }
    }
}

impl std::fmt::Display for AuthConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAuthSource(source) => write!(f, "unknown auth source: {source}"),
            Self::InvalidAuthConfig { field, reason } => {
                write!(f, "invalid auth config: field '{field}' {reason}")
            }
        }
    }
}

impl std::error::Error for AuthConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let unknown = AuthConfigError::UnknownAuthSource("myspace".to_string());
        assert_eq!(unknown.to_string(), "unknown auth source: myspace");

        let invalid = AuthConfigError::missing("clientId");
        assert_eq!(
            invalid.to_string(),
            "invalid auth config: field 'clientId' is required"
        );
    }

    #[test]
    fn test_error_field() {
        assert_eq!(
            AuthConfigError::UnknownAuthSource("x".to_string()).field(),
            Some("source")
        );
        assert_eq!(
            AuthConfigError::empty_while_enabled("issuerUri").field(),
            Some("issuerUri")
        );
    }
}
