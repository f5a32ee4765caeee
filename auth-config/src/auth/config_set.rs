//! The auth configs of one deployment.
//!
//! # Invariants
//! - No two configs in a set share an id.
//! - The set is immutable; a configuration change builds a new set.

use std::collections::HashMap;

use serde_json::Value;

use super::base::AuthConfigId;
use super::codec::decode_with;
use super::error::AuthConfigError;
use super::registry::AuthSourceRegistry;
use super::source::AuthSource;
use super::variants::AuthConfig;

/// Error returned when a set of configs cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSetError {
    /// The input is not a JSON array.
    NotAnArray,
    /// The element at `index` could not be decoded.
    Element {
        index: usize,
        error: AuthConfigError,
    },
    /// Two configs carry the same id.
    DuplicateId(AuthConfigId),
}

impl std::fmt::Display for ConfigSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnArray => write!(f, "auth configs must be a JSON array"),
            Self::Element { index, error } => write!(f, "auth config #{index}: {error}"),
            Self::DuplicateId(id) => write!(f, "duplicate auth config id: {id}"),
        }
    }
}

impl std::error::Error for ConfigSetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Element { error, .. } => Some(error),
            Self::NotAnArray | Self::DuplicateId(_) => None,
        }
    }
}

/// An immutable collection of auth configs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfigSet {
    configs: Vec<AuthConfig>,
    by_id: HashMap<AuthConfigId, usize>,
}

impl AuthConfigSet {
    /// Build a set, preserving input order.
    ///
    /// # Errors
    /// Returns `ConfigSetError::DuplicateId` if two configs share an id.
    pub fn new(configs: Vec<AuthConfig>) -> Result<Self, ConfigSetError> {
        let mut by_id = HashMap::with_capacity(configs.len());
        for (index, config) in configs.iter().enumerate() {
            if let Some(id) = config.id()
                && by_id.insert(id.clone(), index).is_some()
            {
                return Err(ConfigSetError::DuplicateId(id.clone()));
            }
        }
        Ok(Self { configs, by_id })
    }

    /// Decode every element of a JSON array through `registry`.
    ///
    /// # Errors
    /// Returns `ConfigSetError::NotAnArray` if `records` is not an array,
    /// `ConfigSetError::Element` for the first element that fails to decode,
    /// and `ConfigSetError::DuplicateId` for repeated ids.
    pub fn decode_all(
        registry: &AuthSourceRegistry,
        records: &Value,
    ) -> Result<Self, ConfigSetError> {
        let records = records.as_array().ok_or(ConfigSetError::NotAnArray)?;
        let configs = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                decode_with(registry, record)
                    .map_err(|error| ConfigSetError::Element { index, error })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(configs)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AuthConfig> {
        self.by_id.get(id).and_then(|&index| self.configs.get(index))
    }

    /// All configs for `source`, enabled or not.
    pub fn by_source(&self, source: AuthSource) -> impl Iterator<Item = &AuthConfig> {
        self.configs
            .iter()
            .filter(move |config| config.source() == source)
    }

    /// Configs currently offered to end users.
    pub fn enabled(&self) -> impl Iterator<Item = &AuthConfig> {
        self.configs.iter().filter(|config| config.enabled())
    }

    /// Sources through which new accounts may self-register, deduplicated.
    #[must_use]
    pub fn registration_sources(&self) -> Vec<AuthSource> {
        let mut sources: Vec<AuthSource> = self
            .enabled()
            .filter(|config| config.enable_register())
            .map(AuthConfig::source)
            .collect();
        sources.sort_unstable();
        sources.dedup();
        sources
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuthConfig> {
        self.configs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> AuthConfigSet {
        AuthConfigSet::decode_all(
            &AuthSourceRegistry::builtin(),
            &json!([
                {"id": "1", "source": "email", "enable": true, "enableRegister": true},
                {"id": "2", "source": "google", "enable": true, "enableRegister": false,
                 "clientId": "cid", "clientSecret": "secret"},
                {"id": "3", "source": "saml", "enable": false},
                {"source": "saml", "displayLabel": "Okta", "enable": true, "enableRegister": true,
                 "metadataUrl": "https://idp.example.com/metadata"},
                {"source": "email", "enable": true, "enableRegister": true},
            ]),
        )
        .expect("valid configs")
    }

    #[test]
    fn test_decode_all_preserves_order() {
        let set = sample();
        assert_eq!(set.len(), 5);
        let sources: Vec<AuthSource> = set.iter().map(AuthConfig::source).collect();
        assert_eq!(
            sources,
            vec![
                AuthSource::Email,
                AuthSource::Google,
                AuthSource::Saml,
                AuthSource::Saml,
                AuthSource::Email,
            ]
        );
    }

    #[test]
    fn test_get_by_id() {
        let set = sample();
        assert_eq!(set.get("2").map(AuthConfig::source), Some(AuthSource::Google));
        assert!(set.get("missing").is_none());
        assert!(set.get("").is_none());
    }

    #[test]
    fn test_by_source_and_enabled() {
        let set = sample();
        assert_eq!(set.by_source(AuthSource::Saml).count(), 2);
        assert_eq!(set.by_source(AuthSource::Github).count(), 0);
        assert_eq!(set.enabled().count(), 4);
    }

    #[test]
    fn test_registration_sources() {
        let set = sample();
        assert_eq!(
            set.registration_sources(),
            vec![AuthSource::Email, AuthSource::Saml]
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = AuthConfigSet::decode_all(
            &AuthSourceRegistry::builtin(),
            &json!([
                {"id": "same", "source": "email", "enable": true},
                {"id": "same", "source": "phone", "enable": true},
            ]),
        );
        assert!(matches!(result, Err(ConfigSetError::DuplicateId(id)) if id.as_str() == "same"));
    }

    #[test]
    fn test_element_error_reports_index() {
        let result = AuthConfigSet::decode_all(
            &AuthSourceRegistry::builtin(),
            &json!([
                {"source": "email", "enable": true},
                {"source": "github", "enable": true},
            ]),
        );
        let Err(ConfigSetError::Element { index, error }) = result else {
            panic!("expected element error");
        };
        assert_eq!(index, 1);
        assert_eq!(error.field(), Some("clientId"));
    }

    #[test]
    fn test_not_an_array() {
        let result =
            AuthConfigSet::decode_all(&AuthSourceRegistry::builtin(), &json!({"source": "email"}));
        assert_eq!(result, Err(ConfigSetError::NotAnArray));
    }

    #[test]
    fn test_config_set_error_display() {
        let err = ConfigSetError::Element {
            index: 3,
            error: AuthConfigError::UnknownAuthSource("myspace".to_string()),
        };
        assert_eq!(err.to_string(), "auth config #3: unknown auth source: myspace");
        assert_eq!(
            ConfigSetError::NotAnArray.to_string(),
            "auth configs must be a JSON array"
        );
    }
}
