//! Test that every registered source decodes to its own variant.

use serde_json::json;

use crate::auth::{AuthConfig, AuthConfigError, AuthSource, AuthType, builtin_registry, decode};
use crate::e2e_tests::helpers::*;

#[test]
fn test_every_source_decodes_to_its_variant() {
    for source in AuthSource::ALL {
        let config = decode_ok(&valid_record(source));
        assert_eq!(config.source(), source);
        assert_eq!(config.auth_type(), source.auth_type());
        assert_eq!(
            builtin_registry().auth_type_of(source.key()),
            Ok(config.auth_type())
        );

        let matches_source = match (&config, source) {
            (AuthConfig::Email(_), AuthSource::Email)
            | (AuthConfig::Phone(_), AuthSource::Phone)
            | (AuthConfig::Google(_), AuthSource::Google)
            | (AuthConfig::Github(_), AuthSource::Github)
            | (AuthConfig::Oidc(_), AuthSource::Oidc)
            | (AuthConfig::Saml(_), AuthSource::Saml) => true,
            _ => false,
        };
        assert!(matches_source, "{source} decoded to {config:?}");
    }
}

#[test]
fn test_known_auth_types() {
    let types: Vec<(AuthSource, AuthType)> = AuthSource::ALL
        .into_iter()
        .map(|source| (source, decode_ok(&valid_record(source)).auth_type()))
        .collect();
    assert_eq!(
        types,
        vec![
            (AuthSource::Email, AuthType::Form),
            (AuthSource::Phone, AuthType::Form),
            (AuthSource::Google, AuthType::Oauth2),
            (AuthSource::Github, AuthType::Oauth2),
            (AuthSource::Oidc, AuthType::Oauth2),
            (AuthSource::Saml, AuthType::Saml),
        ]
    );
}

#[test]
fn test_known_sources_match_variants() {
    let known = builtin_registry().known_sources();
    assert_eq!(known.len(), AuthSource::ALL.len());
    for key in known {
        let config = decode_ok(&json!({"source": key, "enable": false}));
        assert_eq!(config.source().key(), key);
    }
}

#[test]
fn test_unknown_sources_rejected() {
    for key in ["not-a-real-source", "EMAIL", " email", ""] {
        let result = decode(&json!({"source": key, "enable": true}));
        assert_eq!(
            result,
            Err(AuthConfigError::UnknownAuthSource(key.to_string())),
            "source {key:?} should be unknown"
        );
    }
}
