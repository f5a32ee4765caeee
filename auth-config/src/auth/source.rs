//! Known authentication sources and their handshake classification.
//!
//! # Invariants
//! - Every `AuthSource` has exactly one non-empty key and one `AuthType`.
//! - `AuthSource::ALL` lists every source exactly once.
//! - Keys are the wire contract; changing one is a breaking change.

use std::fmt;

/// How the handshake for a source works.
///
/// Downstream flow selection branches on this, never on the source itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthType {
    /// Credentials are posted to a form (password, one-time code).
    Form,
    /// Browser is redirected through an OAuth2 / OIDC authorization flow.
    Oauth2,
    /// Browser is redirected through a SAML 2.0 identity provider.
    Saml,
}

impl AuthType {
    /// The serialized name of this auth type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Form => "FORM",
            Self::Oauth2 => "OAUTH2",
            Self::Saml => "SAML",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identity-provider family.
///
/// Each source is backed by exactly one config variant in
/// [`crate::auth::variants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AuthSource {
    /// Email and password.
    Email,
    /// Phone number and one-time code.
    Phone,
    /// Google OAuth2.
    Google,
    /// GitHub OAuth2.
    Github,
    /// Generic OpenID Connect provider.
    Oidc,
    /// Generic SAML 2.0 provider.
    Saml,
}

impl AuthSource {
    /// Every source, in registry order.
    pub const ALL: [Self; 6] = [
        Self::Email,
        Self::Phone,
        Self::Google,
        Self::Github,
        Self::Oidc,
        Self::Saml,
    ];

    /// The discriminator value used on the wire.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Google => "google",
            Self::Github => "github",
            Self::Oidc => "oidc",
            Self::Saml => "saml",
        }
    }

    /// The fixed handshake classification of this source.
    #[must_use]
    pub const fn auth_type(self) -> AuthType {
        match self {
            Self::Email | Self::Phone => AuthType::Form,
            Self::Google | Self::Github | Self::Oidc => AuthType::Oauth2,
            Self::Saml => AuthType::Saml,
        }
    }

    /// Resolve a wire key against the full built-in set.
    ///
    /// This ignores any deployment narrowing; use
    /// [`crate::auth::AuthSourceRegistry::lookup`] for dispatch.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|source| source.key() == key)
    }
}

impl fmt::Display for AuthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_keys_are_unique_and_non_empty() {
        let keys: HashSet<&str> = AuthSource::ALL.iter().map(|s| s.key()).collect();
        assert_eq!(keys.len(), AuthSource::ALL.len());
        assert!(keys.iter().all(|k| !k.is_empty()));
    }

    #[test]
    fn test_from_key_round_trips_every_source() {
        for source in AuthSource::ALL {
            assert_eq!(AuthSource::from_key(source.key()), Some(source));
        }
    }

    #[test]
    fn test_from_key_is_case_sensitive() {
        assert_eq!(AuthSource::from_key("EMAIL"), None);
        assert_eq!(AuthSource::from_key(""), None);
        assert_eq!(AuthSource::from_key("not-a-real-source"), None);
    }

    #[test]
    fn test_auth_type_classification() {
        assert_eq!(AuthSource::Email.auth_type(), AuthType::Form);
        assert_eq!(AuthSource::Phone.auth_type(), AuthType::Form);
        assert_eq!(AuthSource::Google.auth_type(), AuthType::Oauth2);
        assert_eq!(AuthSource::Github.auth_type(), AuthType::Oauth2);
        assert_eq!(AuthSource::Oidc.auth_type(), AuthType::Oauth2);
        assert_eq!(AuthSource::Saml.auth_type(), AuthType::Saml);
    }

    #[test]
    fn test_display() {
        assert_eq!(AuthSource::Github.to_string(), "github");
        assert_eq!(AuthType::Oauth2.to_string(), "OAUTH2");
        assert_eq!(AuthType::Form.to_string(), "FORM");
    }
}
