//! Shared shape of every auth configuration.
//!
//! # Pre-conditions
//! - A persisted id is never the empty string.
//!
//! # Post-conditions
//! - `AuthConfigBase` instances are immutable once created.
//!
//! # Invariants
//! - `auth_type()` is derived from the variant's `SOURCE` and cannot be set.
//! - Secrets never appear in `Debug` output.

use std::borrow::Borrow;
use std::fmt;

use super::error::AuthConfigError;
use super::source::{AuthSource, AuthType};

/// Mask substituted for secrets in redacted output.
pub const REDACTED: &str = "******";

/// Opaque identifier of a persisted auth config.
///
/// The core never interprets the format. An unpersisted config has no id at
/// all rather than an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthConfigId(String);

impl AuthConfigId {
    /// Wrap a persisted identifier.
    ///
    /// # Errors
    /// Returns `AuthConfigError::InvalidAuthConfig` on field `id` if `id` is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, AuthConfigError> {
        let id = id.into();
        if id.is_empty() {
            return Err(AuthConfigError::invalid(
                "id",
                "must not be empty; omit it for unpersisted configs",
            ));
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Lets id-keyed maps be queried with a plain `&str`.
impl Borrow<str> for AuthConfigId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A provider credential that must not leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret, for persistence and the flows that consume it.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({REDACTED})")
    }
}

/// Fields shared by every auth config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfigBase {
    id: Option<AuthConfigId>,
    enable: bool,
    enable_register: bool,
}

impl AuthConfigBase {
    #[must_use]
    pub const fn new(id: Option<AuthConfigId>, enable: bool, enable_register: bool) -> Self {
        Self {
            id,
            enable,
            enable_register,
        }
    }

    /// `None` for a config that has not been persisted yet.
    #[must_use]
    pub const fn id(&self) -> Option<&AuthConfigId> {
        self.id.as_ref()
    }

    /// Whether this auth method is offered to end users.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enable
    }

    /// Whether new accounts may self-register through this method.
    #[must_use]
    pub const fn enable_register(&self) -> bool {
        self.enable_register
    }
}

/// Behaviour common to every config variant.
///
/// Implementors pin their source through `SOURCE`; the name and auth type
/// follow from it.
pub trait ProviderConfig {
    /// The source this variant configures.
    const SOURCE: AuthSource;

    fn base(&self) -> &AuthConfigBase;

    /// Fixed for the variant family: the source key.
    fn name(&self) -> &'static str {
        Self::SOURCE.key()
    }

    fn auth_type(&self) -> AuthType {
        Self::SOURCE.auth_type()
    }

    /// Check the fields that an enabled config cannot do without.
    ///
    /// Only called for enabled configs; half-configured providers can be
    /// stored while switched off.
    ///
    /// # Errors
    /// Returns `AuthConfigError::InvalidAuthConfig` naming the first empty field.
    fn check_enabled(&self) -> Result<(), AuthConfigError> {
        Ok(())
    }
}

/// Require `value` to be present and non-empty.
pub(crate) fn require_non_empty(field: &str, value: Option<&str>) -> Result<(), AuthConfigError> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(AuthConfigError::empty_while_enabled(field)),
    }
}
