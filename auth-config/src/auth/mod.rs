//! Authentication configuration model.
//!
//! One config variant per identity-provider family, a registry of the
//! families a deployment accepts, and the codec that turns untyped records
//! into variants and back.
//!
//! # Pre-conditions
//! - Untyped input names its variant through the `source` field.
//!
//! # Post-conditions
//! - Auth configs are immutable once constructed.
//!
//! # Invariants
//! - A config's auth type is always the one fixed for its source.

pub mod base;
pub mod codec;
pub mod config_set;
pub mod error;
pub mod registry;
pub mod source;
pub mod variants;

pub use base::{AuthConfigBase, AuthConfigId, ProviderConfig, REDACTED, Secret};
pub use codec::{decode, decode_with, encode, encode_redacted};
pub use config_set::{AuthConfigSet, ConfigSetError};
pub use error::AuthConfigError;
pub use registry::{AuthSourceRegistry, RegistryLoadError, SharedRegistry, builtin_registry};
pub use source::{AuthSource, AuthType};
pub use variants::{
    AuthConfig, DEFAULT_OIDC_SCOPE, EmailAuthConfig, GithubAuthConfig, GoogleAuthConfig,
    OAuthClient, OidcAuthConfig, PhoneAuthConfig, SamlAuthConfig,
};
