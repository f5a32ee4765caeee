//! Registry of auth sources accepted by the decoder.
//!
//! The built-in registry contains every [`AuthSource`]. A deployment may
//! narrow it to a subset, loaded from a JSON file of the form
//! `{"sources": ["email", "google"]}`.
//!
//! # Pre-conditions
//! - Every key named in a registry file has a built-in variant.
//!
//! # Post-conditions
//! - Readers of a [`SharedRegistry`] see either the old or the new registry
//!   after a reload, never a mix of the two.
//!
//! # Invariants
//! - A registry is immutable once built; reloading replaces the whole value.
//! - Each key maps to exactly one `AuthSource`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde::Deserialize;

use super::error::AuthConfigError;
use super::source::{AuthSource, AuthType};

/// Error returned when a registry file cannot be loaded.
#[derive(Debug)]
pub enum RegistryLoadError {
    /// The file could not be read.
    Io { path: PathBuf, error: std::io::Error },
    /// The file is not a valid registry document.
    Parse { path: PathBuf, error: serde_json::Error },
    /// The file names a source with no built-in variant.
    UnknownSource(AuthConfigError),
}

impl std::fmt::Display for RegistryLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, error } => {
                write!(f, "failed to read registry file {}: {error}", path.display())
            }
            Self::Parse { path, error } => {
                write!(f, "failed to parse registry file {}: {error}", path.display())
            }
            Self::UnknownSource(e) => write!(f, "invalid registry: {e}"),
        }
    }
}

impl std::error::Error for RegistryLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { error, .. } => Some(error),
            Self::Parse { error, .. } => Some(error),
            Self::UnknownSource(e) => Some(e),
        }
    }
}

impl From<AuthConfigError> for RegistryLoadError {
    fn from(e: AuthConfigError) -> Self {
        Self::UnknownSource(e)
    }
}

/// On-disk registry document.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    sources: Vec<String>,
}

/// The set of sources the decoder will dispatch to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSourceRegistry {
    entries: BTreeMap<&'static str, AuthSource>,
}

impl AuthSourceRegistry {
    /// Registry containing every built-in source.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_sources(AuthSource::ALL)
    }

    /// Registry containing exactly `sources`.
    #[must_use]
    pub fn from_sources(sources: impl IntoIterator<Item = AuthSource>) -> Self {
        Self {
            entries: sources
                .into_iter()
                .map(|source| (source.key(), source))
                .collect(),
        }
    }

    /// Registry containing the sources named by `keys`.
    ///
    /// # Errors
    /// Returns `AuthConfigError::UnknownAuthSource` for the first key with no
    /// built-in variant.
    pub fn from_keys<I, S>(keys: I) -> Result<Self, AuthConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sources = keys
            .into_iter()
            .map(|key| {
                let key = key.as_ref();
                AuthSource::from_key(key)
                    .ok_or_else(|| AuthConfigError::UnknownAuthSource(key.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_sources(sources))
    }

    /// Load a registry from a JSON file.
    ///
    /// # Errors
    /// Returns `RegistryLoadError` if the file cannot be read or parsed, or
    /// names an unknown source.
    pub fn load(path: &Path) -> Result<Self, RegistryLoadError> {
        let contents = std::fs::read_to_string(path).map_err(|error| RegistryLoadError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        let file: RegistryFile =
            serde_json::from_str(&contents).map_err(|error| RegistryLoadError::Parse {
                path: path.to_path_buf(),
                error,
            })?;
        Ok(Self::from_keys(&file.sources)?)
    }

    /// Resolve a discriminator value.
    ///
    /// # Errors
    /// Returns `AuthConfigError::UnknownAuthSource` if `key` is not registered.
    pub fn lookup(&self, key: &str) -> Result<AuthSource, AuthConfigError> {
        self.entries
            .get(key)
            .copied()
            .ok_or_else(|| AuthConfigError::UnknownAuthSource(key.to_string()))
    }

    /// Default auth type of a registered source.
    ///
    /// # Errors
    /// Returns `AuthConfigError::UnknownAuthSource` if `key` is not registered.
    pub fn auth_type_of(&self, key: &str) -> Result<AuthType, AuthConfigError> {
        self.lookup(key).map(AuthSource::auth_type)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys in sorted order.
    #[must_use]
    pub fn known_sources(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AuthSourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The process-wide built-in registry, built on first use.
pub fn builtin_registry() -> &'static AuthSourceRegistry {
    static BUILTIN: OnceLock<AuthSourceRegistry> = OnceLock::new();
    BUILTIN.get_or_init(AuthSourceRegistry::builtin)
}

/// A swappable handle to the active registry.
///
/// # Thread Safety
///
/// The lock only guards the `Arc`. Readers clone it and drop the lock before
/// using the registry, so a reload never waits on a long lookup and a lookup
/// never observes a half-built registry.
#[derive(Debug)]
pub struct SharedRegistry {
    current: RwLock<Arc<AuthSourceRegistry>>,
}

impl SharedRegistry {
    #[must_use]
    pub fn new(registry: AuthSourceRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    /// The registry in effect right now.
    #[must_use]
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    pub fn snapshot(&self) -> Arc<AuthSourceRegistry> {
        // A panicking writer cannot leave the slot half-written, so a
        // poisoned lock still holds a complete registry.
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    /// Replace the active registry, returning the previous one.
    pub fn reload(&self, registry: AuthSourceRegistry) -> Arc<AuthSourceRegistry> {
        self.swap(Arc::new(registry))
    }

    /// Reload from a registry file, returning the registry now in effect.
    /// On failure the active registry is kept.
    ///
    /// # Errors
    /// Returns `RegistryLoadError` if the file cannot be loaded.
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    pub fn reload_from(&self, path: &Path) -> Result<Arc<AuthSourceRegistry>, RegistryLoadError> {
        let next = Arc::new(AuthSourceRegistry::load(path)?);
        self.swap(Arc::clone(&next));
        Ok(next)
    }

    fn swap(&self, next: Arc<AuthSourceRegistry>) -> Arc<AuthSourceRegistry> {
        let next_len = next.len();
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *current, next);
        drop(current);

        tracing::info!(
            "Auth source registry reloaded: {} -> {} sources",
            previous.len(),
            next_len
        );
        previous
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new(AuthSourceRegistry::builtin())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_builtin_contains_every_source() {
        let registry = AuthSourceRegistry::builtin();
        assert_eq!(registry.len(), AuthSource::ALL.len());
        for source in AuthSource::ALL {
            assert_eq!(registry.lookup(source.key()), Ok(source));
        }
    }

    #[test]
    fn test_lookup_unknown_source() {
        let registry = AuthSourceRegistry::builtin();
        assert_eq!(
            registry.lookup("not-a-real-source"),
            Err(AuthConfigError::UnknownAuthSource(
                "not-a-real-source".to_string()
            ))
        );
    }

    #[test]
    fn test_auth_type_of() {
        let registry = AuthSourceRegistry::builtin();
        assert_eq!(registry.auth_type_of("email"), Ok(AuthType::Form));
        assert_eq!(registry.auth_type_of("google"), Ok(AuthType::Oauth2));
        assert!(registry.auth_type_of("myspace").is_err());
    }

    #[test]
    fn test_from_keys_narrows_registry() {
        let registry = AuthSourceRegistry::from_keys(["google", "email"]).expect("known keys");
        assert_eq!(registry.known_sources(), vec!["email", "google"]);
        assert!(!registry.contains("github"));
        assert!(registry.lookup("github").is_err());
    }

    #[test]
    fn test_from_keys_rejects_unknown() {
        let result = AuthSourceRegistry::from_keys(["email", "myspace"]);
        assert_eq!(
            result,
            Err(AuthConfigError::UnknownAuthSource("myspace".to_string()))
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"sources": ["saml", "oidc"]}}"#).expect("write registry");

        let registry = AuthSourceRegistry::load(file.path()).expect("valid registry file");
        assert_eq!(registry.known_sources(), vec!["oidc", "saml"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = AuthSourceRegistry::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(RegistryLoadError::Io { .. })));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"sources": "email"}}"#).expect("write registry");

        let result = AuthSourceRegistry::load(file.path());
        assert!(matches!(result, Err(RegistryLoadError::Parse { .. })));
    }

    #[test]
    fn test_builtin_registry_is_shared() {
        assert!(std::ptr::eq(builtin_registry(), builtin_registry()));
        assert_eq!(builtin_registry(), &AuthSourceRegistry::builtin());
    }

    #[test]
    fn test_reload_swaps_whole_registry() {
        let shared = SharedRegistry::default();
        let before = shared.snapshot();

        let previous = shared.reload(AuthSourceRegistry::from_sources([AuthSource::Email]));

        assert_eq!(previous, before);
        assert_eq!(before.len(), AuthSource::ALL.len());
        assert_eq!(shared.snapshot().known_sources(), vec!["email"]);
    }

    #[test]
    fn test_reload_from_bad_file_keeps_current() {
        let shared = SharedRegistry::new(AuthSourceRegistry::from_sources([AuthSource::Github]));
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"sources": ["github", "myspace"]}}"#).expect("write registry");

        let result = shared.reload_from(file.path());

        assert!(matches!(result, Err(RegistryLoadError::UnknownSource(_))));
        assert_eq!(shared.snapshot().known_sources(), vec!["github"]);
    }

    #[test]
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    fn test_reload_from_returns_the_registry_it_installed() {
        let shared = Arc::new(SharedRegistry::default());
        let files: Vec<(tempfile::NamedTempFile, &str)> = ["email", "google", "saml", "oidc"]
            .into_iter()
            .map(|key| {
                let mut file = tempfile::NamedTempFile::new().expect("temp file");
                write!(file, r#"{{"sources": ["{key}"]}}"#).expect("write registry");
                (file, key)
            })
            .collect();

        std::thread::scope(|scope| {
            for (file, key) in &files {
                let shared = Arc::clone(&shared);
                scope.spawn(move || {
                    for _ in 0..50 {
                        let installed = shared.reload_from(file.path()).expect("valid file");
                        assert_eq!(installed.known_sources(), vec![*key]);
                    }
                });
            }
        });

        let (file, key) = &files[0];
        let installed = shared.reload_from(file.path()).expect("valid file");
        assert!(Arc::ptr_eq(&installed, &shared.snapshot()));
        assert_eq!(installed.known_sources(), vec![*key]);
    }

    #[test]
    fn test_registry_load_error_display() {
        let err = RegistryLoadError::UnknownSource(AuthConfigError::UnknownAuthSource(
            "myspace".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "invalid registry: unknown auth source: myspace"
        );
    }
}
