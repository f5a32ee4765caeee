//! Loading of stored auth configs from disk.
//!
//! The file holds a JSON array of auth config records, the same shape the
//! admin API returns.
//!
//! # Post-conditions
//! - A missing file loads as an empty set (nothing configured yet).

use std::path::{Path, PathBuf};

use crate::auth::{AuthConfigSet, AuthSourceRegistry, ConfigSetError};

/// Error returned when the stored configs cannot be loaded.
#[derive(Debug)]
pub enum StoreError {
    /// The file exists but could not be read.
    Io { path: PathBuf, error: std::io::Error },
    /// The file is not valid JSON.
    Parse { path: PathBuf, error: serde_json::Error },
    /// The file is valid JSON but holds invalid configs.
    Invalid { path: PathBuf, error: ConfigSetError },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, error } => {
                write!(f, "failed to read {}: {error}", path.display())
            }
            Self::Parse { path, error } => {
                write!(f, "failed to parse {}: {error}", path.display())
            }
            Self::Invalid { path, error } => {
                write!(f, "invalid configs in {}: {error}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { error, .. } => Some(error),
            Self::Parse { error, .. } => Some(error),
            Self::Invalid { error, .. } => Some(error),
        }
    }
}

/// Load stored configs, decoding them through `registry`.
///
/// # Errors
/// Returns `StoreError` if the file cannot be read, parsed, or decoded.
pub fn load_config_set(
    path: &Path,
    registry: &AuthSourceRegistry,
) -> Result<AuthConfigSet, StoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No stored auth configs at {}", path.display());
            return Ok(AuthConfigSet::default());
        }
        Err(error) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                error,
            });
        }
    };

    let records: serde_json::Value =
        serde_json::from_str(&contents).map_err(|error| StoreError::Parse {
            path: path.to_path_buf(),
            error,
        })?;

    AuthConfigSet::decode_all(registry, &records).map_err(|error| StoreError::Invalid {
        path: path.to_path_buf(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::auth::AuthSource;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let set = load_config_set(&dir.path().join("none.json"), &AuthSourceRegistry::builtin())
            .expect("missing file is not an error");
        assert!(set.is_empty());
    }

    #[test]
    fn test_load_valid_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[{{"id": "e", "source": "email", "enable": true}},
                {{"id": "g", "source": "google", "enable": false}}]"#
        )
        .expect("write configs");

        let set = load_config_set(file.path(), &AuthSourceRegistry::builtin()).expect("valid");
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("g").map(|c| c.source()), Some(AuthSource::Google));
    }

    #[test]
    fn test_load_rejects_source_outside_registry() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"[{{"source": "google", "enable": false}}]"#).expect("write configs");

        let registry = AuthSourceRegistry::from_sources([AuthSource::Email]);
        let result = load_config_set(file.path(), &registry);
        assert!(matches!(
            result,
            Err(StoreError::Invalid {
                error: ConfigSetError::Element { index: 0, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_load_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "[{{").expect("write configs");

        let result = load_config_set(file.path(), &AuthSourceRegistry::builtin());
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }
}
