//! Decoding and encoding of auth configs.
//!
//! Untyped records are JSON objects. `source` selects the variant through the
//! registry; every other field is read by the variant's branch of
//! [`decode_with`], so the whole discriminator-to-variant mapping lives here.
//!
//! # Pre-conditions
//! - Input records are JSON objects.
//!
//! # Post-conditions
//! - A decoded enabled config has every mandatory provider field.
//! - `decode(&encode(c)) == Ok(c)` for every config `c`.
//!
//! # Invariants
//! - `authType` and `name` on input are ignored; they are only ever written.
//! - Secrets are written verbatim by `encode` and masked by `encode_redacted`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::base::{AuthConfigBase, AuthConfigId, REDACTED, Secret};
use super::error::AuthConfigError;
use super::registry::{AuthSourceRegistry, builtin_registry};
use super::source::AuthSource;
use super::variants::{
    AuthConfig, EmailAuthConfig, GithubAuthConfig, GoogleAuthConfig, OAuthClient, OidcAuthConfig,
    PhoneAuthConfig, SamlAuthConfig,
};

/// Wire field names.
mod fields {
    pub const ID: &str = "id";
    pub const SOURCE: &str = "source";
    pub const NAME: &str = "name";
    pub const ENABLE: &str = "enable";
    pub const ENABLE_REGISTER: &str = "enableRegister";
    pub const AUTH_TYPE: &str = "authType";
    pub const CLIENT_ID: &str = "clientId";
    pub const CLIENT_SECRET: &str = "clientSecret";
    pub const ISSUER_URI: &str = "issuerUri";
    pub const SCOPE: &str = "scope";
    pub const METADATA_URL: &str = "metadataUrl";
    pub const ENTITY_ID: &str = "entityId";
    pub const DISPLAY_LABEL: &str = "displayLabel";
}

/// Typed accessors over an untyped record. `null` reads as absent.
struct Record<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    fn new(value: &'a Value) -> Result<Self, AuthConfigError> {
        value
            .as_object()
            .map(|fields| Self { fields })
            .ok_or_else(|| AuthConfigError::invalid("record", "must be a JSON object"))
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|value| !value.is_null())
    }

    fn string(&self, field: &str) -> Result<Option<String>, AuthConfigError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(AuthConfigError::invalid(field, "must be a string")),
        }
    }

    fn required_string(&self, field: &str) -> Result<String, AuthConfigError> {
        self.string(field)?
            .ok_or_else(|| AuthConfigError::missing(field))
    }

    fn bool(&self, field: &str) -> Result<Option<bool>, AuthConfigError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(AuthConfigError::invalid(field, "must be a boolean")),
        }
    }

    fn required_bool(&self, field: &str) -> Result<bool, AuthConfigError> {
        self.bool(field)?.ok_or_else(|| AuthConfigError::missing(field))
    }

    fn base(&self) -> Result<AuthConfigBase, AuthConfigError> {
        let id = self.string(fields::ID)?.map(AuthConfigId::new).transpose()?;
        let enable = self.required_bool(fields::ENABLE)?;
        let enable_register = self.bool(fields::ENABLE_REGISTER)?.unwrap_or(false);
        Ok(AuthConfigBase::new(id, enable, enable_register))
    }

    fn oauth_client(&self) -> Result<OAuthClient, AuthConfigError> {
        Ok(OAuthClient {
            client_id: self.string(fields::CLIENT_ID)?,
            client_secret: self.string(fields::CLIENT_SECRET)?.map(Secret::new),
        })
    }
}

/// Decode an untyped record using the built-in registry.
///
/// # Errors
/// Returns `AuthConfigError::UnknownAuthSource` if `source` is not registered.
/// Returns `AuthConfigError::InvalidAuthConfig` if a field is missing or
/// malformed, or a mandatory provider field is empty on an enabled config.
pub fn decode(record: &Value) -> Result<AuthConfig, AuthConfigError> {
    decode_with(builtin_registry(), record)
}

/// Decode an untyped record, dispatching through `registry`.
///
/// # Errors
/// See [`decode`].
pub fn decode_with(
    registry: &AuthSourceRegistry,
    record: &Value,
) -> Result<AuthConfig, AuthConfigError> {
    let result = decode_record(registry, record);
    match &result {
        Ok(config) => tracing::debug!(
            "decoded {} auth config (enabled={})",
            config.source(),
            config.enabled()
        ),
        Err(e) => tracing::debug!("rejected auth config: {e}"),
    }
    result
}

fn decode_record(
    registry: &AuthSourceRegistry,
    record: &Value,
) -> Result<AuthConfig, AuthConfigError> {
    let record = Record::new(record)?;
    let source = registry.lookup(&record.required_string(fields::SOURCE)?)?;
    let base = record.base()?;

    let config: AuthConfig = match source {
        AuthSource::Email => EmailAuthConfig::new(base).into(),
        AuthSource::Phone => PhoneAuthConfig::new(base).into(),
        AuthSource::Google => GoogleAuthConfig::new(base, record.oauth_client()?)?.into(),
        AuthSource::Github => GithubAuthConfig::new(base, record.oauth_client()?)?.into(),
        AuthSource::Oidc => OidcAuthConfig::new(
            base,
            record.oauth_client()?,
            record.string(fields::ISSUER_URI)?,
            record.string(fields::SCOPE)?,
            record.string(fields::DISPLAY_LABEL)?,
        )?
        .into(),
        AuthSource::Saml => SamlAuthConfig::new(
            base,
            record.string(fields::METADATA_URL)?,
            record.string(fields::ENTITY_ID)?,
            record.string(fields::DISPLAY_LABEL)?,
        )?
        .into(),
    };
    Ok(config)
}

/// Encode a config into its wire form, secrets included.
#[must_use]
pub fn encode(config: &AuthConfig) -> Value {
    encode_record(config, false)
}

/// Encode a config for display, with secrets replaced by a mask.
#[must_use]
pub fn encode_redacted(config: &AuthConfig) -> Value {
    encode_record(config, true)
}

fn encode_record(config: &AuthConfig, redact: bool) -> Value {
    let mut record = Map::new();
    if let Some(id) = config.id() {
        record.insert(fields::ID.to_string(), Value::from(id.as_str()));
    }
    record.insert(fields::SOURCE.to_string(), Value::from(config.source().key()));
    record.insert(fields::NAME.to_string(), Value::from(config.name()));
    record.insert(fields::ENABLE.to_string(), Value::from(config.enabled()));
    record.insert(
        fields::ENABLE_REGISTER.to_string(),
        Value::from(config.enable_register()),
    );
    record.insert(
        fields::AUTH_TYPE.to_string(),
        Value::from(config.auth_type().as_str()),
    );

    match config {
        AuthConfig::Email(_) | AuthConfig::Phone(_) => {}
        AuthConfig::Google(google) => encode_client(&mut record, google.client(), redact),
        AuthConfig::Github(github) => encode_client(&mut record, github.client(), redact),
        AuthConfig::Oidc(oidc) => {
            encode_client(&mut record, oidc.client(), redact);
            insert_opt(&mut record, fields::ISSUER_URI, oidc.issuer_uri());
            insert_opt(&mut record, fields::SCOPE, Some(oidc.scope()));
            insert_opt(&mut record, fields::DISPLAY_LABEL, oidc.display_label());
        }
        AuthConfig::Saml(saml) => {
            insert_opt(&mut record, fields::METADATA_URL, saml.metadata_url());
            insert_opt(&mut record, fields::ENTITY_ID, saml.entity_id());
            insert_opt(&mut record, fields::DISPLAY_LABEL, saml.display_label());
        }
    }

    Value::Object(record)
}

fn encode_client(record: &mut Map<String, Value>, client: &OAuthClient, redact: bool) {
    insert_opt(record, fields::CLIENT_ID, client.client_id.as_deref());
    let secret = client
        .client_secret
        .as_ref()
        .map(|secret| if redact { REDACTED } else { secret.expose() });
    insert_opt(record, fields::CLIENT_SECRET, secret);
}

fn insert_opt(record: &mut Map<String, Value>, field: &str, value: Option<&str>) {
    if let Some(value) = value {
        record.insert(field.to_string(), Value::from(value));
    }
}

impl Serialize for AuthConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AuthConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode(&value).map_err(serde::de::Error::custom)
    }
}
