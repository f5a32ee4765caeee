//! Common helpers for end-to-end tests.

use serde_json::{Value, json};

use crate::auth::{AuthConfig, AuthConfigError, AuthSource, decode};

/// A fully-populated enabled record for `source`.
#[must_use]
pub fn valid_record(source: AuthSource) -> Value {
    let mut record = json!({
        "id": format!("{}-1", source.key()),
        "source": source.key(),
        "enable": true,
        "enableRegister": true,
    });
    let extra = match source {
        AuthSource::Email | AuthSource::Phone => json!({}),
        AuthSource::Google | AuthSource::Github => json!({
            "clientId": "client-id",
            "clientSecret": "client-secret",
        }),
        AuthSource::Oidc => json!({
            "displayLabel": "Corporate SSO",
            "clientId": "client-id",
            "clientSecret": "client-secret",
            "issuerUri": "https://login.example.com",
            "scope": "openid email",
        }),
        AuthSource::Saml => json!({
            "displayLabel": "Okta",
            "metadataUrl": "https://idp.example.com/metadata",
            "entityId": "urn:example:sp",
        }),
    };
    merge(&mut record, extra);
    record
}

/// A record for `source` carrying only `source` and `enable`.
#[must_use]
pub fn bare_record(source: AuthSource, enable: bool) -> Value {
    json!({ "source": source.key(), "enable": enable })
}

/// Copy every field of `extra` into `record`.
pub fn merge(record: &mut Value, extra: Value) {
    if let (Some(record), Value::Object(extra)) = (record.as_object_mut(), extra) {
        record.extend(extra);
    }
}

/// Decode a record that is expected to be valid.
#[must_use]
pub fn decode_ok(record: &Value) -> AuthConfig {
    match decode(record) {
        Ok(config) => config,
        Err(e) => panic!("expected {record} to decode, got: {e}"),
    }
}

/// The field named by an `InvalidAuthConfig` error.
#[must_use]
pub fn invalid_field(result: Result<AuthConfig, AuthConfigError>) -> String {
    match result {
        Err(AuthConfigError::InvalidAuthConfig { field, .. }) => field,
        other => panic!("expected InvalidAuthConfig, got {other:?}"),
    }
}
