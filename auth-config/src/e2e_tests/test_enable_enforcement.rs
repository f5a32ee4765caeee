//! Test that mandatory provider fields are enforced only when enabled.

use serde_json::json;

use crate::auth::{AuthSource, decode};
use crate::e2e_tests::helpers::*;

#[test]
fn test_enabled_email_needs_nothing_extra() {
    let config = decode_ok(&json!({"source": "email", "enable": true}));
    assert!(config.enabled());
}

#[test]
fn test_enabled_providers_report_first_missing_field() {
    let cases = [
        (AuthSource::Google, "clientId"),
        (AuthSource::Github, "clientId"),
        (AuthSource::Oidc, "clientId"),
        (AuthSource::Saml, "metadataUrl"),
    ];
    for (source, field) in cases {
        assert_eq!(invalid_field(decode(&bare_record(source, true))), field);
    }
}

#[test]
fn test_each_mandatory_field_checked() {
    let cases = [
        (AuthSource::Google, "clientSecret"),
        (AuthSource::Github, "clientSecret"),
        (AuthSource::Oidc, "clientSecret"),
        (AuthSource::Oidc, "issuerUri"),
        (AuthSource::Saml, "metadataUrl"),
    ];
    for (source, field) in cases {
        let mut emptied = valid_record(source);
        merge(&mut emptied, json!({ field: "" }));
        assert_eq!(invalid_field(decode(&emptied)), field, "{source} with empty {field}");

        let mut removed = valid_record(source);
        if let Some(object) = removed.as_object_mut() {
            object.remove(field);
        }
        assert_eq!(invalid_field(decode(&removed)), field, "{source} without {field}");
    }
}

#[test]
fn test_disabled_configs_bypass_enforcement() {
    for source in AuthSource::ALL {
        let config = decode_ok(&bare_record(source, false));
        assert!(!config.enabled());
        assert!(!config.enable_register());
    }
}

#[test]
fn test_disabled_configs_still_reject_malformed_fields() {
    let mut record = bare_record(AuthSource::Oidc, false);
    merge(&mut record, json!({ "issuerUri": false }));
    assert_eq!(invalid_field(decode(&record)), "issuerUri");
}
