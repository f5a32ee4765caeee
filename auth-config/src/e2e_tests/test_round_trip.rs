//! Test that encoding then decoding reconstructs the same config.

use crate::auth::{AuthSource, decode, encode};
use crate::e2e_tests::helpers::*;

#[test]
fn test_round_trip_enabled_configs() {
    for source in AuthSource::ALL {
        let config = decode_ok(&valid_record(source));
        assert_eq!(decode(&encode(&config)), Ok(config));
    }
}

#[test]
fn test_round_trip_partial_disabled_configs() {
    for source in AuthSource::ALL {
        let config = decode_ok(&bare_record(source, false));
        assert!(config.id().is_none());
        assert_eq!(decode(&encode(&config)), Ok(config));
    }
}

#[test]
fn test_round_trip_through_serde_json_text() {
    for source in AuthSource::ALL {
        let config = decode_ok(&valid_record(source));
        let text = serde_json::to_string(&config).expect("serializable");
        let back: crate::auth::AuthConfig = serde_json::from_str(&text).expect("decodable");
        assert_eq!(back, config);
    }
}

#[test]
fn test_encoded_form_carries_shared_fields() {
    let encoded = encode(&decode_ok(&valid_record(AuthSource::Saml)));
    assert_eq!(encoded["id"], "saml-1");
    assert_eq!(encoded["source"], "saml");
    assert_eq!(encoded["name"], "saml");
    assert_eq!(encoded["displayLabel"], "Okta");
    assert_eq!(encoded["enable"], true);
    assert_eq!(encoded["enableRegister"], true);
    assert_eq!(encoded["authType"], "SAML");
    assert_eq!(encoded["metadataUrl"], "https://idp.example.com/metadata");
}
