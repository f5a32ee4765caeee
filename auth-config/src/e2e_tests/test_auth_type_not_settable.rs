//! Test that the auth type cannot be influenced by input.

use serde_json::json;

use crate::auth::{AuthSource, AuthType, encode};
use crate::e2e_tests::helpers::*;

#[test]
fn test_email_with_oauth2_auth_type_is_form() {
    let config = decode_ok(&json!({
        "source": "email",
        "enable": true,
        "authType": "OAUTH2",
    }));
    assert_eq!(config.auth_type(), AuthType::Form);
}

#[test]
fn test_any_auth_type_on_input_is_ignored() {
    for source in AuthSource::ALL {
        for claimed in [json!("FORM"), json!("OAUTH2"), json!("SAML"), json!(null), json!(3)] {
            let mut record = valid_record(source);
            merge(&mut record, json!({ "authType": claimed }));

            let config = decode_ok(&record);
            assert_eq!(config.auth_type(), source.auth_type());
            assert_eq!(encode(&config)["authType"], source.auth_type().as_str());
        }
    }
}

#[test]
fn test_pinned_name_is_not_settable() {
    for source in AuthSource::ALL {
        let mut record = valid_record(source);
        merge(&mut record, json!({ "name": "Something Else" }));
        assert_eq!(decode_ok(&record).name(), source.key());
    }
}
