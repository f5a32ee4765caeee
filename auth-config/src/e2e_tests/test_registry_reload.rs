//! Test that registry reloads are atomic under concurrent lookups.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use serde_json::json;

use crate::auth::{AuthConfigError, AuthSource, AuthSourceRegistry, SharedRegistry, decode_with};

const FORM_ONLY: [AuthSource; 2] = [AuthSource::Email, AuthSource::Phone];

#[test]
#[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
fn test_readers_never_see_mixed_registry() {
    let shared = Arc::new(SharedRegistry::new(AuthSourceRegistry::from_sources(
        FORM_ONLY,
    )));
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut observed = 0_u32;
                loop {
                    let snapshot = shared.snapshot();
                    let has_oauth = snapshot.contains("google");
                    // Form-only generation or full generation, never a blend.
                    if has_oauth {
                        assert_eq!(snapshot.len(), AuthSource::ALL.len());
                        assert!(snapshot.contains("saml"));
                    } else {
                        assert_eq!(snapshot.len(), FORM_ONLY.len());
                        assert!(!snapshot.contains("github"));
                    }
                    observed += 1;
                    if done.load(Ordering::Acquire) {
                        break observed;
                    }
                }
            })
        })
        .collect();

    for round in 0..200 {
        if round % 2 == 0 {
            shared.reload(AuthSourceRegistry::builtin());
        } else {
            shared.reload(AuthSourceRegistry::from_sources(FORM_ONLY));
        }
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        let observed = reader.join().expect("reader thread panicked");
        assert!(observed > 0);
    }
}

#[test]
fn test_old_snapshot_survives_reload() {
    let shared = SharedRegistry::default();
    let old = shared.snapshot();

    shared.reload(AuthSourceRegistry::from_sources(FORM_ONLY));

    let record = json!({"source": "google", "enable": false});
    assert!(decode_with(&old, &record).is_ok());
    assert_eq!(
        decode_with(&shared.snapshot(), &record),
        Err(AuthConfigError::UnknownAuthSource("google".to_string()))
    );
}
