#![no_main]

use imagesig::{UntrustedSigstorePayload, UntrustedSimpleSigningPayload};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = UntrustedSigstorePayload::from_json(data) {
        // An empty reference decodes but is refused on encode.
        if let Ok(json) = payload.to_json() {
            let again = UntrustedSigstorePayload::from_json(&json).expect("encoded payload decodes");
            assert_eq!(payload, again);
        }
    }
    let _ = UntrustedSimpleSigningPayload::from_json(data);
});
