#![no_main]

use imagesig::{verify_rekor_set, HashedRekord, UntrustedRekorPayload, UntrustedRekorSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = UntrustedRekorSet::from_json(data);
    let _ = UntrustedRekorPayload::from_json(data);
    let _ = HashedRekord::from_json(data);
    // No trusted keys: must fail cleanly whatever the input.
    assert!(verify_rekor_set(&[], data, data, "", data).is_err());
});
