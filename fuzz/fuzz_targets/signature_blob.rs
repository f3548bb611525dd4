#![no_main]

use imagesig::Signature;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must encode again and decode to the same value.
    if let Ok(signature) = Signature::from_blob(data) {
        let blob = signature.to_blob().expect("decoded signature re-encodes");
        let again = Signature::from_blob(&blob).expect("encoded signature decodes");
        assert_eq!(signature, again);
    }
});
