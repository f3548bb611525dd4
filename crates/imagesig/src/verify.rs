//! Verification of a sigstore payload against candidate public keys.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::{SignatureError, SignatureResult};
use crate::keys::PublicKey;
use crate::payload::{AcceptanceRules, UntrustedSigstorePayload};

/// Verifies that `unverified_base64_signature` over `unverified_payload` was
/// made by one of `public_keys`, and that `rules` accept the signed contents.
///
/// Keys are tried in order; a mismatching key is not an error as long as a
/// later one verifies. The payload is parsed only after a key verified the
/// raw bytes, and only once.
pub fn verify_sigstore_payload(
    public_keys: &[PublicKey],
    unverified_payload: &[u8],
    unverified_base64_signature: &str,
    rules: &impl AcceptanceRules,
) -> SignatureResult<UntrustedSigstorePayload> {
    verify_sigstore_payload_with_key(public_keys, unverified_payload, unverified_base64_signature, rules)
        .map(|(payload, _)| payload)
}

/// [`verify_sigstore_payload`], also returning the key that verified.
pub(crate) fn verify_sigstore_payload_with_key<'k>(
    public_keys: &'k [PublicKey],
    unverified_payload: &[u8],
    unverified_base64_signature: &str,
    rules: &impl AcceptanceRules,
) -> SignatureResult<(UntrustedSigstorePayload, &'k PublicKey)> {
    let (key_index, key) =
        verify_with_any_key(public_keys, unverified_payload, unverified_base64_signature)?;

    let payload = UntrustedSigstorePayload::from_json(unverified_payload)?;
    rules.validate_manifest_digest(payload.untrusted_docker_manifest_digest())?;
    rules.validate_reference(payload.untrusted_docker_reference())?;

    tracing::debug!(
        key_index,
        digest = %payload.untrusted_docker_manifest_digest(),
        reference = %payload.untrusted_docker_reference(),
        "sigstore payload accepted"
    );
    Ok((payload, key))
}

/// Returns the index of the first key that verifies the signature, and the key.
fn verify_with_any_key<'k>(
    public_keys: &'k [PublicKey],
    message: &[u8],
    base64_signature: &str,
) -> SignatureResult<(usize, &'k PublicKey)> {
    if public_keys.is_empty() {
        return Err(SignatureError::Verification {
            reason: no_keys_reason(),
        });
    }

    let signature = BASE64
        .decode(base64_signature)
        .map_err(|e| SignatureError::invalid_signature(format!("base64 decoding: {e}")))?;

    find_verifying_key(public_keys, message, &signature)
        .map_err(|reason| SignatureError::Verification { reason })
}

/// Tries each key in order, continuing past mismatches.
///
/// On failure the error lists every key's reason, joined with `", "`.
pub(crate) fn find_verifying_key<'k>(
    public_keys: &'k [PublicKey],
    message: &[u8],
    signature: &[u8],
) -> Result<(usize, &'k PublicKey), String> {
    if public_keys.is_empty() {
        return Err(no_keys_reason());
    }

    let mut failures = Vec::with_capacity(public_keys.len());
    for (key_index, key) in public_keys.iter().enumerate() {
        match key.verify(message, signature) {
            Ok(()) => return Ok((key_index, key)),
            Err(e) => {
                tracing::debug!(key_index, algorithm = key.algorithm(), error = %e, "key did not verify signature");
                failures.push(e.to_string());
            }
        }
    }
    Err(failures.join(", "))
}

fn no_keys_reason() -> String {
    "need at least one public key, got 0".to_string()
}
