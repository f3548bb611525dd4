//! Verification of a complete sigstore signature, as stored next to an image.
//!
//! This reads the annotations cosign writes: the base64 signature, and
//! optionally a Rekor bundle and signing certificate.

use chrono::{DateTime, Utc};

use crate::error::{LogCheck, SignatureError, SignatureResult};
use crate::keys::PublicKey;
use crate::payload::{AcceptanceRules, UntrustedSigstorePayload};
use crate::rekor::verify_rekor_set;
use crate::signature::{
    unsupported_format_error, Signature, SIGSTORE_CERTIFICATE_ANNOTATION,
    SIGSTORE_SET_ANNOTATION, SIGSTORE_SIGNATURE_ANNOTATION, SIGSTORE_SIGNATURE_MIME_TYPE,
};
use crate::verify::verify_sigstore_payload_with_key;

/// Which keys to trust when verifying a sigstore signature.
#[derive(Debug, Clone, Default)]
pub struct SigstoreVerifyOptions {
    /// Keys that may have signed the payload.
    pub public_keys: Vec<PublicKey>,

    /// Rekor keys that may have signed the SET. Empty disables the log check.
    pub rekor_public_keys: Vec<PublicKey>,

    /// Fail if the signature carries no SET.
    pub require_rekor_set: bool,
}

impl SigstoreVerifyOptions {
    pub fn new(public_keys: Vec<PublicKey>) -> Self {
        Self {
            public_keys,
            ..Self::default()
        }
    }

    /// Add a signing key.
    pub fn with_public_key(mut self, key: PublicKey) -> Self {
        self.public_keys.push(key);
        self
    }

    /// Check SETs against these Rekor keys.
    pub fn with_rekor_public_keys(mut self, keys: Vec<PublicKey>) -> Self {
        self.rekor_public_keys = keys;
        self
    }

    /// Require a SET.
    pub fn with_require_rekor_set(mut self, require: bool) -> Self {
        self.require_rekor_set = require;
        self
    }
}

/// A sigstore signature that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSigstoreSignature {
    pub payload: UntrustedSigstorePayload,
    /// When the transparency log recorded the signature, if a SET was checked.
    pub log_timestamp: Option<DateTime<Utc>>,
}

/// Verifies a cosign or sigstore `signature` against `options`, applying `rules`.
///
/// With Rekor keys configured, a bundle annotation is cross-checked against
/// the signature, the payload and the signing certificate annotation (or,
/// without one, the key that verified the signature).
pub fn verify_sigstore_signature(
    signature: &Signature,
    options: &SigstoreVerifyOptions,
    rules: &impl AcceptanceRules,
) -> SignatureResult<VerifiedSigstoreSignature> {
    let Some(sig) = signature.as_sigstore() else {
        return Err(unsupported_format_error(signature));
    };

    if sig.untrusted_mime_type() != SIGSTORE_SIGNATURE_MIME_TYPE {
        return Err(SignatureError::invalid_signature(format!(
            "unexpected MIME type for sigstore signature payload: {:?}",
            sig.untrusted_mime_type()
        )));
    }
    let base64_signature = sig
        .untrusted_annotation(SIGSTORE_SIGNATURE_ANNOTATION)
        .ok_or_else(|| {
            SignatureError::invalid_signature(format!(
                "missing {SIGSTORE_SIGNATURE_ANNOTATION} annotation"
            ))
        })?;

    if options.require_rekor_set && options.rekor_public_keys.is_empty() {
        return Err(SignatureError::log(
            LogCheck::Signature,
            "a Rekor SET is required, but no Rekor public keys are trusted",
        ));
    }

    let (payload, key) = verify_sigstore_payload_with_key(
        &options.public_keys,
        sig.untrusted_payload(),
        base64_signature,
        rules,
    )?;

    let log_timestamp = if options.rekor_public_keys.is_empty() {
        None
    } else {
        match sig.untrusted_annotation(SIGSTORE_SET_ANNOTATION) {
            None if options.require_rekor_set => {
                return Err(SignatureError::log(
                    LogCheck::Decode,
                    format!("missing {SIGSTORE_SET_ANNOTATION} annotation"),
                ));
            }
            None => None,
            Some(set) => {
                let key_or_cert = match sig.untrusted_annotation(SIGSTORE_CERTIFICATE_ANNOTATION) {
                    Some(cert) => cert.to_string(),
                    None => key.to_pem()?,
                };
                Some(verify_rekor_set(
                    &options.rekor_public_keys,
                    set.as_bytes(),
                    key_or_cert.as_bytes(),
                    base64_signature,
                    sig.untrusted_payload(),
                )?)
            }
        }
    };

    tracing::debug!(
        format = %signature.format_id(),
        logged = log_timestamp.is_some(),
        "sigstore signature verified"
    );
    Ok(VerifiedSigstoreSignature {
        payload,
        log_timestamp,
    })
}
