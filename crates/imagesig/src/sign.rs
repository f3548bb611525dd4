//! Creating sigstore signatures with a local key.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::config::SigningConfig;
use crate::error::SignatureResult;
use crate::keys::SigningKey;
use crate::payload::UntrustedSigstorePayload;
use crate::signature::{
    Signature, SigstoreSignature, SIGSTORE_SIGNATURE_ANNOTATION, SIGSTORE_SIGNATURE_MIME_TYPE,
};

/// Signs `docker_manifest_digest` and `docker_reference` with `key`.
///
/// The result carries the payload, the signature MIME type and the base64
/// signature annotation, ready for [`Signature::to_blob`] or upload.
pub fn sign_sigstore(
    key: &SigningKey,
    docker_manifest_digest: &str,
    docker_reference: &str,
    config: &SigningConfig,
) -> SignatureResult<Signature> {
    let payload =
        UntrustedSigstorePayload::with_config(docker_manifest_digest, docker_reference, config)
            .to_json()?;
    let signature = key.sign(&payload);

    let annotations = BTreeMap::from([(
        SIGSTORE_SIGNATURE_ANNOTATION.to_string(),
        BASE64.encode(signature),
    )]);
    tracing::debug!(
        algorithm = key.public_key().algorithm(),
        reference = docker_reference,
        "created sigstore signature"
    );
    Ok(Signature::Sigstore(SigstoreSignature::new(
        SIGSTORE_SIGNATURE_MIME_TYPE,
        payload,
        annotations,
    )))
}
