//! Simple signing: an "atomic container signature" payload signed by an
//! external mechanism (usually OpenPGP).
//!
//! The mechanism is opaque to this crate; it turns bytes into a signature and
//! back, reporting which key identity signed.

use crate::config::SigningConfig;
use crate::error::{SignatureError, SignatureResult};
use crate::payload::{AcceptanceRules, ExpectedImage, PayloadContents};
use crate::signature::{Signature, SimpleSigningSignature};

/// `critical.type` of a simple signing payload.
pub const SIMPLE_SIGNING_TYPE: &str = "atomic container signature";

/// A way to sign binary blobs and verify those signatures.
pub trait SigningMechanism {
    /// Creates a non-detached signature of `input` using `key_identity`.
    fn sign(&self, input: &[u8], key_identity: &str) -> SignatureResult<Vec<u8>>;

    /// Verifies `unverified_signature`, returning the signed contents and the signer's key identity.
    fn verify(&self, unverified_signature: &[u8]) -> SignatureResult<(Vec<u8>, String)>;
}

/// Parsed contents of a simple signing payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntrustedSimpleSigningPayload {
    contents: PayloadContents,
}

impl UntrustedSimpleSigningPayload {
    pub fn with_config(
        docker_manifest_digest: impl Into<String>,
        docker_reference: impl Into<String>,
        config: &SigningConfig,
    ) -> Self {
        Self {
            contents: PayloadContents {
                docker_manifest_digest: docker_manifest_digest.into(),
                docker_reference: docker_reference.into(),
                creator_id: config.creator(),
                timestamp: config.timestamp(),
            },
        }
    }

    pub fn untrusted_docker_manifest_digest(&self) -> &str {
        &self.contents.docker_manifest_digest
    }

    pub fn untrusted_docker_reference(&self) -> &str {
        &self.contents.docker_reference
    }

    pub fn untrusted_creator_id(&self) -> Option<&str> {
        self.contents.creator_id.as_deref()
    }

    pub fn untrusted_timestamp(&self) -> Option<i64> {
        self.contents.timestamp
    }

    pub fn to_json(&self) -> SignatureResult<Vec<u8>> {
        self.contents.to_json(SIMPLE_SIGNING_TYPE)
    }

    pub fn from_json(data: &[u8]) -> SignatureResult<Self> {
        PayloadContents::from_json(data, SIMPLE_SIGNING_TYPE).map(|contents| Self { contents })
    }
}

/// Acceptance rules for simple signing, which also name the accepted signers.
pub trait SimpleSigningRules: AcceptanceRules {
    fn validate_key_identity(&self, key_identity: &str) -> SignatureResult<()>;
}

/// Accepts one image signed by any of a set of key identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBy {
    pub key_identities: Vec<String>,
    pub image: ExpectedImage,
}

impl AcceptanceRules for SignedBy {
    fn validate_manifest_digest(&self, digest: &str) -> SignatureResult<()> {
        self.image.validate_manifest_digest(digest)
    }

    fn validate_reference(&self, reference: &str) -> SignatureResult<()> {
        self.image.validate_reference(reference)
    }
}

impl SimpleSigningRules for SignedBy {
    fn validate_key_identity(&self, key_identity: &str) -> SignatureResult<()> {
        if !self.key_identities.iter().any(|k| k == key_identity) {
            return Err(SignatureError::policy(format!(
                "signature by key {key_identity} is not accepted"
            )));
        }
        Ok(())
    }
}

/// Signs `docker_manifest_digest` and `docker_reference` with `mechanism`.
pub fn sign_simple_signing(
    mechanism: &dyn SigningMechanism,
    docker_manifest_digest: &str,
    docker_reference: &str,
    key_identity: &str,
    config: &SigningConfig,
) -> SignatureResult<Signature> {
    let payload =
        UntrustedSimpleSigningPayload::with_config(docker_manifest_digest, docker_reference, config)
            .to_json()?;
    let signature = mechanism.sign(&payload, key_identity)?;
    tracing::debug!(key_identity, "created simple signing signature");
    Ok(SimpleSigningSignature::new(signature).into())
}

/// Verifies a simple signing signature and applies `rules`: the key identity
/// first, then the manifest digest, then the reference.
pub fn verify_simple_signing(
    mechanism: &dyn SigningMechanism,
    signature: &SimpleSigningSignature,
    rules: &impl SimpleSigningRules,
) -> SignatureResult<UntrustedSimpleSigningPayload> {
    let (signed, key_identity) = mechanism.verify(signature.untrusted_signature())?;
    rules.validate_key_identity(&key_identity)?;

    let payload = UntrustedSimpleSigningPayload::from_json(&signed)?;
    rules.validate_manifest_digest(payload.untrusted_docker_manifest_digest())?;
    rules.validate_reference(payload.untrusted_docker_reference())?;

    tracing::debug!(key_identity = %key_identity, "simple signing signature accepted");
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ed25519_dalek::{Signer, Verifier};
    use rand::rngs::OsRng;

    use super::*;
    use crate::error::ErrorKind;

    const DIGEST: &str = "sha256:aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const REFERENCE: &str = "example.com/ns/image:latest";

    /// Embeds the key identity, an Ed25519 signature and the contents.
    struct TestMechanism {
        keys: HashMap<String, ed25519_dalek::SigningKey>,
    }

    impl TestMechanism {
        fn new(identities: &[&str]) -> Self {
            let keys = identities
                .iter()
                .map(|id| (id.to_string(), ed25519_dalek::SigningKey::generate(&mut OsRng)))
                .collect();
            Self { keys }
        }
    }

    impl SigningMechanism for TestMechanism {
        fn sign(&self, input: &[u8], key_identity: &str) -> SignatureResult<Vec<u8>> {
            let key = self
                .keys
                .get(key_identity)
                .ok_or_else(|| SignatureError::mechanism("unknown key"))?;
            let mut out = vec![key_identity.len() as u8];
            out.extend_from_slice(key_identity.as_bytes());
            out.extend_from_slice(&key.sign(input).to_bytes());
            out.extend_from_slice(input);
            Ok(out)
        }

        fn verify(&self, sig: &[u8]) -> SignatureResult<(Vec<u8>, String)> {
            let malformed = || SignatureError::mechanism("malformed signature");
            let (&len, rest) = sig.split_first().ok_or_else(malformed)?;
            let len = usize::from(len);
            if rest.len() < len + 64 {
                return Err(malformed());
            }
            let identity = String::from_utf8(rest[..len].to_vec()).map_err(|_| malformed())?;
            let signature = ed25519_dalek::Signature::from_slice(&rest[len..len + 64])
                .map_err(|_| malformed())?;
            let contents = &rest[len + 64..];
            let key = self.keys.get(&identity).ok_or_else(malformed)?;
            key.verifying_key()
                .verify(contents, &signature)
                .map_err(|_| SignatureError::mechanism("signature does not verify"))?;
            Ok((contents.to_vec(), identity))
        }
    }

    fn rules(identities: &[&str]) -> SignedBy {
        SignedBy {
            key_identities: identities.iter().map(|s| s.to_string()).collect(),
            image: ExpectedImage::new(DIGEST, REFERENCE),
        }
    }

    fn simple(sig: Signature) -> SimpleSigningSignature {
        match sig {
            Signature::SimpleSigning(s) => s,
            other => panic!("unexpected format {}", other.format_id()),
        }
    }

    #[test]
    fn test_sign_then_verify() {
        let mech = TestMechanism::new(&["alice"]);
        let config = SigningConfig::default().with_creator_id("test");
        let sig = simple(sign_simple_signing(&mech, DIGEST, REFERENCE, "alice", &config).unwrap());

        let payload = verify_simple_signing(&mech, &sig, &rules(&["alice"])).unwrap();
        assert_eq!(payload.untrusted_docker_manifest_digest(), DIGEST);
        assert_eq!(payload.untrusted_docker_reference(), REFERENCE);
        assert_eq!(payload.untrusted_creator_id(), Some("test"));
        assert!(payload.untrusted_timestamp().is_some());
    }

    #[test]
    fn test_payload_uses_atomic_type() {
        let json = UntrustedSimpleSigningPayload::with_config(DIGEST, REFERENCE, &SigningConfig::default())
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["critical"]["type"], SIMPLE_SIGNING_TYPE);

        // A sigstore payload is not a simple signing payload, and vice versa.
        let err = crate::payload::UntrustedSigstorePayload::from_json(&json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSignature);
    }

    #[test]
    fn test_rejects_unknown_signer_before_parsing() {
        let mech = TestMechanism::new(&["alice", "mallory"]);
        let sig = simple(
            sign_simple_signing(&mech, DIGEST, REFERENCE, "mallory", &SigningConfig::default())
                .unwrap(),
        );
        let err = verify_simple_signing(&mech, &sig, &rules(&["alice"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyRejected);
    }

    #[test]
    fn test_rejects_other_image() {
        let mech = TestMechanism::new(&["alice"]);
        let config = SigningConfig::default();
        let sig = simple(sign_simple_signing(&mech, DIGEST, "example.com/other", "alice", &config).unwrap());
        let err = verify_simple_signing(&mech, &sig, &rules(&["alice"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PolicyRejected);
    }

    #[test]
    fn test_mechanism_errors_propagate() {
        let mech = TestMechanism::new(&["alice"]);
        let err = verify_simple_signing(&mech, &SimpleSigningSignature::new(vec![]), &rules(&["alice"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Mechanism);

        let err = sign_simple_signing(&mech, DIGEST, REFERENCE, "bob", &SigningConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Mechanism);
    }

    #[test]
    fn test_empty_content_is_not_signed() {
        let mech = TestMechanism::new(&["alice"]);
        let err = sign_simple_signing(&mech, "", REFERENCE, "alice", &SigningConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyContent);
    }

    #[test]
    fn test_signed_garbage_is_invalid_signature() {
        let mech = TestMechanism::new(&["alice"]);
        let sig = SimpleSigningSignature::new(mech.sign(b"{\"critical\":1}", "alice").unwrap());
        let err = verify_simple_signing(&mech, &sig, &rules(&["alice"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSignature);
    }
}
