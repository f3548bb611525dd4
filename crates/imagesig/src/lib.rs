//! Container image signature authentication.
//!
//! This crate implements the pieces needed to create and check signatures
//! attached to container images:
//!
//! - Signature envelopes in simple signing, cosign and sigstore formats, and
//!   their self-describing blob encoding
//! - A strict JSON decoder that rejects duplicate, missing and unknown keys
//! - The signed payload binding a manifest digest to a docker reference
//! - Verification against several candidate public keys, followed by
//!   caller-supplied acceptance rules
//! - Cross-checking a Rekor signed entry timestamp (SET) against the
//!   signature it claims to log
//!
//! Everything parsed from a signature is "untrusted" until verification
//! returns it; accessor names say so.
//!
//! # Quick Start
//!
//! ```
//! use imagesig::{
//!     sign_sigstore, verify_sigstore_signature, ExpectedImage, Signature, SigningConfig,
//!     SigningKey, SigstoreVerifyOptions,
//! };
//!
//! # fn example(key: SigningKey) -> imagesig::SignatureResult<()> {
//! let digest = "sha256:43955d6857268cc948ae9b370b221091057de83c4962da0826f9a2bdc9bd6b44";
//! let reference = "registry.example/app:1.0";
//!
//! let blob = sign_sigstore(&key, digest, reference, &SigningConfig::default())?.to_blob()?;
//!
//! let signature = Signature::from_blob(&blob)?;
//! let options = SigstoreVerifyOptions::new(vec![key.public_key()]);
//! let verified =
//!     verify_sigstore_signature(&signature, &options, &ExpectedImage::new(digest, reference))?;
//! assert_eq!(verified.payload.untrusted_docker_reference(), reference);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `IMAGESIG_CREATOR_ID` | Creator recorded in new payloads (default: `imagesig <version>`) |
//! | `IMAGESIG_OMIT_CREATOR` | Leave the creator out of new payloads |
//! | `IMAGESIG_OMIT_TIMESTAMP` | Leave the timestamp out of new payloads |

pub mod canonicalize;
pub mod config;
pub mod digest;
pub mod error;
pub mod json;
pub mod keys;
pub mod payload;
pub mod policy;
pub mod rekor;
pub mod sign;
pub mod signature;
pub mod simple_signing;
pub mod verify;

pub use config::{SigningConfig, DEFAULT_CREATOR_ID};
pub use digest::{Digest, DigestAlgorithm, DigestError};
pub use error::{ErrorKind, LogCheck, SignatureError, SignatureResult};
pub use json::JsonFormatError;
pub use keys::{KeyMismatch, PublicKey, SigningKey};
pub use payload::{
    AcceptanceRules, ExpectedImage, RuleFns, UntrustedSigstorePayload, SIGSTORE_SIGNATURE_TYPE,
};
pub use policy::{verify_sigstore_signature, SigstoreVerifyOptions, VerifiedSigstoreSignature};
pub use rekor::{verify_rekor_set, HashedRekord, UntrustedRekorPayload, UntrustedRekorSet};
pub use sign::sign_sigstore;
pub use signature::{
    unsupported_format_error, FormatId, Signature, SigstoreSignature, SimpleSigningSignature,
    SIGSTORE_CERTIFICATE_ANNOTATION, SIGSTORE_CHAIN_ANNOTATION, SIGSTORE_SET_ANNOTATION,
    SIGSTORE_SIGNATURE_ANNOTATION, SIGSTORE_SIGNATURE_MIME_TYPE,
};
pub use simple_signing::{
    sign_simple_signing, verify_simple_signing, SignedBy, SigningMechanism, SimpleSigningRules,
    UntrustedSimpleSigningPayload, SIMPLE_SIGNING_TYPE,
};
pub use verify::verify_sigstore_payload;
