//! The JSON statement signed by sigstore-style signatures.
//!
//! ```json
//! {"critical": {"type": "cosign container image signature",
//!               "image": {"docker-manifest-digest": "sha256:..."},
//!               "identity": {"docker-reference": "..."}},
//!  "optional": {"creator": "...", "timestamp": 1484683104}}
//! ```
//!
//! `critical` is parsed exactly. `optional` may be `null`, and unknown keys in
//! it are ignored.

use serde_json::{Map, Value};

use crate::config::SigningConfig;
use crate::digest::Digest;
use crate::error::{SignatureError, SignatureResult};
use crate::json::{parse_strict, Fields, JsonFormatError};

/// `critical.type` of a sigstore payload.
pub const SIGSTORE_SIGNATURE_TYPE: &str = "cosign container image signature";

/// Parsed contents of a sigstore signature payload.
///
/// Nothing here is trustworthy unless it came out of
/// [`verify_sigstore_payload`](crate::verify_sigstore_payload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntrustedSigstorePayload {
    pub(crate) contents: PayloadContents,
}

impl UntrustedSigstorePayload {
    /// A payload with the default creator id and the current time.
    pub fn new(
        docker_manifest_digest: impl Into<String>,
        docker_reference: impl Into<String>,
    ) -> Self {
        Self::with_config(docker_manifest_digest, docker_reference, &SigningConfig::default())
    }

    /// A payload whose metadata follows `config`.
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

    pub fn with_creator_id(mut self, creator_id: Option<String>) -> Self {
        self.contents.creator_id = creator_id;
        self
    }

    pub fn with_timestamp(mut self, timestamp: Option<i64>) -> Self {
        self.contents.timestamp = timestamp;
        self
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

    /// Unix seconds.
    pub fn untrusted_timestamp(&self) -> Option<i64> {
        self.contents.timestamp
    }

    /// Serializes the payload for signing.
    ///
    /// Fails if the digest or the reference is empty.
    pub fn to_json(&self) -> SignatureResult<Vec<u8>> {
        self.contents.to_json(SIGSTORE_SIGNATURE_TYPE)
    }

    /// Parses an untrusted payload; any shape problem is an invalid-signature error.
    pub fn from_json(data: &[u8]) -> SignatureResult<Self> {
        PayloadContents::from_json(data, SIGSTORE_SIGNATURE_TYPE).map(|contents| Self { contents })
    }
}

/// Shared shape of sigstore and simple-signing payloads; they differ only in `critical.type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PayloadContents {
    pub(crate) docker_manifest_digest: String,
    pub(crate) docker_reference: String,
    pub(crate) creator_id: Option<String>,
    pub(crate) timestamp: Option<i64>,
}

impl PayloadContents {
    pub(crate) fn to_json(&self, signature_type: &str) -> SignatureResult<Vec<u8>> {
        if self.docker_manifest_digest.is_empty() {
            return Err(SignatureError::EmptyContent {
                field: "docker-manifest-digest",
            });
        }
        if self.docker_reference.is_empty() {
            return Err(SignatureError::EmptyContent {
                field: "docker-reference",
            });
        }

        let mut image = Map::new();
        image.insert(
            "docker-manifest-digest".into(),
            self.docker_manifest_digest.clone().into(),
        );
        let mut identity = Map::new();
        identity.insert("docker-reference".into(), self.docker_reference.clone().into());

        // Keys inserted in sorted order, so the output is the same with or
        // without serde_json's preserve_order.
        let mut critical = Map::new();
        critical.insert("identity".into(), Value::Object(identity));
        critical.insert("image".into(), Value::Object(image));
        critical.insert("type".into(), signature_type.into());

        let mut optional = Map::new();
        if let Some(creator) = &self.creator_id {
            optional.insert("creator".into(), creator.clone().into());
        }
        if let Some(timestamp) = self.timestamp {
            optional.insert("timestamp".into(), timestamp.into());
        }

        let mut root = Map::new();
        root.insert("critical".into(), Value::Object(critical));
        root.insert("optional".into(), Value::Object(optional));

        serde_json::to_vec(&Value::Object(root)).map_err(|e| {
            JsonFormatError::Syntax {
                message: e.to_string(),
            }
            .into()
        })
    }

    pub(crate) fn from_json(data: &[u8], signature_type: &str) -> SignatureResult<Self> {
        Self::strict_from_json(data, signature_type).map_err(SignatureError::into_invalid_signature)
    }

    fn strict_from_json(data: &[u8], signature_type: &str) -> SignatureResult<Self> {
        let mut root = Fields::exact(parse_strict(data)?, &["critical", "optional"])?;

        let (creator_id, timestamp) = match root.take_raw("optional")? {
            Value::Null => (None, None),
            optional => {
                let mut optional = Fields::lenient(optional).map_err(|e| match e {
                    JsonFormatError::NotAnObject => JsonFormatError::FieldType {
                        key: "optional".into(),
                        message: "not a JSON object or null".into(),
                    },
                    other => other,
                })?;
                let creator_id = optional.take_optional::<String>("creator")?;
                let timestamp = match optional.take_optional::<Value>("timestamp")? {
                    Some(value) => Some(integral_timestamp(&value)?),
                    None => None,
                };
                (creator_id, timestamp)
            }
        };

        let mut critical = root.take_exact("critical", &["type", "image", "identity"])?;
        let t: String = critical.take("type")?;
        if t != signature_type {
            return Err(SignatureError::invalid_signature(format!(
                "unrecognized signature type {t}"
            )));
        }

        let mut image = critical.take_exact("image", &["docker-manifest-digest"])?;
        let digest: String = image.take("docker-manifest-digest")?;
        if let Err(e) = Digest::parse(&digest) {
            return Err(SignatureError::invalid_signature(format!(
                "invalid docker-manifest-digest value {digest:?}: {e}"
            )));
        }

        let mut identity = critical.take_exact("identity", &["docker-reference"])?;
        let docker_reference: String = identity.take("docker-reference")?;

        Ok(Self {
            docker_manifest_digest: digest,
            docker_reference,
            creator_id,
            timestamp,
        })
    }
}

/// JSON numbers may arrive as floats; only integral values are timestamps.
fn integral_timestamp(value: &Value) -> SignatureResult<i64> {
    let not_integer =
        || SignatureError::invalid_signature("field optional.timestamp is not an integer");
    let Value::Number(n) = value else {
        return Err(not_integer());
    };
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(not_integer()),
    }
}

/// Policy decisions applied to a payload after its signature verified.
///
/// Both checks must pass; a cryptographically valid signature is not enough.
pub trait AcceptanceRules {
    fn validate_manifest_digest(&self, digest: &str) -> SignatureResult<()>;
    fn validate_reference(&self, reference: &str) -> SignatureResult<()>;
}

/// Acceptance rules from two closures.
///
/// The fields are named so the two callbacks, which have the same type,
/// cannot be swapped by accident.
pub struct RuleFns<D, R> {
    pub validate_manifest_digest: D,
    pub validate_reference: R,
}

impl<D, R> AcceptanceRules for RuleFns<D, R>
where
    D: Fn(&str) -> SignatureResult<()>,
    R: Fn(&str) -> SignatureResult<()>,
{
    fn validate_manifest_digest(&self, digest: &str) -> SignatureResult<()> {
        (self.validate_manifest_digest)(digest)
    }

    fn validate_reference(&self, reference: &str) -> SignatureResult<()> {
        (self.validate_reference)(reference)
    }
}

/// Accepts exactly one digest and one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedImage {
    pub manifest_digest: String,
    pub reference: String,
}

impl ExpectedImage {
    pub fn new(manifest_digest: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            manifest_digest: manifest_digest.into(),
            reference: reference.into(),
        }
    }
}

impl AcceptanceRules for ExpectedImage {
    fn validate_manifest_digest(&self, digest: &str) -> SignatureResult<()> {
        if digest != self.manifest_digest {
            return Err(SignatureError::policy(format!(
                "signature for digest {digest}, expected {}",
                self.manifest_digest
            )));
        }
        Ok(())
    }

    fn validate_reference(&self, reference: &str) -> SignatureResult<()> {
        if reference != self.reference {
            return Err(SignatureError::policy(format!(
                "signature for reference {reference:?}, expected {:?}",
                self.reference
            )));
        }
        Ok(())
    }
}
