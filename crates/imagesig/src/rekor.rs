//! Rekor signed entry timestamps (SETs).
//!
//! A SET is the log's signature over the canonical JSON of
//! `{"body", "integratedTime", "logIndex", "logID"}`, where `body` is the
//! logged entry. For a sigstore image signature the entry is a `hashedrekord`
//! recording the payload hash, the signature and the signer's key or
//! certificate. [`verify_rekor_set`] checks the log signature and that the
//! entry describes exactly the signature being verified.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::canonicalize::to_canonical_jcs_bytes;
use crate::digest::sha256_bytes;
use crate::error::{LogCheck, SignatureError, SignatureResult};
use crate::json::{parse_strict, Fields, JsonFormatError};
use crate::keys::{decode_single_pem, PublicKey};
use crate::verify::find_verifying_key;

/// `kind` of a hashedrekord entry.
pub const HASHEDREKORD_KIND: &str = "hashedrekord";
/// Supported hashedrekord `apiVersion` values.
pub const HASHEDREKORD_API_VERSIONS: &[&str] = &["0.0.1"];
/// The only hash algorithm accepted in hashedrekord entries.
pub const HASHEDREKORD_SHA256: &str = "sha256";

/// A Rekor SET as stored in a cosign bundle annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct UntrustedRekorSet {
    pub untrusted_signed_entry_timestamp: Vec<u8>,
    /// Kept as JSON; it is canonicalized before verification.
    pub untrusted_payload: Value,
}

impl UntrustedRekorSet {
    pub fn from_json(data: &[u8]) -> Result<Self, JsonFormatError> {
        let mut fields = Fields::parse_exact(data, &["SignedEntryTimestamp", "Payload"])?;
        let set: String = fields.take("SignedEntryTimestamp")?;
        Ok(Self {
            untrusted_signed_entry_timestamp: decode_base64_field("SignedEntryTimestamp", &set)?,
            untrusted_payload: fields.take_raw("Payload")?,
        })
    }

    pub fn to_json(&self) -> SignatureResult<Vec<u8>> {
        let value = json!({
            "SignedEntryTimestamp": BASE64.encode(&self.untrusted_signed_entry_timestamp),
            "Payload": self.untrusted_payload,
        });
        serde_json::to_vec(&value).map_err(|e| {
            JsonFormatError::Syntax {
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// The log entry data signed by a SET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntrustedRekorPayload {
    pub body: Vec<u8>,
    pub integrated_time: i64,
    pub log_index: i64,
    pub log_id: String,
}

impl UntrustedRekorPayload {
    pub fn from_value(value: Value) -> Result<Self, JsonFormatError> {
        let mut fields = Fields::exact(value, &["body", "integratedTime", "logIndex", "logID"])?;
        let body: String = fields.take("body")?;
        Ok(Self {
            body: decode_base64_field("body", &body)?,
            integrated_time: fields.take("integratedTime")?,
            log_index: fields.take("logIndex")?,
            log_id: fields.take("logID")?,
        })
    }

    pub fn from_json(data: &[u8]) -> Result<Self, JsonFormatError> {
        Self::from_value(parse_strict(data)?)
    }

    pub fn to_value(&self) -> Value {
        json!({
            "body": BASE64.encode(&self.body),
            "integratedTime": self.integrated_time,
            "logIndex": self.log_index,
            "logID": self.log_id,
        })
    }

    /// The bytes a log signs to produce a SET for this payload.
    pub fn to_canonical_json(&self) -> SignatureResult<Vec<u8>> {
        to_canonical_jcs_bytes(&self.to_value())
            .map_err(|e| SignatureError::log(LogCheck::Decode, e.to_string()))
    }
}

/// A `hashedrekord` v0.0.1 log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedRekord {
    pub api_version: String,
    pub hash_algorithm: String,
    /// Lowercase hex.
    pub hash_value: String,
    pub signature: Vec<u8>,
    /// PEM public key or certificate, as logged.
    pub public_key: Vec<u8>,
}

impl HashedRekord {
    /// The entry a log records for `signature` over `payload`, made with `key_or_cert_pem`.
    pub fn new(payload: &[u8], signature: &[u8], key_or_cert_pem: &[u8]) -> Self {
        Self {
            api_version: HASHEDREKORD_API_VERSIONS[0].to_string(),
            hash_algorithm: HASHEDREKORD_SHA256.to_string(),
            hash_value: hex::encode(sha256_bytes(payload)),
            signature: signature.to_vec(),
            public_key: key_or_cert_pem.to_vec(),
        }
    }

    /// Parses an entry body, rejecting other kinds and unsupported API versions.
    pub fn from_json(data: &[u8]) -> SignatureResult<Self> {
        let entry_error = |e: JsonFormatError| SignatureError::log(LogCheck::Entry, e.to_string());

        let mut root = Fields::parse_exact(data, &["apiVersion", "kind", "spec"]).map_err(entry_error)?;
        let kind: String = root.take("kind").map_err(entry_error)?;
        if kind != HASHEDREKORD_KIND {
            return Err(SignatureError::log(
                LogCheck::Entry,
                format!("unexpected entry kind {kind:?}"),
            ));
        }
        let api_version: String = root.take("apiVersion").map_err(entry_error)?;
        if !HASHEDREKORD_API_VERSIONS.contains(&api_version.as_str()) {
            return Err(SignatureError::log(
                LogCheck::Entry,
                format!("unsupported hashedrekord apiVersion {api_version:?}"),
            ));
        }

        let mut spec = root.take_exact("spec", &["data", "signature"]).map_err(entry_error)?;
        let mut hash = spec
            .take_exact("data", &["hash"])
            .and_then(|mut data| data.take_exact("hash", &["algorithm", "value"]))
            .map_err(entry_error)?;
        let hash_algorithm: String = hash.take("algorithm").map_err(entry_error)?;
        let hash_value: String = hash.take("value").map_err(entry_error)?;

        let mut signature = spec
            .take_exact("signature", &["content", "publicKey"])
            .map_err(entry_error)?;
        let content: String = signature.take("content").map_err(entry_error)?;
        let public_key: String = signature
            .take_exact("publicKey", &["content"])
            .and_then(|mut key| key.take("content"))
            .map_err(entry_error)?;

        Ok(Self {
            api_version,
            hash_algorithm,
            hash_value,
            signature: decode_base64_field("spec.signature.content", &content).map_err(entry_error)?,
            public_key: decode_base64_field("spec.signature.publicKey.content", &public_key)
                .map_err(entry_error)?,
        })
    }

    pub fn to_json(&self) -> SignatureResult<Vec<u8>> {
        let value = json!({
            "apiVersion": self.api_version,
            "kind": HASHEDREKORD_KIND,
            "spec": {
                "data": {
                    "hash": {"algorithm": self.hash_algorithm, "value": self.hash_value}
                },
                "signature": {
                    "content": BASE64.encode(&self.signature),
                    "publicKey": {"content": BASE64.encode(&self.public_key)}
                }
            }
        });
        serde_json::to_vec(&value).map_err(|e| {
            JsonFormatError::Syntax {
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Verifies that `set_bytes` is a SET, signed by one of `trusted_log_keys`, for
/// a hashedrekord entry of `expected_base64_signature` over `expected_payload`
/// made with `key_or_cert_pem`. Returns the time the log integrated the entry.
///
/// Every check is required; the error names the first one that failed.
pub fn verify_rekor_set(
    trusted_log_keys: &[PublicKey],
    set_bytes: &[u8],
    key_or_cert_pem: &[u8],
    expected_base64_signature: &str,
    expected_payload: &[u8],
) -> SignatureResult<DateTime<Utc>> {
    let set = UntrustedRekorSet::from_json(set_bytes)
        .map_err(|e| SignatureError::log(LogCheck::Decode, format!("decoding SET: {e}")))?;
    let canonical = to_canonical_jcs_bytes(&set.untrusted_payload)
        .map_err(|e| SignatureError::log(LogCheck::Decode, e.to_string()))?;

    let (key_index, _) = find_verifying_key(
        trusted_log_keys,
        &canonical,
        &set.untrusted_signed_entry_timestamp,
    )
    .map_err(|reason| {
        SignatureError::log(
            LogCheck::Signature,
            format!("cryptographic signature verification of Rekor SET failed: {reason}"),
        )
    })?;

    // Parsed from the canonical bytes, which are what the log signed.
    let payload = UntrustedRekorPayload::from_json(&canonical)
        .map_err(|e| SignatureError::log(LogCheck::Decode, format!("decoding SET payload: {e}")))?;
    let entry = HashedRekord::from_json(&payload.body)?;

    let expected_signature = BASE64.decode(expected_base64_signature).map_err(|e| {
        SignatureError::log(LogCheck::SignatureContent, format!("decoding signature: {e}"))
    })?;
    if entry.signature != expected_signature {
        return Err(SignatureError::log(
            LogCheck::SignatureContent,
            "signature in Rekor SET does not match",
        ));
    }

    let (_, logged_key) = decode_single_pem(&entry.public_key)
        .map_err(|e| SignatureError::log(LogCheck::PublicKey, format!("publicKey in Rekor SET: {e}")))?;
    let (_, expected_key) = decode_single_pem(key_or_cert_pem).map_err(|e| {
        SignatureError::log(
            LogCheck::PublicKey,
            format!("key or certificate to match against Rekor SET: {e}"),
        )
    })?;
    if logged_key != expected_key {
        return Err(SignatureError::log(
            LogCheck::PublicKey,
            "publicKey in Rekor SET does not match",
        ));
    }

    if entry.hash_algorithm != HASHEDREKORD_SHA256 {
        return Err(SignatureError::log(
            LogCheck::Entry,
            format!("unexpected hashedrekord hash algorithm {:?}", entry.hash_algorithm),
        ));
    }
    let logged_hash = hex::decode(&entry.hash_value).map_err(|e| {
        SignatureError::log(
            LogCheck::Entry,
            format!("invalid hashedrekord hash value {:?}: {e}", entry.hash_value),
        )
    })?;
    if logged_hash != sha256_bytes(expected_payload) {
        return Err(SignatureError::log(
            LogCheck::PayloadHash,
            "payload in Rekor SET does not match",
        ));
    }

    let integrated_time = DateTime::from_timestamp(payload.integrated_time, 0).ok_or_else(|| {
        SignatureError::log(
            LogCheck::Decode,
            format!("integratedTime {} out of range", payload.integrated_time),
        )
    })?;

    tracing::debug!(
        key_index,
        log_index = payload.log_index,
        log_id = %payload.log_id,
        integrated_time = %integrated_time,
        "Rekor SET verified"
    );
    Ok(integrated_time)
}

fn decode_base64_field(key: &str, value: &str) -> Result<Vec<u8>, JsonFormatError> {
    BASE64.decode(value).map_err(|e| JsonFormatError::FieldType {
        key: key.to_string(),
        message: format!("invalid base64: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::keys::SigningKey;
    use rand::rngs::OsRng;

    // SET payload recorded by the public Rekor instance for a cosign signature.
    const COSIGN_SET_PAYLOAD: &str = include_str!("../tests/data/rekor-set-payload.json");

    struct Fixture {
        log_key: SigningKey,
        signer_pem: String,
        payload: Vec<u8>,
        signature_b64: String,
    }

    impl Fixture {
        fn new() -> Self {
            let signer: SigningKey = p256::ecdsa::SigningKey::random(&mut OsRng).into();
            let payload = br#"{"critical":{"identity":{"docker-reference":"example.com/a"},"image":{"docker-manifest-digest":"sha256:aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"},"type":"cosign container image signature"},"optional":{}}"#.to_vec();
            Self {
                log_key: p256::ecdsa::SigningKey::random(&mut OsRng).into(),
                signer_pem: signer.public_key().to_pem().unwrap(),
                signature_b64: BASE64.encode(signer.sign(&payload)),
                payload,
            }
        }

        fn entry(&self) -> HashedRekord {
            HashedRekord::new(
                &self.payload,
                &BASE64.decode(&self.signature_b64).unwrap(),
                self.signer_pem.as_bytes(),
            )
        }

        fn set_for_body(&self, body: Vec<u8>) -> Vec<u8> {
            let payload = UntrustedRekorPayload {
                body,
                integrated_time: 1670870899,
                log_index: 8949589,
                log_id: "c0d23d6ad406973f9559f3ba2d1ca01f84147d8ffc5b8445c224f98b9591801d".into(),
            };
            let canonical = payload.to_canonical_json().unwrap();
            UntrustedRekorSet {
                untrusted_signed_entry_timestamp: self.log_key.sign(&canonical),
                untrusted_payload: payload.to_value(),
            }
            .to_json()
            .unwrap()
        }

        fn set(&self) -> Vec<u8> {
            self.set_for_body(self.entry().to_json().unwrap())
        }

        fn verify(&self, set: &[u8]) -> SignatureResult<DateTime<Utc>> {
            verify_rekor_set(
                &[self.log_key.public_key()],
                set,
                self.signer_pem.as_bytes(),
                &self.signature_b64,
                &self.payload,
            )
        }
    }

    fn check(err: SignatureError) -> LogCheck {
        match err {
            SignatureError::TransparencyLog { check, .. } => check,
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_verifies_valid_set() {
        let f = Fixture::new();
        let time = f.verify(&f.set()).unwrap();
        assert_eq!(time.timestamp(), 1670870899);
    }

    #[test]
    fn test_any_trusted_log_key_may_sign() {
        let f = Fixture::new();
        let other: SigningKey = p256::ecdsa::SigningKey::random(&mut OsRng).into();
        let set = f.set();
        for keys in [
            vec![f.log_key.public_key(), other.public_key()],
            vec![other.public_key(), f.log_key.public_key()],
        ] {
            let result = verify_rekor_set(
                &keys,
                &set,
                f.signer_pem.as_bytes(),
                &f.signature_b64,
                &f.payload,
            );
            assert!(result.is_ok());
        }

        for keys in [vec![], vec![other.public_key()]] {
            let err = verify_rekor_set(
                &keys,
                &set,
                f.signer_pem.as_bytes(),
                &f.signature_b64,
                &f.payload,
            )
            .unwrap_err();
            assert_eq!(check(err), LogCheck::Signature);
        }
    }

    #[test]
    fn test_invalid_sets_fail_decoding() {
        let f = Fixture::new();
        for set in [&b""[..], b"invalid signature", b"1", b"{}"] {
            assert_eq!(check(f.verify(set).unwrap_err()), LogCheck::Decode);
        }

        let mut value: Value = serde_json::from_slice(&f.set()).unwrap();
        value["unexpected"] = json!(1);
        let set = serde_json::to_vec(&value).unwrap();
        assert_eq!(check(f.verify(&set).unwrap_err()), LogCheck::Decode);
    }

    #[test]
    fn test_duplicate_keys_in_payload_fail_closed() {
        let f = Fixture::new();
        let payload = r#"{"logIndex":1, "integratedTime":2,"body":"abc","logID":"def","body":"ABC"}"#;
        let set = format!(
            r#"{{"SignedEntryTimestamp":"{}","Payload":{payload}}}"#,
            BASE64.encode(f.log_key.sign(payload.as_bytes()))
        );
        assert_eq!(check(f.verify(set.as_bytes()).unwrap_err()), LogCheck::Decode);
    }

    #[test]
    fn test_signed_but_malformed_payload_fails() {
        let f = Fixture::new();
        let set = format!(
            r#"{{"SignedEntryTimestamp":"{}","Payload":{{}}}}"#,
            BASE64.encode(f.log_key.sign(b"{}"))
        );
        assert_eq!(check(f.verify(set.as_bytes()).unwrap_err()), LogCheck::Decode);
    }

    type Mutation = Box<dyn Fn(&mut Value)>;

    fn case(check: LogCheck, mutate: impl Fn(&mut Value) + 'static) -> (LogCheck, Mutation) {
        (check, Box::new(mutate))
    }

    #[test]
    fn test_tampered_entries_are_rejected() {
        let f = Fixture::new();
        let valid: Value = serde_json::from_slice(&f.entry().to_json().unwrap()).unwrap();
        let other_pem = SigningKey::from(p256::ecdsa::SigningKey::random(&mut OsRng))
            .public_key()
            .to_pem()
            .unwrap();

        let cases = vec![
            case(LogCheck::Entry, |v| {
                v.as_object_mut().unwrap().remove("apiVersion");
            }),
            case(LogCheck::Entry, |v| {
                v.as_object_mut().unwrap().remove("kind");
            }),
            case(LogCheck::Entry, |v| {
                v.as_object_mut().unwrap().remove("spec");
            }),
            case(LogCheck::Entry, |v| v["unexpected"] = json!(1)),
            case(LogCheck::Entry, |v| v["apiVersion"] = Value::Null),
            case(LogCheck::Entry, |v| v["apiVersion"] = json!("99.0.99")),
            case(LogCheck::Entry, |v| v["kind"] = json!("notHashedRekord")),
            case(LogCheck::Entry, |v| v["spec"] = json!(1)),
            case(LogCheck::Entry, |v| v["spec"]["data"] = Value::Null),
            case(LogCheck::Entry, |v| v["spec"]["data"]["hash"] = json!(1)),
            case(LogCheck::Entry, |v| v["spec"]["data"]["hash"]["value"] = json!(1)),
            case(LogCheck::Entry, |v| v["spec"]["signature"]["content"] = json!("+")),
            case(LogCheck::Entry, |v| v["spec"]["signature"]["publicKey"] = json!(1)),
            case(LogCheck::Entry, |v| {
                v["spec"]["signature"]["publicKey"]["content"] = Value::Null
            }),
            case(LogCheck::SignatureContent, |v| {
                v["spec"]["signature"]["content"] = json!(BASE64.encode("does not match"))
            }),
            case(LogCheck::SignatureContent, |v| {
                v["spec"]["signature"]["content"] = json!("")
            }),
            case(LogCheck::PublicKey, |v| {
                v["spec"]["signature"]["publicKey"]["content"] = json!(BASE64.encode("not PEM"))
            }),
            case(LogCheck::PublicKey, |v| {
                v["spec"]["signature"]["publicKey"]["content"] = json!("")
            }),
            case(LogCheck::PublicKey, move |v| {
                v["spec"]["signature"]["publicKey"]["content"] = json!(BASE64.encode(&other_pem))
            }),
            case(LogCheck::PayloadHash, |v| {
                v["spec"]["data"]["hash"]["value"] = json!("a".repeat(64))
            }),
            case(LogCheck::PayloadHash, |v| {
                v["spec"]["data"]["hash"]["value"] = json!("aa")
            }),
            case(LogCheck::Entry, |v| {
                v["spec"]["data"]["hash"]["value"] = json!("a".repeat(63))
            }),
            case(LogCheck::Entry, |v| {
                v["spec"]["data"]["hash"]["value"] = json!("zz".repeat(32))
            }),
            case(LogCheck::Entry, |v| {
                v["spec"]["data"]["hash"]["algorithm"] = json!("sha512")
            }),
        ];

        for (expected, mutate) in cases {
            let mut entry = valid.clone();
            mutate(&mut entry);
            let set = f.set_for_body(serde_json::to_vec(&entry).unwrap());
            let err = f.verify(&set).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TransparencyLog);
            assert_eq!(check(err), expected, "{entry}");
        }
    }

    #[test]
    fn test_failures_of_each_log_key_are_reported() {
        let f = Fixture::new();
        let set = f.set();
        let keys = [
            SigningKey::from(p256::ecdsa::SigningKey::random(&mut OsRng)).public_key(),
            SigningKey::from(ed25519_dalek::SigningKey::generate(&mut OsRng)).public_key(),
        ];
        let err = verify_rekor_set(&keys, &set, f.signer_pem.as_bytes(), &f.signature_b64, &f.payload)
            .unwrap_err();
        let SignatureError::TransparencyLog { check, reason } = err else {
            panic!("unexpected error kind");
        };
        assert_eq!(check, LogCheck::Signature);
        assert!(reason.contains("ecdsa-p256 signature does not match"), "{reason}");
        assert!(reason.contains("malformed ed25519 signature"), "{reason}");
    }

    #[test]
    fn test_logged_key_with_other_line_width() {
        let f = Fixture::new();
        for (width, newline) in [(76, "\n"), (48, "\n"), (64, "\r\n")] {
            let mut entry = f.entry();
            entry.public_key = crate::keys::rewrap_pem(&f.signer_pem, width, newline).into_bytes();
            let set = f.set_for_body(entry.to_json().unwrap());
            assert_eq!(f.verify(&set).unwrap().timestamp(), 1670870899, "width {width}");
        }
    }

    #[test]
    fn test_logged_hash_is_compared_as_bytes() {
        let f = Fixture::new();
        let mut entry = f.entry();
        entry.hash_value = entry.hash_value.to_uppercase();
        let set = f.set_for_body(entry.to_json().unwrap());
        assert!(f.verify(&set).is_ok());
    }

    #[test]
    fn test_multiple_pem_blocks_are_rejected() {
        let f = Fixture::new();
        let mut entry = f.entry();
        entry.public_key = f.signer_pem.repeat(2).into_bytes();
        let set = f.set_for_body(entry.to_json().unwrap());
        assert_eq!(check(f.verify(&set).unwrap_err()), LogCheck::PublicKey);

        let set = f.set();
        for key_or_cert in [String::new(), "this is not PEM".into(), f.signer_pem.repeat(2)] {
            let err = verify_rekor_set(
                &[f.log_key.public_key()],
                &set,
                key_or_cert.as_bytes(),
                &f.signature_b64,
                &f.payload,
            )
            .unwrap_err();
            assert_eq!(check(err), LogCheck::PublicKey);
        }
    }

    #[test]
    fn test_changing_signature_payload_or_key_fails() {
        let f = Fixture::new();
        let set = f.set();
        let log_keys = [f.log_key.public_key()];

        let mut signature = BASE64.decode(&f.signature_b64).unwrap();
        signature[0] ^= 1;
        let err = verify_rekor_set(
            &log_keys,
            &set,
            f.signer_pem.as_bytes(),
            &BASE64.encode(&signature),
            &f.payload,
        )
        .unwrap_err();
        assert_eq!(check(err), LogCheck::SignatureContent);

        let mut payload = f.payload.clone();
        payload[0] ^= 1;
        let err = verify_rekor_set(
            &log_keys,
            &set,
            f.signer_pem.as_bytes(),
            &f.signature_b64,
            &payload,
        )
        .unwrap_err();
        assert_eq!(check(err), LogCheck::PayloadHash);

        let other_pem = SigningKey::from(p256::ecdsa::SigningKey::random(&mut OsRng))
            .public_key()
            .to_pem()
            .unwrap();
        let err = verify_rekor_set(&log_keys, &set, other_pem.as_bytes(), &f.signature_b64, &f.payload)
            .unwrap_err();
        assert_eq!(check(err), LogCheck::PublicKey);

        let truncated = &f.signature_b64[..f.signature_b64.len() - 1];
        let err = verify_rekor_set(&log_keys, &set, f.signer_pem.as_bytes(), truncated, &f.payload)
            .unwrap_err();
        assert_eq!(check(err), LogCheck::SignatureContent);

        // Tampering with the SET itself breaks the log signature.
        let mut value: Value = serde_json::from_slice(&set).unwrap();
        value["Payload"]["logIndex"] = json!(1);
        let err = f.verify(&serde_json::to_vec(&value).unwrap()).unwrap_err();
        assert_eq!(check(err), LogCheck::Signature);
    }

    #[test]
    fn test_decodes_cosign_generated_payload() {
        let payload = UntrustedRekorPayload::from_json(COSIGN_SET_PAYLOAD.trim().as_bytes()).unwrap();
        assert_eq!(payload.integrated_time, 1670870899);
        assert_eq!(payload.log_index, 8949589);
        assert_eq!(
            payload.log_id,
            "c0d23d6ad406973f9559f3ba2d1ca01f84147d8ffc5b8445c224f98b9591801d"
        );

        let entry = HashedRekord::from_json(&payload.body).unwrap();
        assert_eq!(entry.api_version, "0.0.1");
        assert_eq!(entry.hash_algorithm, "sha256");
        assert_eq!(
            entry.hash_value,
            "0fd1e9832cc5a5f502e800fe9cdeefbd31362df16fe8c2250d308aea3fb1fc69"
        );
        let (label, _) = decode_single_pem(&entry.public_key).unwrap();
        assert_eq!(label, "CERTIFICATE");

        // Keys are sorted in the signed form, unlike the stored one.
        let canonical = String::from_utf8(payload.to_canonical_json().unwrap()).unwrap();
        assert!(canonical.starts_with(r#"{"body":"eyJhcGlWZXJzaW9uIjoiMC4wLjEi"#));
        assert!(canonical.ends_with(
            r#","integratedTime":1670870899,"logID":"c0d23d6ad406973f9559f3ba2d1ca01f84147d8ffc5b8445c224f98b9591801d","logIndex":8949589}"#
        ));
    }
}
