use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::error::SignatureResult;
use crate::json::{parse_strict, JsonFormatError};

/// A cosign / sigstore signature: a payload plus annotations.
///
/// Nothing here is verified. Annotations we do not understand are kept, so a
/// stored signature survives producers adding new ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigstoreSignature {
    untrusted_mime_type: String,
    untrusted_payload: Vec<u8>,
    untrusted_annotations: BTreeMap<String, String>,
}

/// Storage form inside a blob.
#[derive(Serialize, Deserialize)]
struct BlobChunk {
    #[serde(rename = "mimeType", default)]
    mime_type: String,
    #[serde(default, with = "base64_bytes")]
    payload: Vec<u8>,
    #[serde(default, deserialize_with = "null_as_empty")]
    annotations: BTreeMap<String, String>,
}

impl SigstoreSignature {
    pub fn new(
        untrusted_mime_type: impl Into<String>,
        untrusted_payload: Vec<u8>,
        untrusted_annotations: BTreeMap<String, String>,
    ) -> Self {
        Self {
            untrusted_mime_type: untrusted_mime_type.into(),
            untrusted_payload,
            untrusted_annotations,
        }
    }

    pub fn untrusted_mime_type(&self) -> &str {
        &self.untrusted_mime_type
    }

    pub fn untrusted_payload(&self) -> &[u8] {
        &self.untrusted_payload
    }

    pub fn untrusted_annotations(&self) -> &BTreeMap<String, String> {
        &self.untrusted_annotations
    }

    pub fn untrusted_annotation(&self, key: &str) -> Option<&str> {
        self.untrusted_annotations.get(key).map(String::as_str)
    }

    pub(super) fn from_blob_chunk(chunk: &[u8]) -> SignatureResult<Self> {
        let value = parse_strict(chunk)?;
        let repr: BlobChunk = serde_json::from_value(value).map_err(|e| JsonFormatError::Syntax {
            message: e.to_string(),
        })?;
        Ok(Self {
            untrusted_mime_type: repr.mime_type,
            untrusted_payload: repr.payload,
            untrusted_annotations: repr.annotations,
        })
    }

    pub(super) fn to_blob_chunk(&self) -> SignatureResult<Vec<u8>> {
        let repr = BlobChunk {
            mime_type: self.untrusted_mime_type.clone(),
            payload: self.untrusted_payload.clone(),
            annotations: self.untrusted_annotations.clone(),
        };
        serde_json::to_vec(&repr).map_err(|e| {
            JsonFormatError::Syntax {
                message: e.to_string(),
            }
            .into()
        })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

mod base64_bytes {
    use super::BASE64;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => BASE64.decode(s).map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}
