//! Public and private keys for sigstore-style signatures.
//!
//! Keys are exchanged as SubjectPublicKeyInfo (SPKI), DER or single-block PEM.
//! Supported algorithms are Ed25519 and ECDSA P-256 with SHA-256; ECDSA
//! signatures are ASN.1 DER encoded, as produced by cosign and Rekor.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{Signer as _, Verifier as _};
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};

use crate::digest::sha256_bytes;
use crate::error::{SignatureError, SignatureResult};

/// A candidate key for signature verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Ed25519(ed25519_dalek::VerifyingKey),
    EcdsaP256(p256::ecdsa::VerifyingKey),
}

/// Why a single key did not validate a signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyMismatch {
    #[error("malformed {algorithm} signature: {message}")]
    Malformed {
        algorithm: &'static str,
        message: String,
    },
    #[error("{algorithm} signature does not match")]
    Mismatch { algorithm: &'static str },
}

impl PublicKey {
    /// Decodes an SPKI DER public key.
    pub fn from_der(spki: &[u8]) -> SignatureResult<Self> {
        if let Ok(key) = ed25519_dalek::VerifyingKey::from_public_key_der(spki) {
            return Ok(Self::Ed25519(key));
        }
        p256::ecdsa::VerifyingKey::from_public_key_der(spki)
            .map(Self::EcdsaP256)
            .map_err(|e| SignatureError::key(format!("unsupported public key: {e}")))
    }

    /// Decodes a public key from exactly one PEM block.
    pub fn from_pem(pem: &[u8]) -> SignatureResult<Self> {
        let (label, der) = decode_single_pem(pem)?;
        if label != "PUBLIC KEY" {
            return Err(SignatureError::key(format!(
                "expected a PUBLIC KEY PEM block, got {label:?}"
            )));
        }
        Self::from_der(&der)
    }

    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Ed25519(_) => "ed25519",
            Self::EcdsaP256(_) => "ecdsa-p256",
        }
    }

    /// Verifies `signature` over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), KeyMismatch> {
        let algorithm = self.algorithm();
        let malformed = |e: &dyn std::fmt::Display| KeyMismatch::Malformed {
            algorithm,
            message: e.to_string(),
        };
        match self {
            Self::Ed25519(key) => {
                let sig = ed25519_dalek::Signature::from_slice(signature).map_err(|e| malformed(&e))?;
                key.verify(message, &sig)
                    .map_err(|_| KeyMismatch::Mismatch { algorithm })
            }
            Self::EcdsaP256(key) => {
                let sig = p256::ecdsa::Signature::from_der(signature).map_err(|e| malformed(&e))?;
                key.verify(message, &sig)
                    .map_err(|_| KeyMismatch::Mismatch { algorithm })
            }
        }
    }

    /// SPKI DER encoding.
    pub fn to_der(&self) -> SignatureResult<Vec<u8>> {
        let doc = match self {
            Self::Ed25519(key) => key.to_public_key_der(),
            Self::EcdsaP256(key) => key.to_public_key_der(),
        }
        .map_err(|e| SignatureError::key(format!("failed to encode public key: {e}")))?;
        Ok(doc.as_bytes().to_vec())
    }

    /// SPKI PEM encoding, as recorded in transparency log entries.
    pub fn to_pem(&self) -> SignatureResult<String> {
        match self {
            Self::Ed25519(key) => key.to_public_key_pem(LineEnding::LF),
            Self::EcdsaP256(key) => key.to_public_key_pem(LineEnding::LF),
        }
        .map_err(|e| SignatureError::key(format!("failed to encode public key: {e}")))
    }

    /// Hex SHA-256 of the SPKI DER encoding. Used to identify keys in logs.
    pub fn key_id(&self) -> SignatureResult<String> {
        Ok(hex::encode(sha256_bytes(&self.to_der()?)))
    }
}

impl From<ed25519_dalek::VerifyingKey> for PublicKey {
    fn from(key: ed25519_dalek::VerifyingKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<p256::ecdsa::VerifyingKey> for PublicKey {
    fn from(key: p256::ecdsa::VerifyingKey) -> Self {
        Self::EcdsaP256(key)
    }
}

/// A private key for creating sigstore-style signatures.
#[derive(Clone)]
pub enum SigningKey {
    Ed25519(ed25519_dalek::SigningKey),
    EcdsaP256(p256::ecdsa::SigningKey),
}

impl SigningKey {
    /// Decodes a PKCS#8 DER private key.
    pub fn from_pkcs8_der(der: &[u8]) -> SignatureResult<Self> {
        if let Ok(key) = ed25519_dalek::SigningKey::from_pkcs8_der(der) {
            return Ok(Self::Ed25519(key));
        }
        p256::ecdsa::SigningKey::from_pkcs8_der(der)
            .map(Self::EcdsaP256)
            .map_err(|e| SignatureError::key(format!("unsupported private key: {e}")))
    }

    /// Decodes an unencrypted PKCS#8 PEM private key.
    pub fn from_pkcs8_pem(pem: &str) -> SignatureResult<Self> {
        let (label, der) = decode_single_pem(pem.as_bytes())?;
        if label != "PRIVATE KEY" {
            return Err(SignatureError::key(format!(
                "expected a PRIVATE KEY PEM block, got {label:?}"
            )));
        }
        Self::from_pkcs8_der(&der)
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::Ed25519(key) => PublicKey::Ed25519(key.verifying_key()),
            Self::EcdsaP256(key) => PublicKey::EcdsaP256(p256::ecdsa::VerifyingKey::from(key)),
        }
    }

    /// Signs `message`; ECDSA signatures are DER encoded.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            Self::Ed25519(key) => key.sign(message).to_bytes().to_vec(),
            Self::EcdsaP256(key) => {
                let sig: p256::ecdsa::Signature = key.sign(message);
                sig.to_der().as_bytes().to_vec()
            }
        }
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl From<ed25519_dalek::SigningKey> for SigningKey {
    fn from(key: ed25519_dalek::SigningKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<p256::ecdsa::SigningKey> for SigningKey {
    fn from(key: p256::ecdsa::SigningKey) -> Self {
        Self::EcdsaP256(key)
    }
}

/// Decodes `data` as exactly one PEM block, returning its label and contents.
///
/// Zero blocks, several blocks, a mismatched END line, or anything but
/// whitespace around the block is rejected. Body lines may be wrapped at any
/// width.
pub fn decode_single_pem(data: &[u8]) -> SignatureResult<(String, Vec<u8>)> {
    let text = std::str::from_utf8(data)
        .map_err(|_| SignatureError::key("PEM data is not valid UTF-8"))?
        .trim();
    match text.matches("-----BEGIN ").count() {
        0 => return Err(SignatureError::key("no PEM block found")),
        1 => {}
        n => return Err(SignatureError::key(format!("expected one PEM block, found {n}"))),
    }
    let rest = text
        .strip_prefix("-----BEGIN ")
        .ok_or_else(|| SignatureError::key("unexpected data before PEM block"))?;
    let (label, rest) = rest
        .split_once("-----")
        .filter(|(label, _)| !label.contains(['\r', '\n']))
        .ok_or_else(|| SignatureError::key("malformed PEM BEGIN line"))?;
    let body = rest
        .strip_suffix(format!("-----END {label}-----").as_str())
        .ok_or_else(|| SignatureError::key(format!("missing END line for PEM block {label:?}")))?;

    let encoded: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let der = BASE64
        .decode(encoded)
        .map_err(|e| SignatureError::key(format!("invalid PEM block: {e}")))?;
    Ok((label.to_string(), der))
}

/// Re-wraps the body of a single PEM block at `width` columns with `newline`.
#[cfg(test)]
pub(crate) fn rewrap_pem(pem: &str, width: usize, newline: &str) -> String {
    let lines: Vec<&str> = pem.lines().collect();
    let (first, last) = (lines[0], lines[lines.len() - 1]);
    let body: String = lines[1..lines.len() - 1].concat();
    let mut out = vec![first.to_string()];
    out.extend(
        body.as_bytes()
            .chunks(width)
            .map(|chunk| String::from_utf8(chunk.to_vec()).unwrap()),
    );
    out.push(last.to_string());
    out.join(newline) + newline
}
