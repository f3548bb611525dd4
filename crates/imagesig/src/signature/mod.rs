//! The signature envelope: a closed set of signature formats and their blob encoding.
//!
//! A blob is either the current form
//!
//! ```text
//! 0x00 <format id> '\n' <format-specific body>
//! ```
//!
//! or, for old simple-signing producers only, the bare OpenPGP signature with
//! no header at all. Decoding accepts both; encoding always writes the
//! current form.

mod simple;
mod sigstore;

use std::fmt;
use std::str::FromStr;

use crate::error::{SignatureError, SignatureResult};

pub use simple::SimpleSigningSignature;
pub use sigstore::SigstoreSignature;

/// MIME type of a cosign "simple signing" payload.
pub const SIGSTORE_SIGNATURE_MIME_TYPE: &str = "application/vnd.dev.cosign.simplesigning.v1+json";
/// Annotation holding the base64 signature over the payload.
pub const SIGSTORE_SIGNATURE_ANNOTATION: &str = "dev.cosignproject.cosign/signature";
/// Annotation holding a PEM signing certificate.
pub const SIGSTORE_CERTIFICATE_ANNOTATION: &str = "dev.sigstore.cosign/certificate";
/// Annotation holding the PEM intermediate certificate chain.
pub const SIGSTORE_CHAIN_ANNOTATION: &str = "dev.sigstore.cosign/chain";
/// Annotation holding a Rekor bundle (SET).
pub const SIGSTORE_SET_ANNOTATION: &str = "dev.sigstore.cosign/bundle";

/// Identifies a signature format in blobs and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatId {
    SimpleSigning,
    Cosign,
    Sigstore,
}

impl FormatId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SimpleSigning => "simple-signing",
            Self::Cosign => "cosign-json",
            Self::Sigstore => "sigstore-json",
        }
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatId {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple-signing" => Ok(Self::SimpleSigning),
            "cosign-json" => Ok(Self::Cosign),
            "sigstore-json" => Ok(Self::Sigstore),
            other => Err(SignatureError::unsupported(format!(
                "unrecognized signature format {other:?}"
            ))),
        }
    }
}

/// An image signature, in any supported format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    /// An opaque OpenPGP signature.
    SimpleSigning(SimpleSigningSignature),
    /// A cosign signature stored under the older format id.
    Cosign(SigstoreSignature),
    /// A sigstore signature.
    Sigstore(SigstoreSignature),
}

impl Signature {
    pub fn format_id(&self) -> FormatId {
        match self {
            Self::SimpleSigning(_) => FormatId::SimpleSigning,
            Self::Cosign(_) => FormatId::Cosign,
            Self::Sigstore(_) => FormatId::Sigstore,
        }
    }

    /// The sigstore-shaped contents, for either of the two JSON formats.
    pub fn as_sigstore(&self) -> Option<&SigstoreSignature> {
        match self {
            Self::Cosign(s) | Self::Sigstore(s) => Some(s),
            Self::SimpleSigning(_) => None,
        }
    }

    /// Decodes a blob as produced by [`Signature::to_blob`], or a legacy bare
    /// simple-signing signature.
    pub fn from_blob(blob: &[u8]) -> SignatureResult<Self> {
        let Some(&first) = blob.first() else {
            return Err(SignatureError::unsupported("empty signature blob"));
        };
        if first != 0x00 {
            if is_legacy_openpgp_tag(first) {
                return Ok(Self::SimpleSigning(SimpleSigningSignature::new(blob.to_vec())));
            }
            return Err(SignatureError::unsupported(format!(
                "unrecognized signature format, starting with binary {first:#x}"
            )));
        }

        let rest = &blob[1..];
        let newline = rest.iter().position(|&b| b == b'\n').ok_or_else(|| {
            SignatureError::unsupported("invalid signature format, missing newline")
        })?;
        let (id, body) = (&rest[..newline], &rest[newline + 1..]);
        if let Some(&b) = id.iter().find(|&&b| !(32..0x7f).contains(&b)) {
            return Err(SignatureError::unsupported(format!(
                "invalid signature format, non-ASCII byte {b:#x}"
            )));
        }
        // Checked to be printable ASCII above.
        let id = String::from_utf8_lossy(id);

        match id.parse::<FormatId>()? {
            FormatId::SimpleSigning => {
                Ok(Self::SimpleSigning(SimpleSigningSignature::new(body.to_vec())))
            }
            FormatId::Cosign => SigstoreSignature::from_blob_chunk(body).map(Self::Cosign),
            FormatId::Sigstore => SigstoreSignature::from_blob_chunk(body).map(Self::Sigstore),
        }
    }

    /// Encodes the signature in the framed form.
    pub fn to_blob(&self) -> SignatureResult<Vec<u8>> {
        let id = self.format_id();
        let body = match self {
            Self::SimpleSigning(s) => s.untrusted_signature().to_vec(),
            Self::Cosign(s) | Self::Sigstore(s) => s.to_blob_chunk()?,
        };
        let mut blob = Vec::with_capacity(id.as_str().len() + body.len() + 2);
        blob.push(0x00);
        blob.extend_from_slice(id.as_str().as_bytes());
        blob.push(b'\n');
        blob.extend_from_slice(&body);
        Ok(blob)
    }
}

impl From<SimpleSigningSignature> for Signature {
    fn from(s: SimpleSigningSignature) -> Self {
        Self::SimpleSigning(s)
    }
}

/// An error for callers that do not handle `signature`'s format.
pub fn unsupported_format_error(signature: &Signature) -> SignatureError {
    SignatureError::unsupported(format!(
        "unsupported signature format {}",
        signature.format_id()
    ))
}

/// First bytes of an OpenPGP message as written by old simple-signing producers:
/// compressed data, one-pass signature or signature packets, in either the old
/// (length type 0-3) or the new packet format.
fn is_legacy_openpgp_tag(b: u8) -> bool {
    matches!(
        b,
        0xa0..=0xa3 | 0xc8 | 0x90..=0x93 | 0xc4 | 0x88..=0x8b | 0xc2
    )
}
