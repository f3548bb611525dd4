//! Error types for signature decoding and verification.
//!
//! Error *kinds* are a stable contract (see [`ErrorKind`]); the human-readable
//! messages are not, and callers must not match on them.

use crate::json::JsonFormatError;

/// Stable classification of a [`SignatureError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed JSON or an unexpected field shape.
    Format,
    /// Unknown or unrecognized blob / format identifier.
    UnsupportedFormat,
    /// Untrusted signature data is not shaped like a signature.
    InvalidSignature,
    /// No candidate key validated the signature.
    Verification,
    /// Cryptographically valid, but rejected by acceptance rules.
    PolicyRejected,
    /// A transparency log co-signature check failed.
    TransparencyLog,
    /// Key material could not be decoded.
    Key,
    /// Refused to serialize an empty digest or reference.
    EmptyContent,
    /// The legacy signing mechanism failed.
    Mechanism,
}

/// Which transparency-log cross-check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCheck {
    /// The SET itself could not be decoded or canonicalized.
    Decode,
    /// No trusted log key validated the SET.
    Signature,
    /// The logged body is not a supported hashedrekord entry.
    Entry,
    /// The logged hash does not match the payload.
    PayloadHash,
    /// The logged signature does not match the signature being verified.
    SignatureContent,
    /// The logged key or certificate does not match.
    PublicKey,
}

impl std::fmt::Display for LogCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Decode => "decode",
            Self::Signature => "signature",
            Self::Entry => "entry",
            Self::PayloadHash => "payload hash",
            Self::SignatureContent => "signature content",
            Self::PublicKey => "public key",
        };
        f.write_str(name)
    }
}

/// Signature errors.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// JSON does not match the expected format.
    #[error(transparent)]
    Format(#[from] JsonFormatError),

    /// The signature format is unknown or not supported by the caller.
    #[error("{message}")]
    UnsupportedFormat { message: String },

    /// Parsing an untrusted signature failed.
    #[error("invalid signature: {reason}")]
    InvalidSignature { reason: String },

    /// Cryptographic verification failed with every candidate key.
    #[error("cryptographic signature verification failed: {reason}")]
    Verification { reason: String },

    /// The signature verified, but its contents were not accepted.
    #[error("signature rejected: {reason}")]
    PolicyRejected { reason: String },

    /// Transparency log verification failed.
    #[error("transparency log verification failed ({check}): {reason}")]
    TransparencyLog { check: LogCheck, reason: String },

    /// A public or private key could not be decoded.
    #[error("invalid key: {message}")]
    Key { message: String },

    /// Refused to create a signature over empty content.
    #[error("unexpected empty signature content: {field}")]
    EmptyContent { field: &'static str },

    /// The signing mechanism failed.
    #[error("signing mechanism error: {message}")]
    Mechanism { message: String },
}

impl SignatureError {
    /// Stable error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format(_) => ErrorKind::Format,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::InvalidSignature { .. } => ErrorKind::InvalidSignature,
            Self::Verification { .. } => ErrorKind::Verification,
            Self::PolicyRejected { .. } => ErrorKind::PolicyRejected,
            Self::TransparencyLog { .. } => ErrorKind::TransparencyLog,
            Self::Key { .. } => ErrorKind::Key,
            Self::EmptyContent { .. } => ErrorKind::EmptyContent,
            Self::Mechanism { .. } => ErrorKind::Mechanism,
        }
    }

    /// A policy rejection, for use by acceptance rules.
    pub fn policy(reason: impl Into<String>) -> Self {
        Self::PolicyRejected {
            reason: reason.into(),
        }
    }

    /// An invalid-signature error.
    pub fn invalid_signature(reason: impl Into<String>) -> Self {
        Self::InvalidSignature {
            reason: reason.into(),
        }
    }

    /// A mechanism failure, for use by [`SigningMechanism`](crate::SigningMechanism) implementations.
    pub fn mechanism(message: impl Into<String>) -> Self {
        Self::Mechanism {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    pub(crate) fn key(message: impl Into<String>) -> Self {
        Self::Key {
            message: message.into(),
        }
    }

    pub(crate) fn log(check: LogCheck, reason: impl Into<String>) -> Self {
        Self::TransparencyLog {
            check,
            reason: reason.into(),
        }
    }

    /// Re-wraps a format error as an invalid-signature error; other kinds pass through.
    pub(crate) fn into_invalid_signature(self) -> Self {
        match self {
            Self::Format(e) => Self::invalid_signature(e.to_string()),
            other => other,
        }
    }

    /// Whether the error says anything about the signer, as opposed to the data shape.
    ///
    /// Useful for callers iterating over several signatures of one image.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Verification | ErrorKind::PolicyRejected | ErrorKind::TransparencyLog
        )
    }
}

/// Result type for signature operations.
pub type SignatureResult<T> = Result<T, SignatureError>;
