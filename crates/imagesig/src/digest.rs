//! Manifest digests in `algorithm:hex` form.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest as _, Sha256, Sha384, Sha512};

/// Digest algorithms accepted in signed payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// The algorithm prefix, e.g. `sha256`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "sha256" => Some(Self::Sha256),
            "sha384" => Some(Self::Sha384),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }

    fn hex_len(self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }

    /// Hash `data` with this algorithm.
    pub fn hash(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A syntactically valid digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: DigestAlgorithm,
    value: String,
}

/// Why a digest string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DigestError {
    #[error("invalid digest format {0:?}")]
    Format(String),
    #[error("unsupported digest algorithm {0:?}")]
    Algorithm(String),
    #[error("invalid {algorithm} digest value {value:?}")]
    Value {
        algorithm: DigestAlgorithm,
        value: String,
    },
}

impl Digest {
    /// Parses and validates `algorithm:hex`.
    pub fn parse(s: &str) -> Result<Self, DigestError> {
        let (algorithm, value) = s
            .split_once(':')
            .filter(|(a, v)| !a.is_empty() && !v.is_empty())
            .ok_or_else(|| DigestError::Format(s.to_string()))?;
        let algorithm =
            DigestAlgorithm::parse(algorithm).ok_or_else(|| DigestError::Algorithm(algorithm.to_string()))?;

        let valid = value.len() == algorithm.hex_len()
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !valid {
            return Err(DigestError::Value {
                algorithm,
                value: value.to_string(),
            });
        }
        Ok(Self {
            algorithm,
            value: value.to_string(),
        })
    }

    /// The SHA-256 digest of `data`.
    pub fn sha256_of(data: &[u8]) -> Self {
        Self::from_parts(DigestAlgorithm::Sha256, data)
    }

    fn from_parts(algorithm: DigestAlgorithm, data: &[u8]) -> Self {
        Self {
            algorithm,
            value: hex::encode(algorithm.hash(data)),
        }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// The lowercase hex part.
    pub fn hex(&self) -> &str {
        &self.value
    }

    /// Whether `data` hashes to this digest, using this digest's algorithm.
    pub fn matches(&self, data: &[u8]) -> bool {
        Self::from_parts(self.algorithm, data) == *self
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.value)
    }
}

impl FromStr for Digest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

pub(crate) fn sha256_bytes(bytes: &[u8]) -> Vec<u8> {
    DigestAlgorithm::Sha256.hash(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX64: &str = "43955d6857268cc948ae9b370b221091057de83c4962da0826f9a2bdc9bd6b44";

    #[test]
    fn test_parses_valid_digests() {
        let d = Digest::parse(&format!("sha256:{HEX64}")).unwrap();
        assert_eq!(d.algorithm(), DigestAlgorithm::Sha256);
        assert_eq!(d.hex(), HEX64);
        assert_eq!(d.to_string(), format!("sha256:{HEX64}"));

        let long = "a".repeat(128);
        assert!(Digest::parse(&format!("sha512:{long}")).is_ok());
    }

    #[test]
    fn test_rejects_malformed_digests() {
        for input in [
            "",
            "sha256",
            "sha256:",
            ":abc",
            "sha256:../..",
            "sha256:ABCDEF",
            &format!("sha256:{}", HEX64.to_uppercase()),
            &format!("sha256:{}", &HEX64[1..]),
            &format!("sha384:{HEX64}"),
        ] {
            assert!(Digest::parse(input).is_err(), "{input:?}");
        }
        assert!(matches!(
            Digest::parse(&format!("md5:{HEX64}")),
            Err(DigestError::Algorithm(a)) if a == "md5"
        ));
    }

    #[test]
    fn test_sha256_of_matches_known_vector() {
        let d = Digest::sha256_of(b"");
        assert_eq!(
            d.to_string(),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(d.matches(b""));
        assert!(!d.matches(b"x"));
    }
}
