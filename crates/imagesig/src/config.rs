//! Signing configuration.

use serde::{Deserialize, Serialize};

/// Creator id recorded in `optional.creator` unless configured otherwise.
pub const DEFAULT_CREATOR_ID: &str = concat!("imagesig ", env!("CARGO_PKG_VERSION"));

/// What metadata the signing path records next to the digest and reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Value of `optional.creator`.
    #[serde(default = "default_creator_id")]
    pub creator_id: String,

    /// Leave `optional.creator` out.
    #[serde(default)]
    pub omit_creator: bool,

    /// Leave `optional.timestamp` out.
    #[serde(default)]
    pub omit_timestamp: bool,
}

fn default_creator_id() -> String {
    DEFAULT_CREATOR_ID.to_string()
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            creator_id: default_creator_id(),
            omit_creator: false,
            omit_timestamp: false,
        }
    }
}

impl SigningConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `IMAGESIG_CREATOR_ID` | Creator id to record |
    /// | `IMAGESIG_OMIT_CREATOR` | Do not record a creator |
    /// | `IMAGESIG_OMIT_TIMESTAMP` | Do not record a timestamp |
    pub fn from_env() -> Self {
        Self {
            creator_id: std::env::var("IMAGESIG_CREATOR_ID")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(default_creator_id),
            omit_creator: env_flag("IMAGESIG_OMIT_CREATOR"),
            omit_timestamp: env_flag("IMAGESIG_OMIT_TIMESTAMP"),
        }
    }

    /// Set the creator id.
    pub fn with_creator_id(mut self, creator_id: impl Into<String>) -> Self {
        self.creator_id = creator_id.into();
        self
    }

    pub fn with_omit_creator(mut self, omit: bool) -> Self {
        self.omit_creator = omit;
        self
    }

    pub fn with_omit_timestamp(mut self, omit: bool) -> Self {
        self.omit_timestamp = omit;
        self
    }

    pub(crate) fn creator(&self) -> Option<String> {
        (!self.omit_creator).then(|| self.creator_id.clone())
    }

    pub(crate) fn timestamp(&self) -> Option<i64> {
        (!self.omit_timestamp).then(|| chrono::Utc::now().timestamp())
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
