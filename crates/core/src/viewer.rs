//! Reader identity and viewer-key derivation.
//!
//! A viewer key is the stable identity surrogate the view deduplication
//! engine counts by: the user id for authenticated readers, or a hashed
//! IP + user-agent composite for anonymous ones. Raw IPs are never
//! persisted; the hash is truncated to bound key cardinality.

use sha2::{Digest, Sha256};

use crate::types::DbId;

/// Hex characters of the SHA-256 digest kept for anonymous keys.
const ANON_KEY_HEX_LEN: usize = 16;

/// Shared fail-soft key for requests with no usable identity signal at
/// all. Such readers dedup against each other; views are best-effort
/// telemetry, so the request is never rejected.
const UNIDENTIFIED_KEY: &str = "anon:unidentified";

/// The identity of one inbound story read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerIdentity {
    /// An authenticated reader.
    User(DbId),
    /// An anonymous reader, identified by request metadata.
    Anonymous {
        /// Client IP as reported by the proxy headers, if any.
        ip: Option<String>,
        /// The `User-Agent` request header, if any.
        user_agent: Option<String>,
    },
}

impl ViewerIdentity {
    /// Build an identity from an optional session user and the request
    /// metadata fallbacks.
    pub fn from_request(user_id: Option<DbId>, ip: Option<&str>, user_agent: Option<&str>) -> Self {
        match user_id {
            Some(id) => Self::User(id),
            None => Self::Anonymous {
                ip: ip.map(str::to_string),
                user_agent: user_agent.map(str::to_string),
            },
        }
    }

    /// Derive the stable viewer key for this identity.
    ///
    /// - `user:<id>` for authenticated readers.
    /// - `anon:<hash16>` for anonymous readers, where `hash16` is the
    ///   first [`ANON_KEY_HEX_LEN`] hex chars of SHA-256 over
    ///   `ip\nuser_agent`.
    /// - [`UNIDENTIFIED_KEY`] when neither signal is present.
    pub fn viewer_key(&self) -> String {
        match self {
            Self::User(id) => format!("user:{id}"),
            Self::Anonymous { ip, user_agent } => {
                if ip.is_none() && user_agent.is_none() {
                    return UNIDENTIFIED_KEY.to_string();
                }
                let mut hasher = Sha256::new();
                hasher.update(ip.as_deref().unwrap_or("").as_bytes());
                hasher.update(b"\n");
                hasher.update(user_agent.as_deref().unwrap_or("").as_bytes());
                let digest = format!("{:x}", hasher.finalize());
                format!("anon:{}", &digest[..ANON_KEY_HEX_LEN])
            }
        }
    }
}
