//! # Configuration
//!
//! The client never reads the process environment on its own. Instead, the environment is
//! captured once into an [`Environment`] value at the process boundary (usually in `main`)
//! and handed to [`crate::ClientBuilder::environment`].
//!
//! Tests and embedders can build an [`Environment`] from any key/value source, which keeps
//! transport and credential resolution deterministic.
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Disables the gRPC transport when set to any non-empty value.
pub const DISABLE_GRPC: &str = "GOOGLE_CLOUD_DISABLE_GRPC";
/// Preferred variable holding the default project.
pub const PROJECT: &str = "GOOGLE_CLOUD_PROJECT";
/// Legacy variable holding the default project, used when [`PROJECT`] is unset.
pub const LEGACY_PROJECT: &str = "GCLOUD_PROJECT";
/// API key used when no explicit credentials are given.
pub const API_KEY: &str = "GOOGLE_API_KEY";
/// OAuth2 bearer token used when no explicit credentials are given.
pub const ACCESS_TOKEN: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

const KNOWN_VARIABLES: &[&str] = &[DISABLE_GRPC, PROJECT, LEGACY_PROJECT, API_KEY, ACCESS_TOKEN];

/// The wire protocol used to reach the annotation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Protobuf over gRPC (HTTP/2).
    Grpc,
    /// JSON over HTTP/1.1.
    Http,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Grpc => write!(f, "grpc"),
            Transport::Http => write!(f, "http"),
        }
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grpc" => Ok(Transport::Grpc),
            "http" => Ok(Transport::Http),
            other => Err(format!(
                "Unknown transport '{other}'. Expected 'grpc' or 'http'"
            )),
        }
    }
}

/// A snapshot of the environment variables the client cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// An environment with no variables set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads the known variables from the current process environment.
    ///
    /// Call this at the process boundary only.
    pub fn capture() -> Self {
        KNOWN_VARIABLES
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (*key, value)))
            .collect()
    }

    /// Returns the value of `key`, treating empty strings as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Whether the gRPC transport has been disabled.
    pub fn grpc_disabled(&self) -> bool {
        self.get(DISABLE_GRPC).is_some()
    }

    /// The transport to use when the caller does not pick one explicitly.
    pub fn default_transport(&self) -> Transport {
        if self.grpc_disabled() {
            Transport::Http
        } else {
            Transport::Grpc
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
