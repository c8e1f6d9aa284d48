//! # Authentication
//!
//! Resolves the project and the credentials a [`crate::VisionClient`] acts with.
//!
//! Explicit values always win. Missing values are asked from a [`CredentialsProvider`],
//! which by default is the captured [`Environment`]. Minting tokens (service accounts,
//! metadata server, ...) is left to providers implemented outside of this crate.
use crate::config::{self, Environment};
use std::fmt;

/// Errors raised when the client identity cannot be determined.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error(
        "Could not determine the project: pass one explicitly or set {project} or {legacy}",
        project = config::PROJECT,
        legacy = config::LEGACY_PROJECT
    )]
    MissingProject,
    #[error(
        "Could not determine credentials for scopes {scopes:?}: pass them explicitly or set {token} or {key}",
        token = config::ACCESS_TOKEN,
        key = config::API_KEY
    )]
    MissingCredentials { scopes: Vec<String> },
}

/// Credentials attached to every outgoing request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// An API key, sent as `x-goog-api-key`.
    ApiKey(String),
    /// An OAuth2 access token, sent as `authorization: Bearer <token>`.
    AccessToken(String),
}

impl Credentials {
    pub fn api_key(key: impl Into<String>) -> Self {
        Credentials::ApiKey(key.into())
    }

    pub fn access_token(token: impl Into<String>) -> Self {
        Credentials::AccessToken(token.into())
    }

    /// The header (gRPC metadata) carrying these credentials.
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Credentials::ApiKey(key) => ("x-goog-api-key", key.clone()),
            Credentials::AccessToken(token) => ("authorization", format!("Bearer {token}")),
        }
    }
}

// Secrets must never end up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("Credentials::ApiKey(<redacted>)"),
            Credentials::AccessToken(_) => f.write_str("Credentials::AccessToken(<redacted>)"),
        }
    }
}

/// Supplies the ambient project and credentials when the caller gives none.
pub trait CredentialsProvider: Send + Sync {
    fn default_project(&self) -> Option<String>;

    /// Credentials valid for `scopes`, if any can be found.
    fn default_credentials(&self, scopes: &[&str]) -> Option<Credentials>;
}

impl CredentialsProvider for Environment {
    fn default_project(&self) -> Option<String> {
        self.get(config::PROJECT)
            .or_else(|| self.get(config::LEGACY_PROJECT))
            .map(str::to_string)
    }

    // Tokens and keys from the environment are already scoped by whoever issued them.
    fn default_credentials(&self, _scopes: &[&str]) -> Option<Credentials> {
        if let Some(token) = self.get(config::ACCESS_TOKEN) {
            return Some(Credentials::access_token(token));
        }
        self.get(config::API_KEY).map(Credentials::api_key)
    }
}

/// Resolves the effective project and credentials.
pub(crate) fn resolve(
    provider: &dyn CredentialsProvider,
    project: Option<String>,
    credentials: Option<Credentials>,
    scopes: &[&str],
) -> Result<(String, Credentials), AuthenticationError> {
    let project = project
        .or_else(|| provider.default_project())
        .ok_or(AuthenticationError::MissingProject)?;

    let credentials = credentials
        .or_else(|| provider.default_credentials(scopes))
        .ok_or_else(|| AuthenticationError::MissingCredentials {
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        })?;

    Ok((project, credentials))
}
