//! # Vision Client
//!
//! [`VisionClient`] bundles the configuration needed for API requests: the project, the
//! credentials and the transport. It hands out [`Image`] and [`Batch`] request builders and
//! routes their calls through a transport adapter ([`VisionApi`]).
//!
//! The adapter is created on first use and then kept for the lifetime of the client. The
//! client therefore has two states:
//!
//! 1. **Unresolved**: right after [`ClientBuilder::build`]. No channel or HTTP client exists yet.
//! 2. **Resolved**: after the first call to [`VisionClient::vision_api`] (directly or through a
//!    detection). The adapter never changes again, even if the environment does.
//!
//! ## Example: Transport selection
//!
//! ```rust,no_run
//! use vision_core::{Credentials, Environment, Transport, VisionClient};
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! // Explicit transport, ambient project and credentials.
//! let client = VisionClient::builder()
//!     .environment(Environment::capture())
//!     .transport(Transport::Http)
//!     .build()?;
//!
//! // Everything from the environment, `GOOGLE_CLOUD_DISABLE_GRPC` included.
//! let client = VisionClient::from_env()?;
//! # Ok(())
//! # }
//! ```
pub mod batch;
pub mod image;
mod types;

pub use batch::Batch;
pub use image::{Image, ImageSource};
pub use types::*;

use crate::{
    auth::{self, AuthenticationError, Credentials, CredentialsProvider},
    config::{Environment, Transport},
    transport::{GrpcVisionApi, HttpVisionApi, VisionApi},
};
use std::sync::OnceLock;
use tonic::transport::{ClientTlsConfig, Endpoint};

/// Default root of both the gRPC and the REST endpoints.
pub const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com";

/// Errors that can occur when building a [`VisionClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
    #[error("Invalid gRPC endpoint '{0}': {1}")]
    InvalidEndpoint(String, #[source] tonic::transport::Error),
}

/// Client to bundle the configuration needed for Vision API requests.
#[derive(Debug)]
pub struct VisionClient {
    project: String,
    credentials: Credentials,
    transport: Transport,
    grpc_endpoint: Endpoint,
    http_endpoint: String,
    vision_api: OnceLock<VisionApi>,
    #[cfg(test)]
    adapters_built: std::sync::atomic::AtomicUsize,
}

impl VisionClient {
    /// The scopes required for authenticating as a Cloud Vision consumer.
    pub const SCOPE: &'static [&'static str] = &["https://www.googleapis.com/auth/cloud-platform"];

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Builds a client entirely from the current process environment.
    pub fn from_env() -> Result<Self, ClientBuildError> {
        Self::builder().environment(Environment::capture()).build()
    }

    /// The project the client acts on behalf of.
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The transport the adapter is (or will be) built for.
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Starts a new, empty batch of images to annotate in a single request.
    pub fn batch(&self) -> Batch<'_> {
        Batch::new(self)
    }

    /// Creates an [`Image`] bound to this client.
    pub fn image(&self, source: ImageSource) -> Image<'_> {
        Image::new(self, source)
    }

    /// Whether the transport adapter has been created yet.
    pub fn is_transport_resolved(&self) -> bool {
        self.vision_api.get().is_some()
    }

    /// The transport adapter used for every call of this client.
    ///
    /// Built on first access and memoized; concurrent first accesses still build exactly one.
    /// Building it is plain object construction: no I/O, and no async runtime is needed.
    pub fn vision_api(&self) -> &VisionApi {
        self.vision_api.get_or_init(|| {
            tracing::debug!(transport = %self.transport, "resolving vision transport");
            #[cfg(test)]
            self.adapters_built
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            match self.transport {
                Transport::Grpc => VisionApi::Grpc(GrpcVisionApi::new(
                    &self.grpc_endpoint,
                    self.credentials.clone(),
                )),
                Transport::Http => VisionApi::Http(HttpVisionApi::new(
                    &self.http_endpoint,
                    self.credentials.clone(),
                )),
            }
        })
    }
}

/// Builder for [`VisionClient`].
///
/// Unset values are resolved at [`ClientBuilder::build`] time from the configured
/// [`Environment`] (empty by default) or [`CredentialsProvider`].
#[derive(Default)]
pub struct ClientBuilder {
    project: Option<String>,
    credentials: Option<Credentials>,
    transport: Option<Transport>,
    environment: Environment,
    provider: Option<Box<dyn CredentialsProvider>>,
    grpc_endpoint: Option<String>,
    http_endpoint: Option<String>,
}

impl ClientBuilder {
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Forces a transport, ignoring the environment toggle.
    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// The environment snapshot used for defaults.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Replaces the environment as the source of the default project and credentials.
    pub fn credentials_provider(mut self, provider: impl CredentialsProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Overrides the gRPC endpoint (e.g. `http://localhost:50051`).
    pub fn grpc_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.grpc_endpoint = Some(endpoint.into());
        self
    }

    /// Overrides the root of the REST endpoint (e.g. `http://localhost:8080`).
    pub fn http_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.http_endpoint = Some(endpoint.into());
        self
    }

    /// Resolves the identity and the transport. Performs no I/O.
    pub fn build(self) -> Result<VisionClient, ClientBuildError> {
        let provider: &dyn CredentialsProvider = match &self.provider {
            Some(provider) => &**provider,
            None => &self.environment,
        };

        let (project, credentials) =
            auth::resolve(provider, self.project, self.credentials, VisionClient::SCOPE)?;

        let transport = self
            .transport
            .unwrap_or_else(|| self.environment.default_transport());

        let grpc_endpoint =
            grpc_endpoint(self.grpc_endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;
        let http_endpoint = self
            .http_endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        tracing::debug!(%project, %transport, "vision client configured");

        Ok(VisionClient {
            project,
            credentials,
            transport,
            grpc_endpoint,
            http_endpoint,
            vision_api: OnceLock::new(),
            #[cfg(test)]
            adapters_built: Default::default(),
        })
    }
}

fn grpc_endpoint(uri: &str) -> Result<Endpoint, ClientBuildError> {
    let invalid = |source| ClientBuildError::InvalidEndpoint(uri.to_string(), source);

    let endpoint = Endpoint::from_shared(uri.to_string()).map_err(invalid)?;
    if endpoint.uri().scheme_str() == Some("https") {
        endpoint
            .tls_config(ClientTlsConfig::new().with_webpki_roots())
            .map_err(invalid)
    } else {
        Ok(endpoint)
    }
}
