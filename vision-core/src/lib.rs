//! # Vision Core
//!
//! `vision-core` is a client library for the Cloud Vision image annotation API. It can talk to the
//! service over gRPC or over plain HTTP+JSON, and hides that choice behind a single client facade.
//!
//! ## Key Components
//!
//! * **[`VisionClient`]:** The main entry point. It resolves the project and credentials, picks a
//!   transport and lazily builds the matching transport adapter on first use.
//! * **[`Image`] & [`Batch`]:** Request builders bound to a client. An `Image` annotates a single
//!   picture, a `Batch` sends many of them in one request.
//! * **[`Environment`]:** A snapshot of the process environment, taken once at the process boundary
//!   and threaded explicitly into the client builder.
//!
//! ## Internal clients
//!
//! The transport adapters are exposed as well, for callers who want to bypass the facade:
//!
//! * **[`transport::GrpcVisionApi`]:** Calls `ImageAnnotator/BatchAnnotateImages` through the
//!   dynamic [`grpc::client::GrpcClient`], which transcodes the JSON wire model to Protobuf.
//! * **[`transport::HttpVisionApi`]:** Posts the same JSON wire model to `v1/images:annotate`.
//!
//! ## JsonCodec
//!
//! An implementation of `tonic::codec::Codec` that transcodes JSON to Protobuf bytes (and vice versa) on the fly,
//! using the descriptor set compiled from `proto/` at build time.
//!
//! ## Re-exports
//!
//! This crate re-exports `tonic` so consumers can build endpoints and inspect
//! statuses with a compatible version.
//!
//! ## Example
//!
//! ```rust,no_run
//! use vision_core::{Credentials, ImageSource, VisionClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = VisionClient::builder()
//!     .project("my-project")
//!     .credentials(Credentials::api_key("my-key"))
//!     .build()?;
//!
//! let image = client.image(ImageSource::source_uri("gs://my-bucket/cat.png"));
//! let labels = image.detect_labels(5).await?;
//! # Ok(())
//! # }
//! ```
pub mod auth;
pub mod client;
pub mod config;
pub mod grpc;
pub mod transport;

pub use auth::{AuthenticationError, Credentials, CredentialsProvider};
pub use client::{
    Annotations, Batch, BoundingPoly, ClientBuildError, ClientBuilder, EntityAnnotation, Feature,
    FeatureType, Image, ImageError, ImageSource, Likelihood, SafeSearchAnnotation, Vertex,
    VisionClient,
};
pub use config::{Environment, Transport};
pub use transport::{AnnotateError, VisionApi};

// Re-exports
pub use tonic;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
