//! # Transport adapters
//!
//! A [`VisionApi`] submits batch annotation requests over one of two wire protocols.
//! The variant is picked once, when a [`crate::VisionClient`] first needs it, and
//! never changes afterwards.
mod grpc;
mod http;
mod wire;

pub use grpc::GrpcVisionApi;
pub use http::HttpVisionApi;

use crate::client::{Annotations, Feature, ImageError, ImageSource};
use crate::config::Transport;
use crate::grpc::client::GrpcRequestError;
use std::path::PathBuf;

/// One image of a batch together with the features to detect on it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotateRequest {
    pub source: ImageSource,
    pub features: Vec<Feature>,
}

/// The outcome for a single image: its annotations, or the error the service reported for it.
pub type AnnotateResponse = Result<Annotations, ImageError>;

/// Errors that can occur while submitting an annotation request.
#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("Failed to read image '{path}': {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON payload: '{0}'")]
    Json(#[source] serde_json::Error),
    #[error("gRPC client request error: '{0}'")]
    Grpc(GrpcRequestError),
    #[error("gRPC call failed: code={:?} message={:?}", .0.code(), .0.message())]
    Rpc(tonic::Status),
    #[error("HTTP request failed: '{0}'")]
    Request(#[from] reqwest::Error),
    #[error("HTTP call failed with status {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Expected {expected} responses from the service, got {actual}")]
    ResponseCount { expected: usize, actual: usize },
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl From<GrpcRequestError> for AnnotateError {
    fn from(err: GrpcRequestError) -> Self {
        match err {
            GrpcRequestError::Status(status) => AnnotateError::Rpc(status),
            other => AnnotateError::Grpc(other),
        }
    }
}

/// The transport adapter a [`crate::VisionClient`] routes its calls through.
#[derive(Debug, Clone)]
pub enum VisionApi {
    Grpc(GrpcVisionApi),
    Http(HttpVisionApi),
}

impl VisionApi {
    /// The wire protocol of this adapter.
    pub fn transport(&self) -> Transport {
        match self {
            VisionApi::Grpc(_) => Transport::Grpc,
            VisionApi::Http(_) => Transport::Http,
        }
    }

    /// Annotates a batch of images in a single call.
    ///
    /// The returned vector holds one entry per request, in request order.
    pub async fn annotate(
        &self,
        requests: &[AnnotateRequest],
    ) -> Result<Vec<AnnotateResponse>, AnnotateError> {
        match self {
            VisionApi::Grpc(api) => api.annotate(requests).await,
            VisionApi::Http(api) => api.annotate(requests).await,
        }
    }
}
