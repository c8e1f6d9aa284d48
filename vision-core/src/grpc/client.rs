//! # Dynamic unary client
//!
//! [`GrpcClient`] performs one unary method of the embedded schema. Payloads are the JSON wire
//! model, transcoded by [`super::codec::JsonCodec`]. The HTTP/2 path (`/package.Service/Method`)
//! is derived from the `MethodDescriptor` once, at construction.
//!
//! Server statuses and local failures both surface as [`GrpcRequestError`], so callers only
//! deal with a single error type.
use super::codec::JsonCodec;
use crate::{BoxError, auth::Credentials};
use http::uri::{InvalidUri, PathAndQuery};
use http_body::Body as HttpBody;
use prost_reflect::MethodDescriptor;
use std::str::FromStr;
use tonic::{
    client::GrpcService,
    metadata::{AsciiMetadataKey, AsciiMetadataValue, errors::InvalidMetadataValue},
    transport::Channel,
};

#[derive(thiserror::Error, Debug)]
pub enum GrpcRequestError {
    #[error("Method '{0}' is not part of the embedded schema")]
    MethodNotFound(String),
    #[error("Invalid gRPC path for method '{method}': '{source}'")]
    InvalidPath {
        method: String,
        source: InvalidUri,
    },
    #[error("Internal error, the client was not ready: '{0}'")]
    ClientNotReady(#[source] BoxError),
    #[error("Credentials cannot be sent as '{key}' metadata: '{source}'")]
    InvalidCredentials {
        key: &'static str,
        source: InvalidMetadataValue,
    },
    #[error("gRPC call failed: code={:?} message={:?}", .0.code(), .0.message())]
    Status(tonic::Status),
}

/// A gRPC client bound to a single unary method.
#[derive(Debug, Clone)]
pub struct GrpcClient<S = Channel> {
    grpc: tonic::client::Grpc<S>,
    method: MethodDescriptor,
    path: PathAndQuery,
}

impl<S> GrpcClient<S>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub fn new(service: S, method: MethodDescriptor) -> Result<Self, GrpcRequestError> {
        let path = http_path(&method)?;
        Ok(Self {
            grpc: tonic::client::Grpc::new(service),
            method,
            path,
        })
    }

    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    /// Sends `payload` with `credentials` attached and returns the JSON response.
    pub async fn unary(
        &mut self,
        payload: serde_json::Value,
        credentials: &Credentials,
    ) -> Result<serde_json::Value, GrpcRequestError> {
        let request = build_request(payload, credentials)?;

        self.grpc
            .ready()
            .await
            .map_err(|e| GrpcRequestError::ClientNotReady(e.into()))?;

        let codec = JsonCodec::for_method(&self.method);
        self.grpc
            .unary(request, self.path.clone(), codec)
            .await
            .map(tonic::Response::into_inner)
            .map_err(GrpcRequestError::Status)
    }
}

fn http_path(method: &MethodDescriptor) -> Result<PathAndQuery, GrpcRequestError> {
    let path = format!("/{}/{}", method.parent_service().full_name(), method.name());
    PathAndQuery::try_from(path).map_err(|source| GrpcRequestError::InvalidPath {
        method: method.full_name().to_string(),
        source,
    })
}

fn build_request<T>(
    payload: T,
    credentials: &Credentials,
) -> Result<tonic::Request<T>, GrpcRequestError> {
    let (key, value) = credentials.header();
    let value = AsciiMetadataValue::from_str(&value)
        .map_err(|source| GrpcRequestError::InvalidCredentials { key, source })?;

    let mut request = tonic::Request::new(payload);
    request
        .metadata_mut()
        .insert(AsciiMetadataKey::from_static(key), value);
    Ok(request)
}
