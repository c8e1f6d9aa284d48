use super::{AnnotateError, AnnotateRequest, AnnotateResponse, wire};
use crate::{
    BoxError,
    auth::Credentials,
    grpc::{
        BATCH_ANNOTATE_IMAGES, IMAGE_ANNOTATOR_SERVICE,
        client::{GrpcClient, GrpcRequestError},
        method_descriptor,
    },
};
use http_body::Body as HttpBody;
use prost_reflect::MethodDescriptor;
use tokio::sync::OnceCell;
use tonic::transport::{Channel, Endpoint};

/// Talks to `google.cloud.vision.v1.ImageAnnotator` over gRPC.
///
/// The generic parameter lets tests plug an in-process tonic service instead of a [`Channel`].
#[derive(Debug, Clone)]
pub struct GrpcVisionApi<S = Channel> {
    connection: Connection<S>,
    credentials: Credentials,
}

#[derive(Debug, Clone)]
enum Connection<S> {
    /// Opened by the first call, on the runtime driving it.
    Deferred {
        endpoint: Endpoint,
        connect: fn(&Endpoint) -> S,
        service: OnceCell<S>,
    },
    Ready(S),
}

impl<S> Connection<S> {
    async fn service(&self) -> &S {
        match self {
            Connection::Ready(service) => service,
            Connection::Deferred {
                endpoint,
                connect,
                service,
            } => service.get_or_init(|| async { connect(endpoint) }).await,
        }
    }

    fn is_open(&self) -> bool {
        match self {
            Connection::Ready(_) => true,
            Connection::Deferred { service, .. } => service.initialized(),
        }
    }
}

impl GrpcVisionApi<Channel> {
    /// Creates the adapter for `endpoint`.
    ///
    /// Nothing touches the network or the async runtime here: the channel is created on the
    /// first call and connects lazily from there.
    pub fn new(endpoint: &Endpoint, credentials: Credentials) -> Self {
        Self {
            connection: Connection::Deferred {
                endpoint: endpoint.clone(),
                connect: Endpoint::connect_lazy,
                service: OnceCell::new(),
            },
            credentials,
        }
    }
}

impl<S> GrpcVisionApi<S>
where
    S: tonic::client::GrpcService<tonic::body::Body> + Clone,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    /// Creates the adapter from an existing Tonic service/channel.
    pub fn from_service(service: S, credentials: Credentials) -> Self {
        Self {
            connection: Connection::Ready(service),
            credentials,
        }
    }

    /// Whether the underlying channel has been created.
    pub fn is_connected(&self) -> bool {
        self.connection.is_open()
    }

    /// Calls `BatchAnnotateImages` with all `requests` in a single message.
    #[tracing::instrument(skip_all, fields(transport = "grpc", images = requests.len()))]
    pub async fn annotate(
        &self,
        requests: &[AnnotateRequest],
    ) -> Result<Vec<AnnotateResponse>, AnnotateError> {
        let body = wire::encode_batch(requests).await?;

        let service = self.connection.service().await.clone();
        let mut client = GrpcClient::new(service, batch_annotate_images()?)?;
        let response = client.unary(body, &self.credentials).await?;

        tracing::debug!("received BatchAnnotateImages response");
        wire::decode_batch(response, requests.len())
    }
}

fn batch_annotate_images() -> Result<MethodDescriptor, GrpcRequestError> {
    method_descriptor(IMAGE_ANNOTATOR_SERVICE, BATCH_ANNOTATE_IMAGES).ok_or_else(|| {
        GrpcRequestError::MethodNotFound(format!(
            "{IMAGE_ANNOTATOR_SERVICE}/{BATCH_ANNOTATE_IMAGES}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creating_the_adapter_needs_no_runtime() {
        let endpoint = Endpoint::from_static("https://vision.googleapis.com");
        let api = GrpcVisionApi::new(&endpoint, Credentials::api_key("k"));
        assert!(!api.is_connected());
    }

    #[tokio::test]
    async fn the_channel_is_created_by_the_first_call() {
        // Nothing listens on the discard port, the call fails but the channel exists.
        let endpoint = Endpoint::from_static("http://127.0.0.1:9");
        let api = GrpcVisionApi::new(&endpoint, Credentials::api_key("k"));

        let request = AnnotateRequest {
            source: crate::ImageSource::content(b"cat".to_vec()),
            features: vec![crate::FeatureType::LabelDetection.into()],
        };
        assert!(api.annotate(&[request]).await.is_err());
        assert!(api.is_connected());
    }
}
