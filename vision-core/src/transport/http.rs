use super::{AnnotateError, AnnotateRequest, AnnotateResponse, wire};
use crate::auth::Credentials;
use serde::Deserialize;

const ANNOTATE_PATH: &str = "/v1/images:annotate";

/// Error body returned by Google APIs on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetails,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    #[serde(default)]
    message: String,
}

/// Talks to the `images:annotate` REST endpoint with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpVisionApi {
    http: reqwest::Client,
    url: String,
    credentials: Credentials,
}

impl HttpVisionApi {
    /// Creates the adapter for the service rooted at `base_url` (e.g. `https://vision.googleapis.com`).
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, credentials)
    }

    /// Same as [`HttpVisionApi::new`] but reusing an existing `reqwest` client.
    pub fn with_client(http: reqwest::Client, base_url: &str, credentials: Credentials) -> Self {
        Self {
            http,
            url: format!("{}{}", base_url.trim_end_matches('/'), ANNOTATE_PATH),
            credentials,
        }
    }

    /// The full URL requests are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts all `requests` to `images:annotate` in a single body.
    #[tracing::instrument(skip_all, fields(transport = "http", images = requests.len()))]
    pub async fn annotate(
        &self,
        requests: &[AnnotateRequest],
    ) -> Result<Vec<AnnotateResponse>, AnnotateError> {
        let body = wire::encode_batch(requests).await?;

        let (header, value) = self.credentials.header();
        let response = self
            .http
            .post(&self.url)
            .header(header, value)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(AnnotateError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let response = response.json::<serde_json::Value>().await?;
        tracing::debug!("received images:annotate response");
        wire::decode_batch(response, requests.len())
    }
}
