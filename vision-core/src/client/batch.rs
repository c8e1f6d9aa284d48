//! # Batch
//!
//! Groups several images into a single annotation request.
use super::{Feature, Image, VisionClient};
use crate::transport::{AnnotateError, AnnotateRequest, AnnotateResponse};

/// A batch of images sent to the service in one call.
#[derive(Debug)]
pub struct Batch<'c> {
    client: &'c VisionClient,
    requests: Vec<AnnotateRequest>,
}

impl<'c> Batch<'c> {
    pub(crate) fn new(client: &'c VisionClient) -> Self {
        Self {
            client,
            requests: Vec::new(),
        }
    }

    pub fn client(&self) -> &'c VisionClient {
        self.client
    }

    /// Queues `image` with the features to detect on it.
    ///
    /// The image must come from the client this batch was started on.
    pub fn add_image(&mut self, image: Image<'c>, features: Vec<Feature>) {
        debug_assert!(
            std::ptr::eq(image.client(), self.client),
            "image was created by a different client than the batch"
        );
        self.requests.push(image.into_request(features));
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Sends every queued image in one request.
    ///
    /// Returns one entry per queued image, in the order they were added. The batch is emptied
    /// on success and left untouched on error. An empty batch returns an empty vector without
    /// contacting the service.
    pub async fn detect(&mut self) -> Result<Vec<AnnotateResponse>, AnnotateError> {
        if self.requests.is_empty() {
            return Ok(Vec::new());
        }

        let responses = self.client.vision_api().annotate(&self.requests).await?;
        self.requests.clear();
        Ok(responses)
    }
}
