//! # Image
//!
//! A single image bound to a [`VisionClient`], plus shortcuts for the common detections.
use super::{
    Annotations, EntityAnnotation, Feature, FeatureType, SafeSearchAnnotation, VisionClient,
};
use crate::transport::{AnnotateError, AnnotateRequest};
use std::path::PathBuf;

/// Where the pixels of an [`Image`] come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Raw image bytes.
    Content(Vec<u8>),
    /// A local file, read when a request is sent.
    Filename(PathBuf),
    /// A Cloud Storage (`gs://`) or publicly reachable HTTP(S) URI.
    SourceUri(String),
}

impl ImageSource {
    pub fn content(bytes: impl Into<Vec<u8>>) -> Self {
        ImageSource::Content(bytes.into())
    }

    pub fn filename(path: impl Into<PathBuf>) -> Self {
        ImageSource::Filename(path.into())
    }

    pub fn source_uri(uri: impl Into<String>) -> Self {
        ImageSource::SourceUri(uri.into())
    }
}

/// An image to annotate, bound to the client that will send its requests.
#[derive(Debug, Clone)]
pub struct Image<'c> {
    client: &'c VisionClient,
    source: ImageSource,
}

impl<'c> Image<'c> {
    pub(crate) fn new(client: &'c VisionClient, source: ImageSource) -> Self {
        Self { client, source }
    }

    pub fn client(&self) -> &'c VisionClient {
        self.client
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub(crate) fn into_request(self, features: Vec<Feature>) -> AnnotateRequest {
        AnnotateRequest {
            source: self.source,
            features,
        }
    }

    /// Runs the given detections on this image in a single request.
    ///
    /// An error reported by the service for this image is returned as [`AnnotateError::Image`].
    pub async fn detect(&self, features: &[Feature]) -> Result<Annotations, AnnotateError> {
        let request = self.clone().into_request(features.to_vec());

        let response = self
            .client
            .vision_api()
            .annotate(std::slice::from_ref(&request))
            .await?
            .pop()
            .ok_or(AnnotateError::ResponseCount {
                expected: 1,
                actual: 0,
            })?;

        Ok(response?)
    }

    /// Detects up to `limit` labels describing the image.
    pub async fn detect_labels(&self, limit: u32) -> Result<Vec<EntityAnnotation>, AnnotateError> {
        let annotations = self
            .detect(&[Feature::with_max_results(FeatureType::LabelDetection, limit)])
            .await?;
        Ok(annotations.labels)
    }

    /// Detects up to `limit` well-known landmarks.
    pub async fn detect_landmarks(
        &self,
        limit: u32,
    ) -> Result<Vec<EntityAnnotation>, AnnotateError> {
        let annotations = self
            .detect(&[Feature::with_max_results(FeatureType::LandmarkDetection, limit)])
            .await?;
        Ok(annotations.landmarks)
    }

    /// Detects up to `limit` company logos.
    pub async fn detect_logos(&self, limit: u32) -> Result<Vec<EntityAnnotation>, AnnotateError> {
        let annotations = self
            .detect(&[Feature::with_max_results(FeatureType::LogoDetection, limit)])
            .await?;
        Ok(annotations.logos)
    }

    /// Detects text (OCR). The first entry, when present, covers the whole text of the image.
    pub async fn detect_text(&self, limit: u32) -> Result<Vec<EntityAnnotation>, AnnotateError> {
        let annotations = self
            .detect(&[Feature::with_max_results(FeatureType::TextDetection, limit)])
            .await?;
        Ok(annotations.texts)
    }

    /// Rates the likelihood of explicit content.
    pub async fn detect_safe_search(&self) -> Result<Option<SafeSearchAnnotation>, AnnotateError> {
        let annotations = self
            .detect(&[Feature::new(FeatureType::SafeSearchDetection)])
            .await?;
        Ok(annotations.safe_search)
    }
}
