//! # Wire model
//!
//! The proto3 JSON shape of `BatchAnnotateImages`. The HTTP transport posts it as is, the gRPC
//! transport transcodes it to Protobuf with [`crate::grpc::codec::JsonCodec`].
use super::{AnnotateError, AnnotateRequest, AnnotateResponse};
use crate::client::{
    Annotations, EntityAnnotation, Feature, FeatureType, ImageError, ImageSource,
    SafeSearchAnnotation,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

const GCS_SCHEME: &str = "gs://";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchAnnotateImagesRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageRequest {
    image: WireImage,
    features: Vec<WireFeature>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<WireImageSource>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireImageSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    gcs_image_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_uri: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireFeature {
    #[serde(rename = "type")]
    kind: FeatureType,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BatchAnnotateImagesResponse {
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AnnotateImageResponse {
    label_annotations: Vec<EntityAnnotation>,
    landmark_annotations: Vec<EntityAnnotation>,
    logo_annotations: Vec<EntityAnnotation>,
    text_annotations: Vec<EntityAnnotation>,
    safe_search_annotation: Option<SafeSearchAnnotation>,
    error: Option<ImageError>,
}

impl AnnotateImageResponse {
    // An error with code 0 (OK) is what proto3 JSON yields for an empty status.
    fn into_result(self) -> AnnotateResponse {
        if let Some(error) = self.error.filter(|e| e.code != 0) {
            return Err(error);
        }
        Ok(Annotations {
            labels: self.label_annotations,
            landmarks: self.landmark_annotations,
            logos: self.logo_annotations,
            texts: self.text_annotations,
            safe_search: self.safe_search_annotation,
        })
    }
}

impl From<&Feature> for WireFeature {
    fn from(feature: &Feature) -> Self {
        Self {
            kind: feature.kind,
            max_results: feature.max_results,
        }
    }
}

async fn encode_image(source: &ImageSource) -> Result<WireImage, AnnotateError> {
    let image = match source {
        ImageSource::Content(bytes) => WireImage {
            content: Some(STANDARD.encode(bytes)),
            ..Default::default()
        },
        ImageSource::Filename(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| AnnotateError::ReadImage {
                    path: path.clone(),
                    source,
                })?;
            WireImage {
                content: Some(STANDARD.encode(bytes)),
                ..Default::default()
            }
        }
        ImageSource::SourceUri(uri) if uri.starts_with(GCS_SCHEME) => WireImage {
            source: Some(WireImageSource {
                gcs_image_uri: Some(uri.clone()),
                ..Default::default()
            }),
            ..Default::default()
        },
        ImageSource::SourceUri(uri) => WireImage {
            source: Some(WireImageSource {
                image_uri: Some(uri.clone()),
                ..Default::default()
            }),
            ..Default::default()
        },
    };
    Ok(image)
}

/// Builds the JSON body of a batch annotation request.
///
/// Filename sources are read here, so I/O errors surface at request time.
pub(crate) async fn encode_batch(
    requests: &[AnnotateRequest],
) -> Result<serde_json::Value, AnnotateError> {
    let mut encoded = Vec::with_capacity(requests.len());
    for request in requests {
        encoded.push(AnnotateImageRequest {
            image: encode_image(&request.source).await?,
            features: request.features.iter().map(WireFeature::from).collect(),
        });
    }

    serde_json::to_value(BatchAnnotateImagesRequest { requests: encoded })
        .map_err(AnnotateError::Json)
}

/// Parses a batch annotation response, keeping one entry per request in order.
pub(crate) fn decode_batch(
    body: serde_json::Value,
    expected: usize,
) -> Result<Vec<AnnotateResponse>, AnnotateError> {
    let response: BatchAnnotateImagesResponse =
        serde_json::from_value(body).map_err(AnnotateError::Json)?;

    if response.responses.len() != expected {
        return Err(AnnotateError::ResponseCount {
            expected,
            actual: response.responses.len(),
        });
    }

    Ok(response
        .responses
        .into_iter()
        .map(AnnotateImageResponse::into_result)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Likelihood;
    use serde_json::json;

    fn request(source: ImageSource, features: Vec<Feature>) -> AnnotateRequest {
        AnnotateRequest { source, features }
    }

    #[tokio::test]
    async fn content_is_base64_encoded() {
        let body = encode_batch(&[request(
            ImageSource::content(b"abc".to_vec()),
            vec![Feature::with_max_results(FeatureType::LabelDetection, 3)],
        )])
        .await
        .unwrap();

        assert_eq!(
            body,
            json!({
                "requests": [{
                    "image": { "content": "YWJj" },
                    "features": [{ "type": "LABEL_DETECTION", "maxResults": 3 }]
                }]
            })
        );
    }

    #[tokio::test]
    async fn storage_uris_and_web_uris_use_different_fields() {
        let body = encode_batch(&[
            request(ImageSource::source_uri("gs://bucket/cat.png"), vec![]),
            request(
                ImageSource::source_uri("https://example.com/cat.png"),
                vec![Feature::new(FeatureType::SafeSearchDetection)],
            ),
        ])
        .await
        .unwrap();

        assert_eq!(
            body["requests"][0]["image"],
            json!({ "source": { "gcsImageUri": "gs://bucket/cat.png" } })
        );
        assert_eq!(
            body["requests"][1]["image"],
            json!({ "source": { "imageUri": "https://example.com/cat.png" } })
        );
        assert_eq!(
            body["requests"][1]["features"],
            json!([{ "type": "SAFE_SEARCH_DETECTION" }])
        );
    }

    #[tokio::test]
    async fn missing_files_fail_at_encoding_time() {
        let err = encode_batch(&[request(
            ImageSource::filename("/definitely/not/here.png"),
            vec![],
        )])
        .await
        .unwrap_err();

        assert!(matches!(err, AnnotateError::ReadImage { .. }));
    }

    #[test]
    fn responses_keep_request_order_and_errors() {
        let body = json!({
            "responses": [
                {
                    "labelAnnotations": [{ "description": "cat", "score": 0.9 }],
                    "safeSearchAnnotation": { "adult": "VERY_UNLIKELY", "racy": "POSSIBLE" }
                },
                { "error": { "code": 3, "message": "Bad image data." } },
                {}
            ]
        });

        let responses = decode_batch(body, 3).unwrap();

        let first = responses[0].as_ref().unwrap();
        assert_eq!(first.labels[0].description, "cat");
        let safe_search = first.safe_search.unwrap();
        assert_eq!(safe_search.adult, Likelihood::VeryUnlikely);
        assert_eq!(safe_search.racy, Likelihood::Possible);
        assert_eq!(safe_search.violence, Likelihood::Unknown);

        assert_eq!(
            responses[1],
            Err(ImageError {
                code: 3,
                message: "Bad image data.".to_string()
            })
        );
        assert_eq!(responses[2], Ok(Annotations::default()));
    }

    #[test]
    fn response_count_must_match() {
        let err = decode_batch(json!({ "responses": [{}] }), 2).unwrap_err();
        assert!(matches!(
            err,
            AnnotateError::ResponseCount {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn an_empty_response_body_means_no_responses() {
        assert!(decode_batch(json!({}), 0).unwrap().is_empty());
    }
}
