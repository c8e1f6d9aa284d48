use serde_json::json;
use vision_core::transport::{AnnotateRequest, HttpVisionApi};
use vision_core::{AnnotateError, Credentials, Feature, FeatureType, ImageSource, Likelihood};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(source: ImageSource, features: &[Feature]) -> AnnotateRequest {
    AnnotateRequest {
        source,
        features: features.to_vec(),
    }
}

#[tokio::test]
async fn test_posts_the_json_model_with_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_json(json!({
            "requests": [{
                "image": { "source": { "gcsImageUri": "gs://bucket/cat.png" } },
                "features": [{ "type": "LABEL_DETECTION", "maxResults": 1 }]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responses": [{
                "labelAnnotations": [{ "mid": "/m/01yrx", "description": "cat", "score": 0.98, "topicality": 0.98 }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpVisionApi::new(&server.uri(), Credentials::api_key("test-key"));
    let responses = api
        .annotate(&[request(
            ImageSource::source_uri("gs://bucket/cat.png"),
            &[Feature::with_max_results(FeatureType::LabelDetection, 1)],
        )])
        .await
        .unwrap();

    let labels = &responses[0].as_ref().unwrap().labels;
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].mid, "/m/01yrx");
    assert_eq!(labels[0].description, "cat");
}

#[tokio::test]
async fn test_access_token_is_sent_as_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .and(header("authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responses": [{
                "safeSearchAnnotation": { "adult": "LIKELY", "violence": "VERY_UNLIKELY" }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpVisionApi::new(&server.uri(), Credentials::access_token("ya29.token"));
    let responses = api
        .annotate(&[request(
            ImageSource::content(b"pixels".to_vec()),
            &[Feature::new(FeatureType::SafeSearchDetection)],
        )])
        .await
        .unwrap();

    let safe_search = responses[0].as_ref().unwrap().safe_search.unwrap();
    assert_eq!(safe_search.adult, Likelihood::Likely);
    assert_eq!(safe_search.violence, Likelihood::VeryUnlikely);
}

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let api = HttpVisionApi::new(&server.uri(), Credentials::api_key("bad"));
    let err = api
        .annotate(&[request(
            ImageSource::content(b"pixels".to_vec()),
            &[Feature::new(FeatureType::LabelDetection)],
        )])
        .await
        .unwrap_err();

    match err {
        AnnotateError::Http { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid.");
        }
        other => panic!("Expected an HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_text_errors_are_kept_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let api = HttpVisionApi::new(&server.uri(), Credentials::api_key("k"));
    let err = api
        .annotate(&[request(ImageSource::content(b"x".to_vec()), &[])])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnnotateError::Http { status: 502, ref message } if message == "upstream unavailable"
    ));
}

#[tokio::test]
async fn test_missing_responses_are_detected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "responses": [] })))
        .mount(&server)
        .await;

    let api = HttpVisionApi::new(&server.uri(), Credentials::api_key("k"));
    let err = api
        .annotate(&[request(ImageSource::content(b"x".to_vec()), &[])])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnnotateError::ResponseCount {
            expected: 1,
            actual: 0
        }
    ));
}

#[test]
fn test_trailing_slashes_are_normalized() {
    let api = HttpVisionApi::new("http://localhost:8080/", Credentials::api_key("k"));
    assert_eq!(api.url(), "http://localhost:8080/v1/images:annotate");
}
