use annotator_service::ImageAnnotatorServer;
use fake_annotator_impl::{API_KEY, FakeAnnotator};
use vision_core::transport::{AnnotateRequest, GrpcVisionApi};
use vision_core::{
    AnnotateError, Credentials, Feature, FeatureType, ImageError, ImageSource, Likelihood, Vertex,
};


fn api(credentials: Credentials) -> GrpcVisionApi<ImageAnnotatorServer<FakeAnnotator>> {
    GrpcVisionApi::from_service(ImageAnnotatorServer::new(FakeAnnotator), credentials)
}

fn request(source: ImageSource, features: &[Feature]) -> AnnotateRequest {
    AnnotateRequest {
        source,
        features: features.to_vec(),
    }
}

#[tokio::test]
async fn test_labels_from_content() {
    let api = api(Credentials::api_key(API_KEY));

    let responses = api
        .annotate(&[request(
            ImageSource::content(b"kitten".to_vec()),
            &[Feature::with_max_results(FeatureType::LabelDetection, 2)],
        )])
        .await
        .unwrap();

    let annotations = responses[0].as_ref().unwrap();
    let labels: Vec<_> = annotations
        .labels
        .iter()
        .map(|l| l.description.as_str())
        .collect();
    assert_eq!(labels, vec!["kitten #0", "kitten #1"]);
    assert_eq!(annotations.labels[0].score, 0.75);
}

#[tokio::test]
async fn test_batch_keeps_order_and_per_image_errors() {
    let api = api(Credentials::access_token("token"));

    let responses = api
        .annotate(&[
            request(
                ImageSource::source_uri("gs://bucket/dog.png"),
                &[Feature::with_max_results(FeatureType::LabelDetection, 1)],
            ),
            request(
                ImageSource::source_uri("https://example.com/broken.png"),
                &[Feature::new(FeatureType::LabelDetection)],
            ),
            request(
                ImageSource::source_uri("https://example.com/sign.png"),
                &[
                    Feature::new(FeatureType::TextDetection),
                    Feature::new(FeatureType::SafeSearchDetection),
                ],
            ),
        ])
        .await
        .unwrap();

    assert_eq!(responses.len(), 3);

    let first = responses[0].as_ref().unwrap();
    assert_eq!(first.labels[0].description, "gs://bucket/dog.png #0");

    assert_eq!(
        responses[1],
        Err(ImageError {
            code: 3,
            message: "Bad image data.".to_string()
        })
    );

    let third = responses[2].as_ref().unwrap();
    assert!(third.labels.is_empty());
    assert_eq!(third.texts[0].description, "hello");
    assert_eq!(third.texts[0].locale, "en");
    assert_eq!(
        third.texts[0].bounding_poly.as_ref().unwrap().vertices,
        vec![Vertex { x: 0, y: 0 }, Vertex { x: 10, y: 4 }]
    );
    let safe_search = third.safe_search.unwrap();
    assert_eq!(safe_search.adult, Likelihood::VeryUnlikely);
    assert_eq!(safe_search.racy, Likelihood::Possible);
    assert_eq!(safe_search.medical, Likelihood::Unknown);
}

#[tokio::test]
async fn test_rejected_credentials_surface_as_status() {
    let api = api(Credentials::api_key("wrong-key"));

    let err = api
        .annotate(&[request(
            ImageSource::content(b"kitten".to_vec()),
            &[Feature::new(FeatureType::LabelDetection)],
        )])
        .await
        .unwrap_err();

    match err {
        AnnotateError::Rpc(status) => assert_eq!(status.code(), tonic::Code::Unauthenticated),
        other => panic!("Expected an RPC status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreadable_file_fails_before_the_call() {
    let api = api(Credentials::api_key(API_KEY));

    let err = api
        .annotate(&[request(
            ImageSource::filename("/no/such/image.png"),
            &[Feature::new(FeatureType::LabelDetection)],
        )])
        .await
        .unwrap_err();

    assert!(matches!(err, AnnotateError::ReadImage { .. }));
}
