use serde::{Deserialize, Serialize};

/// A kind of analysis to run on an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    LabelDetection,
    LandmarkDetection,
    LogoDetection,
    TextDetection,
    SafeSearchDetection,
}

/// A feature requested for an image, optionally capping the number of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Feature {
    pub kind: FeatureType,
    pub max_results: Option<u32>,
}

impl Feature {
    pub fn new(kind: FeatureType) -> Self {
        Self {
            kind,
            max_results: None,
        }
    }

    pub fn with_max_results(kind: FeatureType, max_results: u32) -> Self {
        Self {
            kind,
            max_results: Some(max_results),
        }
    }
}

impl From<FeatureType> for Feature {
    fn from(kind: FeatureType) -> Self {
        Feature::new(kind)
    }
}

/// A pixel coordinate. Coordinates the service leaves out default to `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingPoly {
    pub vertices: Vec<Vertex>,
}

/// A detected entity: a label, a landmark, a logo or a block of text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityAnnotation {
    /// Opaque entity ID (Knowledge Graph MID), when available.
    pub mid: String,
    /// Language code of `description`, mostly set for text.
    pub locale: String,
    pub description: String,
    pub score: f32,
    pub topicality: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_poly: Option<BoundingPoly>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Likelihood {
    #[default]
    Unknown,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeSearchAnnotation {
    pub adult: Likelihood,
    pub spoof: Likelihood,
    pub medical: Likelihood,
    pub violence: Likelihood,
    pub racy: Likelihood,
}

/// Everything the service found for one image.
///
/// Collections are empty (and `safe_search` is `None`) when the matching feature was not
/// requested or nothing was detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Annotations {
    pub labels: Vec<EntityAnnotation>,
    pub landmarks: Vec<EntityAnnotation>,
    pub logos: Vec<EntityAnnotation>,
    pub texts: Vec<EntityAnnotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safe_search: Option<SafeSearchAnnotation>,
}

/// An error the service reported for a single image of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(default)]
#[error("image annotation failed (code {code}): {message}")]
pub struct ImageError {
    /// A `google.rpc.Code` value.
    pub code: i32,
    pub message: String,
}
