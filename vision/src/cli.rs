//! # CLI
//!
//! This module defines the command-line interface of `vision` using `clap`.
//!
//! Flags given here override the environment; anything left out is resolved by
//! `vision_core` from the captured process environment.
use clap::{Parser, Subcommand};
use vision_core::{FeatureType, ImageSource, Transport};

#[derive(Parser, Debug)]
#[command(name = "vision", version, about = "Cloud Vision image annotation CLI")]
pub struct Cli {
    /// Project to act on behalf of (defaults to GOOGLE_CLOUD_PROJECT)
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// API key to authenticate with (defaults to GOOGLE_API_KEY)
    #[arg(long, global = true, conflicts_with = "access_token")]
    pub api_key: Option<String>,

    /// OAuth2 access token to authenticate with (defaults to GOOGLE_OAUTH_ACCESS_TOKEN)
    #[arg(long, global = true)]
    pub access_token: Option<String>,

    /// Transport to use: grpc or http (defaults to grpc unless GOOGLE_CLOUD_DISABLE_GRPC is set)
    #[arg(long, global = true)]
    pub transport: Option<Transport>,

    /// Override the service endpoint (e.g. http://localhost:50051)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Annotate a single image
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// vision detect ./cat.png -f labels -f safe-search
    /// vision detect gs://my-bucket/sign.jpg -f text
    /// ```
    Detect {
        /// Local file, gs:// URI or http(s):// URL of the image
        #[arg(value_parser = parse_image)]
        image: ImageSource,

        #[command(flatten)]
        features: FeatureArgs,
    },

    /// Annotate several images in a single request
    Batch {
        /// Local files, gs:// URIs or http(s):// URLs of the images
        #[arg(required = true, value_parser = parse_image)]
        images: Vec<ImageSource>,

        #[command(flatten)]
        features: FeatureArgs,
    },
}

#[derive(clap::Args, Debug)]
pub struct FeatureArgs {
    /// Feature to detect: labels, landmarks, logos, text or safe-search (repeatable)
    #[arg(short, long = "feature", value_parser = parse_feature, default_value = "labels")]
    pub features: Vec<FeatureType>,

    /// Maximum number of results per feature
    #[arg(short = 'n', long, default_value_t = 10)]
    pub max_results: u32,
}

fn parse_image(value: &str) -> Result<ImageSource, String> {
    if value.trim().is_empty() {
        return Err("Image cannot be empty".to_string());
    }

    let is_uri = ["gs://", "http://", "https://"]
        .iter()
        .any(|scheme| value.starts_with(scheme));

    if is_uri {
        Ok(ImageSource::source_uri(value))
    } else {
        Ok(ImageSource::filename(value))
    }
}

fn parse_feature(value: &str) -> Result<FeatureType, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "labels" | "label" => Ok(FeatureType::LabelDetection),
        "landmarks" | "landmark" => Ok(FeatureType::LandmarkDetection),
        "logos" | "logo" => Ok(FeatureType::LogoDetection),
        "text" | "ocr" => Ok(FeatureType::TextDetection),
        "safe-search" | "safe_search" => Ok(FeatureType::SafeSearchDetection),
        other => Err(format!(
            "Unknown feature '{other}'. Expected labels, landmarks, logos, text or safe-search"
        )),
    }
}
