//! # Vision CLI Entry Point
//!
//! The main executable for the `vision` tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Sets up logging and parses command-line arguments using [`cli::Cli`].
//! 2. **Configuration**: Captures the process environment and builds a `VisionClient`, letting
//!    explicit flags win over ambient values.
//! 3. **Execution**: Sends a single image or a batch through the client.
//! 4. **Presentation**: Prints the annotations as JSON, or the error to standard error.

mod cli;
mod formatter;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, FeatureArgs};
use formatter::{BatchEntry, FormattedString};
use std::process;
use tracing_subscriber::EnvFilter;
use vision_core::{Credentials, Environment, Feature, ImageSource, VisionClient};

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Cli::parse();

    if let Err(err) = run(args).await {
        eprintln!("{}", FormattedString::from(err));
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Cli) -> anyhow::Result<()> {
    let client = build_client(&args)?;

    match args.command {
        Commands::Detect { image, features } => detect(&client, image, features).await,
        Commands::Batch { images, features } => batch(&client, images, features).await,
    }
}

fn build_client(args: &Cli) -> anyhow::Result<VisionClient> {
    let mut builder = VisionClient::builder().environment(Environment::capture());

    if let Some(project) = &args.project {
        builder = builder.project(project);
    }
    if let Some(key) = &args.api_key {
        builder = builder.credentials(Credentials::api_key(key));
    }
    if let Some(token) = &args.access_token {
        builder = builder.credentials(Credentials::access_token(token));
    }
    if let Some(transport) = args.transport {
        builder = builder.transport(transport);
    }
    if let Some(endpoint) = &args.endpoint {
        builder = builder.grpc_endpoint(endpoint).http_endpoint(endpoint);
    }

    let client = builder.build().context("Failed to configure the Vision client")?;
    tracing::info!(project = client.project(), transport = %client.transport(), "client ready");
    Ok(client)
}

fn requested_features(args: &FeatureArgs) -> Vec<Feature> {
    args.features
        .iter()
        .map(|kind| Feature::with_max_results(*kind, args.max_results))
        .collect()
}

async fn detect(
    client: &VisionClient,
    source: ImageSource,
    features: FeatureArgs,
) -> anyhow::Result<()> {
    let annotations = client
        .image(source)
        .detect(&requested_features(&features))
        .await
        .context("Annotation failed")?;

    println!("{}", FormattedString::from(annotations));
    Ok(())
}

async fn batch(
    client: &VisionClient,
    sources: Vec<ImageSource>,
    features: FeatureArgs,
) -> anyhow::Result<()> {
    let features = requested_features(&features);

    let mut batch = client.batch();
    for source in sources {
        batch.add_image(client.image(source), features.clone());
    }

    let responses = batch.detect().await.context("Batch annotation failed")?;
    for (index, response) in responses.into_iter().enumerate() {
        println!("{}", FormattedString::from(BatchEntry(index, response)));
    }
    Ok(())
}
