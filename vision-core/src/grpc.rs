//! # Generic gRPC Transport
//!
//! Low-level building blocks for performing gRPC calls with dynamic message types.
//!
//! The annotation service is described by the descriptor set compiled from `proto/` at build
//! time. Instead of generated Rust structs, requests and responses travel as
//! `serde_json::Value` in the proto3 JSON mapping and are transcoded to Protobuf on the fly,
//! so the gRPC and HTTP transports share one wire model.
pub mod client;
pub mod codec;

use prost_reflect::{DescriptorPool, MethodDescriptor};
use std::sync::LazyLock;

const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("vision_descriptors");

static DESCRIPTOR_POOL: LazyLock<DescriptorPool> = LazyLock::new(|| {
    DescriptorPool::decode(FILE_DESCRIPTOR_SET).expect("embedded descriptor set is valid")
});

/// Fully qualified name of the annotation service.
pub const IMAGE_ANNOTATOR_SERVICE: &str = "google.cloud.vision.v1.ImageAnnotator";
/// Name of the batch annotation method on [`IMAGE_ANNOTATOR_SERVICE`].
pub const BATCH_ANNOTATE_IMAGES: &str = "BatchAnnotateImages";

/// The descriptor pool holding the Vision schema.
pub fn descriptor_pool() -> &'static DescriptorPool {
    &DESCRIPTOR_POOL
}

/// Looks up a method of a service in the embedded schema.
pub fn method_descriptor(service: &str, method: &str) -> Option<MethodDescriptor> {
    descriptor_pool()
        .get_service_by_name(service)?
        .methods()
        .find(|m| m.name() == method)
}
