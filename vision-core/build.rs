use std::env::var;
use std::io::Result;

fn main() -> Result<()> {
    let proto_files = &[
        "proto/google/rpc/status.proto",
        "proto/google/cloud/vision/v1/image_annotator.proto",
    ];

    let proto_folder = "proto";
    let out_dir = var("OUT_DIR").expect("Missing OUT_DIR environment variable");
    let descriptors_path = format!("{}/vision_descriptors.bin", out_dir);

    // Only the descriptor set is used: messages are transcoded dynamically
    // from the JSON wire model, so no Rust types are needed on this side.
    tonic_prost_build::configure()
        .file_descriptor_set_path(descriptors_path)
        .build_client(false)
        .build_server(false)
        .compile_protos(proto_files, &[proto_folder])
        .unwrap();

    Ok(())
}
