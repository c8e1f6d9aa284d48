use std::io::Result;

fn main() -> Result<()> {
    // The schema is shared with vision-core so both sides stay in sync.
    let proto_files = &[
        "../vision-core/proto/google/rpc/status.proto",
        "../vision-core/proto/google/cloud/vision/v1/image_annotator.proto",
    ];

    let proto_folder = "../vision-core/proto";

    tonic_prost_build::configure()
        .build_client(false)
        .compile_protos(proto_files, &[proto_folder])
        .unwrap();

    Ok(())
}
