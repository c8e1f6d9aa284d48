//! # Annotator Service
//!
//! **INTERNAL USE ONLY**: This crate exists solely to provide the server side of the
//! `google.cloud.vision.v1.ImageAnnotator` service for integration testing `vision-core`
//! and the `vision` CLI. It is not intended for production use.

pub mod pb {
    pub mod google {
        pub mod rpc {
            include!(concat!(env!("OUT_DIR"), "/google.rpc.rs"));
        }

        pub mod cloud {
            pub mod vision {
                pub mod v1 {
                    include!(concat!(env!("OUT_DIR"), "/google.cloud.vision.v1.rs"));
                }
            }
        }
    }

    pub use google::cloud::vision::v1::*;
}

pub use pb::image_annotator_server::{ImageAnnotator, ImageAnnotatorServer};
