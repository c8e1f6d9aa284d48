//! # JSON <-> Protobuf Codec
//!
//! This module implements `tonic::codec::Codec` so that `tonic` can carry the JSON wire model
//! shared with the REST transport, without generated Rust structs.
//!
//! 1. **Encoder (JSON -> Proto)**: parses the request with the input `MessageDescriptor` and
//!    writes the Protobuf bytes. Fields unknown to the schema are rejected.
//! 2. **Decoder (Proto -> JSON)**: decodes the bytes with the output `MessageDescriptor` and
//!    renders the message exactly like the REST endpoint does: camelCase names, enums as
//!    strings, default values omitted.
//!
//! The response model in `transport::wire` relies on that shape, so both directions use
//! explicit options instead of prost-reflect's defaults.
use prost::{Message, bytes::Buf};
use prost_reflect::{
    DeserializeOptions, DynamicMessage, MessageDescriptor, MethodDescriptor, SerializeOptions,
};
use tonic::{
    Status,
    codec::{Codec, DecodeBuf, Decoder, EncodeBuf, Encoder},
};

fn deserialize_options() -> DeserializeOptions {
    DeserializeOptions::new().deny_unknown_fields(true)
}

fn serialize_options() -> SerializeOptions {
    SerializeOptions::new()
        .use_proto_field_name(false)
        .use_enum_numbers(false)
        .skip_default_fields(true)
        .stringify_64_bit_integers(true)
}

/// Parses a proto3 JSON value into a message of type `desc`.
pub fn message_from_json(
    desc: &MessageDescriptor,
    json: serde_json::Value,
) -> Result<DynamicMessage, serde_json::Error> {
    DynamicMessage::deserialize_with_options(desc.clone(), json, &deserialize_options())
}

/// Renders a message in the REST flavour of proto3 JSON.
pub fn message_to_json(message: &DynamicMessage) -> Result<serde_json::Value, serde_json::Error> {
    message.serialize_with_options(serde_json::value::Serializer, &serialize_options())
}

/// Decodes Protobuf bytes of type `desc` straight into proto3 JSON.
pub fn decode_json(desc: &MessageDescriptor, buf: impl Buf) -> Result<serde_json::Value, Status> {
    let message = DynamicMessage::decode(desc.clone(), buf).map_err(|e| {
        Status::internal(format!("Malformed {} message: {e}", desc.full_name()))
    })?;

    message_to_json(&message).map_err(|e| {
        Status::internal(format!("Failed to render {} as JSON: {e}", desc.full_name()))
    })
}

/// A Codec carrying the JSON wire model of a single method.
pub struct JsonCodec {
    method: MethodDescriptor,
}

impl JsonCodec {
    pub fn for_method(method: &MethodDescriptor) -> Self {
        Self {
            method: method.clone(),
        }
    }
}

impl Codec for JsonCodec {
    type Encode = serde_json::Value;
    type Decode = serde_json::Value;

    type Encoder = JsonEncoder;
    type Decoder = JsonDecoder;

    fn encoder(&mut self) -> Self::Encoder {
        JsonEncoder {
            request: self.method.input(),
        }
    }

    fn decoder(&mut self) -> Self::Decoder {
        JsonDecoder {
            response: self.method.output(),
        }
    }
}

pub struct JsonEncoder {
    request: MessageDescriptor,
}

impl Encoder for JsonEncoder {
    type Item = serde_json::Value;
    type Error = Status;

    fn encode(&mut self, item: Self::Item, dst: &mut EncodeBuf<'_>) -> Result<(), Self::Error> {
        let message = message_from_json(&self.request, item).map_err(|e| {
            Status::invalid_argument(format!(
                "Request does not match the {} schema: {e}",
                self.request.full_name()
            ))
        })?;

        message.encode_raw(dst);
        Ok(())
    }
}

pub struct JsonDecoder {
    response: MessageDescriptor,
}

impl Decoder for JsonDecoder {
    type Item = serde_json::Value;
    type Error = Status;

    fn decode(&mut self, src: &mut DecodeBuf<'_>) -> Result<Option<Self::Item>, Self::Error> {
        decode_json(&self.response, src).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grpc::{BATCH_ANNOTATE_IMAGES, IMAGE_ANNOTATOR_SERVICE, method_descriptor};
    use serde_json::json;

    fn batch_method() -> MethodDescriptor {
        method_descriptor(IMAGE_ANNOTATOR_SERVICE, BATCH_ANNOTATE_IMAGES).unwrap()
    }

    #[test]
    fn responses_render_like_the_rest_endpoint() {
        let response = batch_method().output();
        let message = message_from_json(
            &response,
            json!({
                "responses": [{
                    "labelAnnotations": [{"description": "cat", "score": 0.5, "topicality": 0.0}],
                    "safeSearchAnnotation": {"adult": "VERY_UNLIKELY", "racy": "UNKNOWN"}
                }]
            }),
        )
        .unwrap();
        let bytes = message.encode_to_vec();

        let json = decode_json(&response, bytes.as_slice()).unwrap();

        assert_eq!(
            json,
            json!({
                "responses": [{
                    "labelAnnotations": [{"description": "cat", "score": 0.5}],
                    "safeSearchAnnotation": {"adult": "VERY_UNLIKELY"}
                }]
            })
        );
    }

    #[test]
    fn requests_with_unknown_fields_are_rejected() {
        let request = batch_method().input();

        assert!(message_from_json(&request, json!({"requests": [], "parent": "x"})).is_err());
        assert!(message_from_json(&request, json!({"requests": []})).is_ok());
    }

    #[test]
    fn request_content_is_base64() {
        let request = batch_method().input();
        let message = message_from_json(
            &request,
            json!({"requests": [{
                "image": {"content": "a2l0dGVu"},
                "features": [{"type": "LABEL_DETECTION", "maxResults": 3}]
            }]}),
        )
        .unwrap();

        assert_eq!(
            message_to_json(&message).unwrap(),
            json!({"requests": [{
                "image": {"content": "a2l0dGVu"},
                "features": [{"type": "LABEL_DETECTION", "maxResults": 3}]
            }]})
        );
    }

    #[test]
    fn malformed_bytes_are_an_internal_error() {
        let bytes = [0xff_u8, 0xff, 0xff];
        let status = decode_json(&batch_method().output(), &bytes[..]).unwrap_err();
        assert_eq!(status.code(), tonic::Code::Internal);
    }
}
