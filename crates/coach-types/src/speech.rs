//! Speech proxy wire format.
//!
//! The proxy answers `POST /api` with the audio wrapped the way a Node
//! buffer serializes to JSON (`{"type": "Buffer", "data": [..]}`), which is
//! what the browser client already decodes.

use serde::{Deserialize, Serialize};

/// Body of `POST /api`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

/// Raw audio bytes in buffer form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioBuffer {
    #[serde(rename = "type", default = "buffer_tag")]
    pub kind: String,
    pub data: Vec<u8>,
}

fn buffer_tag() -> String {
    "Buffer".to_string()
}

impl AudioBuffer {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            kind: buffer_tag(),
            data,
        }
    }
}

/// Successful response from the speech proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechResponse {
    pub message: String,
    pub body: AudioBuffer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_uses_buffer_shape() {
        let response = SpeechResponse {
            message: "audio synthesized".to_string(),
            body: AudioBuffer::new(vec![1, 2, 3]),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"message": "audio synthesized", "body": {"type": "Buffer", "data": [1, 2, 3]}})
        );
    }

    #[test]
    fn buffer_tag_is_optional_on_input() {
        let response: SpeechResponse =
            serde_json::from_value(json!({"message": "ok", "body": {"data": [7]}})).unwrap();
        assert_eq!(response.body.kind, "Buffer");
        assert_eq!(response.body.data, vec![7]);
    }
}
