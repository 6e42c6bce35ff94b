//! Wire envelopes and framing.
//!
//! Each frame is one JSON document terminated by `\n`.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use common::{AppError, AppResult};

/// Outbound request frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Correlation id, echoed back by the reply
    pub id: String,
    /// Routing key
    pub pattern: String,
    /// Message payload
    #[serde(default)]
    pub data: Value,
}

impl RequestEnvelope {
    /// Create a request with a fresh correlation id
    pub fn new(pattern: impl Into<String>, data: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            pattern: pattern.into(),
            data,
        }
    }
}

/// Reply frame matched to a request by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub id: String,
    /// Handler result; absent or `null` means "no result"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    /// Error message raised by the remote handler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    /// Always true: one reply per request
    #[serde(rename = "isDisposed", default)]
    pub is_disposed: bool,
}

impl ReplyEnvelope {
    /// Successful reply, possibly without payload
    pub fn success(id: impl Into<String>, response: Option<Value>) -> Self {
        Self {
            id: id.into(),
            response,
            err: None,
            is_disposed: true,
        }
    }

    /// Error reply
    pub fn failure(id: impl Into<String>, err: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            response: None,
            err: Some(err.into()),
            is_disposed: true,
        }
    }

    /// Build the reply for a handler result
    pub fn from_result(id: impl Into<String>, result: AppResult<Option<Value>>) -> Self {
        match result {
            Ok(response) => Self::success(id, response),
            Err(e) => Self::failure(id, e.user_message()),
        }
    }

    /// Turn the reply back into the caller's result
    pub fn into_result(self) -> AppResult<Option<Value>> {
        if let Some(err) = self.err {
            return Err(AppError::remote(err));
        }

        Ok(self.response.filter(|value| !value.is_null()))
    }
}

/// Serialize a message into a single newline-terminated frame.
pub fn encode_frame<T: Serialize>(message: &T) -> AppResult<String> {
    let mut frame = serde_json::to_string(message)?;
    frame.push('\n');
    Ok(frame)
}

/// Parse one frame (without its terminator).
pub fn decode_frame<T: DeserializeOwned>(line: &str) -> AppResult<T> {
    Ok(serde_json::from_str(line)?)
}

/// Decode a message payload.
///
/// Accepts either a JSON object or a string holding a JSON document, since
/// some clients stringify the payload before sending it.
pub fn decode_payload<T: DeserializeOwned>(data: Value) -> AppResult<T> {
    let decoded = match data {
        Value::String(raw) => serde_json::from_str(&raw),
        other => serde_json::from_value(other),
    };

    decoded.map_err(|e| AppError::bad_request(format!("malformed payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Credentials {
        username: String,
        password: String,
    }

    #[test]
    fn test_null_response_is_absent() {
        let reply: ReplyEnvelope =
            decode_frame(r#"{"id":"1","response":null,"isDisposed":true}"#).unwrap();
        assert_eq!(reply.into_result().unwrap(), None);

        let reply: ReplyEnvelope = decode_frame(r#"{"id":"2","isDisposed":true}"#).unwrap();
        assert_eq!(reply.into_result().unwrap(), None);
    }

    #[test]
    fn test_error_reply_becomes_remote_error() {
        let reply = ReplyEnvelope::failure("3", "boom");
        let err = reply.into_result().unwrap_err();
        assert!(matches!(err, AppError::Remote(ref msg) if msg == "boom"));
    }

    #[test]
    fn test_reply_frame_shape() {
        let reply = ReplyEnvelope::success("4", Some(json!({ "id": 1 })));
        let frame = encode_frame(&reply).unwrap();

        assert!(frame.ends_with('\n'));
        let value: Value = serde_json::from_str(frame.trim_end()).unwrap();
        assert_eq!(
            value,
            json!({ "id": "4", "response": { "id": 1 }, "isDisposed": true })
        );
    }

    #[test]
    fn test_requests_get_distinct_ids() {
        let a = RequestEnvelope::new("get_user", Value::Null);
        let b = RequestEnvelope::new("get_user", Value::Null);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_decode_payload_accepts_stringified_json() {
        let expected = Credentials {
            username: "alice".to_string(),
            password: "p1".to_string(),
        };

        let from_object: Credentials =
            decode_payload(json!({ "username": "alice", "password": "p1" })).unwrap();
        let from_string: Credentials =
            decode_payload(json!(r#"{"username":"alice","password":"p1"}"#)).unwrap();

        assert_eq!(from_object, expected);
        assert_eq!(from_string, expected);
    }

    #[test]
    fn test_decode_payload_rejects_wrong_shape() {
        let result: AppResult<Credentials> = decode_payload(json!({ "username": 5 }));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
