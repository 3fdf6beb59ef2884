// src/message.rs
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, ServiceError};

/// The `message` value is passed on as sent; only its presence is checked.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    /// Any further fields a chat service returns, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatReply {
    pub fn text(response: impl Into<String>) -> Self {
        Self { response: response.into(), action: None, query: None, extra: Map::new() }
    }

    pub fn with_action(response: impl Into<String>, action: &str, query: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            action: Some(action.to_string()),
            query: Some(query.into()),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MusicSearchRequest {
    pub query: Value,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub song_id: SongId,
}

/// A track identifier as sent by clients. Integers and strings are the
/// usual forms; anything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SongId {
    Int(i64),
    Text(String),
    Other(Value),
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SongId::Int(id) => write!(f, "{}", id),
            SongId::Text(id) => f.write_str(id),
            SongId::Other(value) => write!(f, "{}", value),
        }
    }
}

/// Track records are opaque to the router; the music service decides their shape.
pub type TrackRecord = Value;

/// Reads a scalar request value as text. Strings are used as-is, numbers
/// and booleans in their JSON form; null, arrays and objects have no text.
pub fn value_text(value: &Value) -> Result<String, ServiceError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ServiceError::InvalidInput(format!("expected text, got {}", other))),
    }
}

/// Parses a raw request body into an envelope that must carry `field`.
///
/// An empty body, invalid JSON, anything other than an object, or an object
/// without `field` yield a 400 with `missing`. Whatever value `field` holds
/// is left for the collaborator to judge.
pub fn parse_envelope<T>(body: &[u8], field: &str, missing: &str) -> Result<T, AppError>
where
    T: for<'de> Deserialize<'de>,
{
    let bad_request = || AppError::BadRequest(missing.to_string());

    let object: Map<String, Value> = match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => map,
        _ => return Err(bad_request()),
    };

    if !object.contains_key(field) {
        return Err(bad_request());
    }
    serde_json::from_value(Value::Object(object)).map_err(|_| bad_request())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chat(body: &str) -> Result<ChatRequest, AppError> {
        parse_envelope(body.as_bytes(), "message", "Missing message")
    }

    fn recommend(body: &str) -> RecommendRequest {
        parse_envelope(body.as_bytes(), "song_id", "Missing song ID").unwrap()
    }

    #[test]
    fn accepts_body_with_required_key() {
        let req = chat(r#"{"message": "hello", "extra": 1}"#).unwrap();
        assert_eq!(req.message, "hello");
    }

    #[test]
    fn present_key_passes_whatever_value_it_holds() {
        assert_eq!(chat(r#"{"message": null}"#).unwrap().message, Value::Null);
        assert_eq!(chat(r#"{"message": 123}"#).unwrap().message, json!(123));
        assert_eq!(chat(r#"{"message": ["a"]}"#).unwrap().message, json!(["a"]));
    }

    #[test]
    fn rejects_bodies_without_the_key() {
        for body in ["", "not json", "{}", "[]", "null", r#"{"msg": "hi"}"#] {
            match chat(body) {
                Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Missing message"),
                other => panic!("expected bad request for {:?}, got {:?}", body, other),
            }
        }
    }

    #[test]
    fn song_id_keeps_any_value() {
        assert_eq!(recommend(r#"{"song_id": 42}"#).song_id, SongId::Int(42));
        assert_eq!(recommend(r#"{"song_id": "abc"}"#).song_id.to_string(), "abc");
        assert_eq!(recommend(r#"{"song_id": 4.5}"#).song_id, SongId::Other(json!(4.5)));
        assert_eq!(recommend(r#"{"song_id": null}"#).song_id, SongId::Other(Value::Null));
        assert_eq!(recommend(r#"{"song_id": true}"#).song_id, SongId::Other(json!(true)));
    }

    #[test]
    fn value_text_covers_scalars_only() {
        assert_eq!(value_text(&json!("jazz")).unwrap(), "jazz");
        assert_eq!(value_text(&json!(7)).unwrap(), "7");
        assert_eq!(value_text(&json!(false)).unwrap(), "false");
        assert!(value_text(&Value::Null).is_err());
        assert!(value_text(&json!(["jazz"])).is_err());
    }
}
