//! Phoenix v2 JSON frames: `[join_ref, ref, topic, event, payload]`.

use serde_json::Value;
use thiserror::Error;

pub const EVENT_JOIN: &str = "phx_join";
pub const EVENT_LEAVE: &str = "phx_leave";
pub const EVENT_REPLY: &str = "phx_reply";
pub const EVENT_ERROR: &str = "phx_error";
pub const EVENT_CLOSE: &str = "phx_close";
pub const EVENT_HEARTBEAT: &str = "heartbeat";
pub const PHOENIX_TOPIC: &str = "phoenix";

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame must be a 5-element array")]
    Shape,
    #[error("frame field '{0}' has the wrong type")]
    Field(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMessage {
    pub join_ref: Option<String>,
    pub msg_ref: Option<String>,
    pub topic: String,
    pub event: String,
    pub payload: Value,
}

impl ChannelMessage {
    pub fn encode(&self) -> Result<String, FrameError> {
        let frame = Value::Array(vec![
            opt_to_value(&self.join_ref),
            opt_to_value(&self.msg_ref),
            Value::String(self.topic.clone()),
            Value::String(self.event.clone()),
            self.payload.clone(),
        ]);
        Ok(serde_json::to_string(&frame)?)
    }

    pub fn decode(text: &str) -> Result<Self, FrameError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Array(mut parts) = value else {
            return Err(FrameError::Shape);
        };
        if parts.len() != 5 {
            return Err(FrameError::Shape);
        }

        let payload = parts.pop().unwrap_or(Value::Null);
        let event = as_string(parts.pop(), "event")?;
        let topic = as_string(parts.pop(), "topic")?;
        let msg_ref = as_opt_string(parts.pop(), "ref")?;
        let join_ref = as_opt_string(parts.pop(), "join_ref")?;

        Ok(Self {
            join_ref,
            msg_ref,
            topic,
            event,
            payload,
        })
    }

    /// Splits a `phx_reply` payload into ok/error.
    pub fn reply(&self) -> Option<Result<Value, Value>> {
        if self.event != EVENT_REPLY {
            return None;
        }
        let status = self.payload.get("status").and_then(Value::as_str)?;
        let response = self.payload.get("response").cloned().unwrap_or(Value::Null);
        Some(if status == "ok" {
            Ok(response)
        } else {
            Err(response)
        })
    }
}

fn opt_to_value(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

fn as_string(value: Option<Value>, field: &'static str) -> Result<String, FrameError> {
    match value {
        Some(Value::String(s)) => Ok(s),
        _ => Err(FrameError::Field(field)),
    }
}

fn as_opt_string(value: Option<Value>, field: &'static str) -> Result<Option<String>, FrameError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(FrameError::Field(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_join_frame() {
        let msg = ChannelMessage {
            join_ref: Some("1".into()),
            msg_ref: Some("1".into()),
            topic: "dashboard:main".into(),
            event: EVENT_JOIN.into(),
            payload: json!({}),
        };
        assert_eq!(msg.encode().unwrap(), r#"["1","1","dashboard:main","phx_join",{}]"#);
    }

    #[test]
    fn test_decode_server_push() {
        let msg = ChannelMessage::decode(
            r#"[null,null,"dashboard:main","new_data",{"rows":[],"last_updated":null}]"#,
        )
        .unwrap();
        assert_eq!(msg.join_ref, None);
        assert_eq!(msg.msg_ref, None);
        assert_eq!(msg.event, "new_data");
        assert!(msg.reply().is_none());
    }

    #[test]
    fn test_reply_status() {
        let ok = ChannelMessage::decode(
            r#"["1","3","dashboard:main","phx_reply",{"status":"ok","response":{"id":"9"}}]"#,
        )
        .unwrap();
        assert_eq!(ok.reply(), Some(Ok(json!({"id": "9"}))));

        let err = ChannelMessage::decode(
            r#"["1","4","dashboard:main","phx_reply",{"status":"error","response":{"reason":"duplicate"}}]"#,
        )
        .unwrap();
        assert_eq!(err.reply(), Some(Err(json!({"reason": "duplicate"}))));
    }

    #[test]
    fn test_malformed_frames() {
        assert!(matches!(ChannelMessage::decode("{}"), Err(FrameError::Shape)));
        assert!(matches!(ChannelMessage::decode("[1,2]"), Err(FrameError::Shape)));
        assert!(matches!(
            ChannelMessage::decode(r#"[null,null,5,"x",{}]"#),
            Err(FrameError::Field("topic"))
        ));
        assert!(matches!(ChannelMessage::decode("not json"), Err(FrameError::Json(_))));
    }
}
