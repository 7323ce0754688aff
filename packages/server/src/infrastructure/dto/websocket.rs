//! WebSocket event frames.
//!
//! Every frame is `{"event": <name>, "data": <payload>}`; `data` is absent
//! for events without a payload.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

/// Client → server frame
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum InboundMessage {
    /// Bearer credential
    Authenticate(String),
    CreateSession,
    JoinSession(JoinSessionPayload),
    LeaveSession,
    /// Raw message text
    ChatMessage(String),
    Draw(StrokeDto),
    MusicControl(Map<String, Value>),
    FindMatch,
    CancelMatch,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSessionPayload {
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub session_id: u64,
}

/// Accepts `12` as well as `"12"`
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid session id: {text:?}"))),
    }
}

/// Server → client frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum OutboundMessage {
    Authenticated(UserPayload),
    SessionCreated(SessionPayload),
    UserJoined(UserPayload),
    UserLeft(UserLeftPayload),
    ChatMessage(ChatMessagePayload),
    Draw(StrokeDto),
    MusicControl(MusicControlPayload),
    WaitingForMatch,
    MatchFound(SessionPayload),
    MatchCancelled,
    Error(ErrorPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub user_id: u64,
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftPayload {
    pub user_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub session_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagePayload {
    pub user_id: u64,
    pub content: String,
    /// RFC 3339, UTC
    pub timestamp: String,
}

/// `{userId, ...event}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicControlPayload {
    pub user_id: u64,
    #[serde(flatten)]
    pub event: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeDto {
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub size: f64,
    pub event_type: StrokeEventTypeDto,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeEventTypeDto {
    Start,
    Move,
    End,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_payloadless_event() {
        // テスト項目: data のないイベントをパースできる
        // when (操作):
        let message: InboundMessage = serde_json::from_str(r#"{"event":"findMatch"}"#).unwrap();

        // then (期待する結果):
        assert_eq!(message, InboundMessage::FindMatch);
    }

    #[test]
    fn test_parse_authenticate() {
        // テスト項目: authenticate イベントをパースできる
        // when (操作):
        let message: InboundMessage =
            serde_json::from_str(r#"{"event":"authenticate","data":"token-123"}"#).unwrap();

        // then (期待する結果):
        assert_eq!(message, InboundMessage::Authenticate("token-123".to_string()));
    }

    #[test]
    fn test_parse_draw_stroke() {
        // テスト項目: draw イベントをパースできる
        // given (前提条件):
        let raw = json!({
            "event": "draw",
            "data": {"x": 10.5, "y": 20.0, "color": "#ff0000", "size": 3.0, "eventType": "move"}
        });

        // when (操作):
        let message: InboundMessage = serde_json::from_value(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            message,
            InboundMessage::Draw(StrokeDto {
                x: 10.5,
                y: 20.0,
                color: "#ff0000".to_string(),
                size: 3.0,
                event_type: StrokeEventTypeDto::Move,
                extra: Map::new(),
            })
        );
    }

    #[test]
    fn test_draw_keeps_unknown_stroke_fields() {
        // テスト項目: 未知のストロークフィールドも保持され、そのまま再シリアライズされる
        // given (前提条件):
        let data = json!({
            "x": 1, "y": 2, "color": "#123456", "size": 2,
            "eventType": "start", "pressure": 0.7, "tool": {"kind": "pen"}
        });

        // when (操作):
        let stroke: StrokeDto = serde_json::from_value(data).unwrap();
        let relayed = serde_json::to_value(OutboundMessage::Draw(stroke.clone())).unwrap();

        // then (期待する結果):
        assert_eq!(stroke.extra.get("pressure"), Some(&json!(0.7)));
        assert_eq!(relayed["data"]["tool"], json!({"kind": "pen"}));
        assert_eq!(relayed["data"]["pressure"], json!(0.7));
        assert_eq!(relayed["data"]["eventType"], json!("start"));
    }

    #[test]
    fn test_join_session_accepts_number_or_numeric_string() {
        // テスト項目: joinSession の sessionId は数値でも数字文字列でも受け付ける
        // given (前提条件):
        let as_number = r#"{"event":"joinSession","data":{"sessionId":12}}"#;
        let as_string = r#"{"event":"joinSession","data":{"sessionId":"12"}}"#;
        let not_a_number = r#"{"event":"joinSession","data":{"sessionId":"twelve"}}"#;

        // when (操作):
        let number: InboundMessage = serde_json::from_str(as_number).unwrap();
        let string: InboundMessage = serde_json::from_str(as_string).unwrap();
        let rejected = serde_json::from_str::<InboundMessage>(not_a_number);

        // then (期待する結果):
        let expected = InboundMessage::JoinSession(JoinSessionPayload { session_id: 12 });
        assert_eq!(number, expected);
        assert_eq!(string, expected);
        assert!(rejected.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_event() {
        // テスト項目: 未知のイベントはパースに失敗する
        // when (操作):
        let result = serde_json::from_str::<InboundMessage>(r#"{"event":"teleport"}"#);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_music_control_payload_is_flattened() {
        // テスト項目: musicControl のペイロードは平坦化される
        // given (前提条件):
        let mut event = Map::new();
        event.insert("action".to_string(), json!("seek"));
        event.insert("position".to_string(), json!(42));
        let message = OutboundMessage::MusicControl(MusicControlPayload { user_id: 7, event });

        // when (操作):
        let value = serde_json::to_value(&message).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "event": "musicControl",
                "data": {"userId": 7, "action": "seek", "position": 42}
            })
        );
    }

    #[test]
    fn test_unit_event_serializes_without_data() {
        // テスト項目: ペイロードのないイベントは data なしでシリアライズされる
        // when (操作):
        let value = serde_json::to_value(OutboundMessage::WaitingForMatch).unwrap();

        // then (期待する結果):
        assert_eq!(value, json!({"event": "waitingForMatch"}));
    }
}
