use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::room_key::RoomKey;

/// The user is queued and waiting for a partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitingEvent {
    /// Human readable status from the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of users currently waiting in the queue, including the receipient
    pub waiting_count: usize,
}

/// The user has been paired with a random partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedEvent {
    /// Identifier of the room both users have joined
    pub room_id: String,
}

/// The user has been paired with a partner sharing some profile keywords
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedWithScoreEvent {
    /// Identifier of the room both users have joined
    pub room_id: String,
    /// Profile similarity between 0 and 1
    pub score: f64,
    /// Keywords both profiles have in common
    #[serde(default)]
    pub matched_keywords: Vec<String>,
}

/// A private room has been created and the user is its first participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivateRoomCreatedEvent {
    pub room_id: String,
    /// Key to share with the partner
    pub room_key: RoomKey,
    #[serde(default)]
    pub message: String,
}

/// The user has joined an existing private room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedPrivateRoomEvent {
    pub room_id: String,
    pub room_key: RoomKey,
    #[serde(default)]
    pub message: String,
    /// The room already has messages, a [ServerEvent::RoomHistory] event follows
    #[serde(default)]
    pub has_history: bool,
}

/// A message sent by one of the room participants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageEvent {
    /// The id of the user that has sent the message
    pub sender_id: String,
    /// The content of the message
    pub content: String,
    /// When the server has accepted the message
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<FixedOffset>,
}

/// Reads an RFC 3339 timestamp. One without an offset is taken as local time.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp);
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    let timestamp = match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.fixed_offset(),
        // skipped by a DST change
        None => Utc.from_utc_datetime(&naive).fixed_offset(),
    };

    Some(timestamp)
}

/// Messages exchanged in a private room before the user joined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomHistoryEvent {
    /// Messages in the order they were sent
    pub messages: Vec<ChatMessageEvent>,
}

/// A notice carrying only a server supplied text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeEvent {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
/// Events that can be pushed to the client
/// The receipient is always a single client session
pub enum ServerEvent {
    Waiting(WaitingEvent),
    Matched(MatchedEvent),
    MatchedWithScore(MatchedWithScoreEvent),
    PrivateRoomCreated(PrivateRoomCreatedEvent),
    JoinedPrivateRoom(JoinedPrivateRoomEvent),
    RoomHistory(RoomHistoryEvent),
    NewMessage(ChatMessageEvent),
    PartnerLeft(NoticeEvent),
    LeftRoom(NoticeEvent),
    Error(NoticeEvent),
}

impl ServerEvent {
    /// Name of the event on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Waiting(_) => "waiting",
            ServerEvent::Matched(_) => "matched",
            ServerEvent::MatchedWithScore(_) => "matched_with_score",
            ServerEvent::PrivateRoomCreated(_) => "private_room_created",
            ServerEvent::JoinedPrivateRoom(_) => "joined_private_room",
            ServerEvent::RoomHistory(_) => "room_history",
            ServerEvent::NewMessage(_) => "new_message",
            ServerEvent::PartnerLeft(_) => "partner_left",
            ServerEvent::LeftRoom(_) => "left_room",
            ServerEvent::Error(_) => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // given an event enum, and an expect string, asserts that event is serialized / deserialized appropiately
    fn assert_event_serialization(event: &ServerEvent, expected: &str) {
        let serialized = serde_json::to_string(&event).unwrap();
        assert_eq!(serialized, expected);
        let deserialized: ServerEvent = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, *event);
    }

    fn parse_event(raw: &str) -> ServerEvent {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_waiting_event() {
        let event = ServerEvent::Waiting(WaitingEvent {
            message: None,
            waiting_count: 3,
        });

        assert_event_serialization(&event, r#"{"event":"waiting","data":{"waiting_count":3}}"#);
        assert_eq!(
            parse_event(r#"{"event":"waiting","data":{"message":"queued","waiting_count":1}}"#),
            ServerEvent::Waiting(WaitingEvent {
                message: Some("queued".into()),
                waiting_count: 1,
            })
        );
    }

    #[test]
    fn test_matched_event() {
        let event = ServerEvent::Matched(MatchedEvent {
            room_id: "42".into(),
        });

        assert_event_serialization(&event, r#"{"event":"matched","data":{"room_id":"42"}}"#);
    }

    #[test]
    fn test_matched_with_score_event() {
        let event = ServerEvent::MatchedWithScore(MatchedWithScoreEvent {
            room_id: "7".into(),
            score: 0.5,
            matched_keywords: vec!["rust".into()],
        });

        assert_event_serialization(
            &event,
            r#"{"event":"matched_with_score","data":{"room_id":"7","score":0.5,"matched_keywords":["rust"]}}"#,
        );
    }

    #[test]
    fn test_private_room_events() {
        assert_eq!(
            parse_event(
                r#"{"event":"private_room_created","data":{"room_id":"9","room_key":"abcd1234","message":"share the key"}}"#
            ),
            ServerEvent::PrivateRoomCreated(PrivateRoomCreatedEvent {
                room_id: "9".into(),
                room_key: RoomKey::parse("ABCD1234").unwrap(),
                message: "share the key".into(),
            })
        );

        assert_eq!(
            parse_event(
                r#"{"event":"joined_private_room","data":{"room_id":"9","room_key":"ABCD1234","message":"joined"}}"#
            ),
            ServerEvent::JoinedPrivateRoom(JoinedPrivateRoomEvent {
                room_id: "9".into(),
                room_key: RoomKey::parse("ABCD1234").unwrap(),
                message: "joined".into(),
                has_history: false,
            })
        );
    }

    #[test]
    fn test_new_message_event_with_offset_timestamp() {
        let event = parse_event(
            r#"{"event":"new_message","data":{"sender_id":"a1b2c3d4","content":"hi","timestamp":"2024-03-01T20:15:42.123456+08:00"}}"#,
        );

        let ServerEvent::NewMessage(message) = event else {
            panic!("expected a new_message event");
        };
        assert_eq!(message.sender_id, "a1b2c3d4");
        assert_eq!(message.content, "hi");
        assert_eq!(message.timestamp.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_new_message_event_with_naive_timestamp() {
        let event = parse_event(
            r#"{"event":"new_message","data":{"sender_id":"a1b2c3d4","content":"hi","timestamp":"2024-03-01T20:15:42.123456"}}"#,
        );

        let ServerEvent::NewMessage(message) = event else {
            panic!("expected a new_message event");
        };
        let expected =
            NaiveDateTime::parse_from_str("2024-03-01T20:15:42.123456", "%Y-%m-%dT%H:%M:%S%.f")
                .unwrap();
        assert_eq!(message.timestamp.with_timezone(&Local).naive_local(), expected);
    }

    #[test]
    fn test_room_history_with_mixed_timestamps() {
        let event = parse_event(
            r#"{"event":"room_history","data":{"messages":[
                {"sender_id":"u1","content":"first","timestamp":"2024-03-01T10:00:00"},
                {"sender_id":"u2","content":"second","timestamp":"2024-03-01T10:01:00+00:00"}
            ]}}"#,
        );

        let ServerEvent::RoomHistory(history) = event else {
            panic!("expected a room_history event");
        };
        assert_eq!(history.messages.len(), 2);
    }

    #[test]
    fn test_garbage_timestamp_is_rejected() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-03-01").is_none());
    }

    #[test]
    fn test_room_history_event() {
        let event = parse_event(
            r#"{"event":"room_history","data":{"messages":[
                {"sender_id":"u1","content":"first","timestamp":"2024-03-01T10:00:00+00:00"},
                {"sender_id":"u2","content":"second","timestamp":"2024-03-01T10:01:00+00:00"}
            ]}}"#,
        );

        let ServerEvent::RoomHistory(history) = event else {
            panic!("expected a room_history event");
        };
        assert_eq!(history.messages.len(), 2);
        assert_eq!(history.messages[1].content, "second");
    }

    #[test]
    fn test_notice_events() {
        let notice = NoticeEvent {
            message: "bye".into(),
        };

        assert_event_serialization(
            &ServerEvent::PartnerLeft(notice.clone()),
            r#"{"event":"partner_left","data":{"message":"bye"}}"#,
        );
        assert_event_serialization(
            &ServerEvent::LeftRoom(notice.clone()),
            r#"{"event":"left_room","data":{"message":"bye"}}"#,
        );
        assert_event_serialization(
            &ServerEvent::Error(notice),
            r#"{"event":"error","data":{"message":"bye"}}"#,
        );
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        assert!(serde_json::from_str::<ServerEvent>(r#"{"event":"typing","data":{}}"#).is_err());
    }
}
