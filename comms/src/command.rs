use serde::{Deserialize, Serialize};

use crate::{profile::Profile, room_key::RoomKey};

/// Client command for joining a private room by its shareable key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinPrivateRoomCommand {
    // The normalized key of the room to join.
    pub room_key: RoomKey,
    // Profile of the joining user, sent alongside the key.
    #[serde(flatten)]
    pub profile: Profile,
}

/// Client command for sending a message to the current room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageCommand {
    // The content of the message.
    pub content: String,
}

/// A command which can be emitted to the server by a single client session.
/// The server resolves the room from the session, so no command carries a room id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientCommand {
    JoinQueue,
    JoinQueueWithProfile(Profile),
    CreatePrivateRoom(Profile),
    JoinPrivateRoom(JoinPrivateRoomCommand),
    #[serde(rename = "leave_room_event")]
    LeaveRoom,
    SendMessage(SendMessageCommand),
}

impl ClientCommand {
    /// Name of the event on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            ClientCommand::JoinQueue => "join_queue",
            ClientCommand::JoinQueueWithProfile(_) => "join_queue_with_profile",
            ClientCommand::CreatePrivateRoom(_) => "create_private_room",
            ClientCommand::JoinPrivateRoom(_) => "join_private_room",
            ClientCommand::LeaveRoom => "leave_room_event",
            ClientCommand::SendMessage(_) => "send_message",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // given a command enum, and an expect string, asserts that command is serialized / deserialized appropiately
    fn assert_command_serialization(command: &ClientCommand, expected: &str) {
        let serialized = serde_json::to_string(&command).unwrap();
        assert_eq!(serialized, expected);
        let deserialized: ClientCommand = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, *command);
    }

    fn profile() -> Profile {
        Profile {
            bio: "bio".into(),
            purpose: "purpose".into(),
            keywords: vec!["rust".into(), "jazz".into()],
        }
    }

    #[test]
    fn test_join_queue_command() {
        assert_command_serialization(&ClientCommand::JoinQueue, r#"{"event":"join_queue"}"#);
    }

    #[test]
    fn test_join_queue_with_profile_command() {
        let command = ClientCommand::JoinQueueWithProfile(profile());

        assert_command_serialization(
            &command,
            r#"{"event":"join_queue_with_profile","data":{"bio":"bio","purpose":"purpose","keywords":["rust","jazz"]}}"#,
        );
    }

    #[test]
    fn test_create_private_room_with_empty_profile() {
        let command = ClientCommand::CreatePrivateRoom(Profile::default());

        assert_command_serialization(
            &command,
            r#"{"event":"create_private_room","data":{"bio":"","purpose":"","keywords":[]}}"#,
        );
    }

    #[test]
    fn test_join_private_room_command() {
        let command = ClientCommand::JoinPrivateRoom(JoinPrivateRoomCommand {
            room_key: RoomKey::parse("abcd1234").unwrap(),
            profile: profile(),
        });

        assert_command_serialization(
            &command,
            r#"{"event":"join_private_room","data":{"room_key":"ABCD1234","bio":"bio","purpose":"purpose","keywords":["rust","jazz"]}}"#,
        );
    }

    #[test]
    fn test_leave_room_command() {
        assert_command_serialization(&ClientCommand::LeaveRoom, r#"{"event":"leave_room_event"}"#);
        assert_eq!(ClientCommand::LeaveRoom.name(), "leave_room_event");
    }

    #[test]
    fn test_send_message_command() {
        let command = ClientCommand::SendMessage(SendMessageCommand {
            content: "hello".into(),
        });

        assert_command_serialization(
            &command,
            r#"{"event":"send_message","data":{"content":"hello"}}"#,
        );
    }
}
