/// Intents produced by the UI, processed by the [super::ChatController].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StartRandomMatch,
    StartKeywordMatch,
    CreatePrivateRoom,
    ShowJoinByKey,
    CloseForm,
    SubmitProfile {
        bio: String,
        purpose: String,
        keywords: String,
    },
    SkipProfile,
    JoinByKey {
        room_key: String,
        bio: String,
        purpose: String,
        keywords: String,
    },
    CancelMatching,
    /// Leave the current room, the UI asks for confirmation before sending it
    LeaveRoom,
    SendMessage {
        content: String,
    },
    CopyRoomKey,
    DismissAlert,
    Exit,
}
