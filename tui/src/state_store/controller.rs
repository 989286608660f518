use std::time::Duration;

use comms::{
    command::{ClientCommand, JoinPrivateRoomCommand, SendMessageCommand},
    event::{ChatMessageEvent, MatchedWithScoreEvent, ServerEvent, WaitingEvent},
    profile::Profile,
    room_key::{RoomKey, RoomKeyError},
};
use tracing::{debug, error, info, warn};

use crate::{
    client::{ConnectionEvent, Transport},
    clipboard::Clipboard,
};

use super::{
    action::Action,
    scheduler::{ScheduledTask, Scheduler, TaskHandle, TaskKind},
    state::{Form, MatchType, ProfileMode, Screen, SessionContext, State},
};

/// How long the chat stays visible after the partner has left.
pub const PARTNER_LEFT_RESET_DELAY: Duration = Duration::from_secs(5);

const MATCHED_MESSAGE: &str = "✅ Matched with a partner, start chatting!";
const PRIVATE_ROOM_CREATED_MESSAGE: &str = "✅ Private room created, share the key to invite a partner.";
const PRIVATE_ROOM_JOINED_MESSAGE: &str = "✅ Joined the private room, start chatting!";
const LOADING_HISTORY_MESSAGE: &str = "⏳ Loading chat history...";
const HISTORY_END_MESSAGE: &str = "── end of chat history ──";

/// Owns the [State] and mediates between UI actions, the server connection and timers.
///
/// Every handler runs to completion synchronously, the state store renders the state
/// after each call.
pub struct ChatController<T, C, S> {
    state: State,
    transport: T,
    clipboard: C,
    scheduler: S,
    /// Reset scheduled after the partner has left, `None` if nothing is pending
    pending_reset: Option<TaskHandle>,
}

impl<T, C, S> ChatController<T, C, S>
where
    T: Transport,
    C: Clipboard,
    S: Scheduler,
{
    pub fn new(state: State, transport: T, clipboard: C, scheduler: S) -> Self {
        ChatController {
            state,
            transport,
            clipboard,
            scheduler,
            pending_reset: None,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::StartRandomMatch => self.join_queue(ClientCommand::JoinQueue),
            Action::StartKeywordMatch => self
                .state
                .show_form(Form::Profile(ProfileMode::Keyword)),
            Action::CreatePrivateRoom => self
                .state
                .show_form(Form::Profile(ProfileMode::Private)),
            Action::ShowJoinByKey => self.state.show_form(Form::JoinByKey),
            Action::CloseForm => self.state.switch_screen(Screen::Init),
            Action::SubmitProfile {
                bio,
                purpose,
                keywords,
            } => {
                let profile = Profile::from_input(&bio, &purpose, &keywords);

                match self.profile_mode() {
                    Some(ProfileMode::Keyword) => {
                        self.join_queue(ClientCommand::JoinQueueWithProfile(profile))
                    }
                    Some(ProfileMode::Private) => {
                        self.join_queue(ClientCommand::CreatePrivateRoom(profile))
                    }
                    None => warn!("profile submitted without a visible profile form"),
                }
            }
            Action::SkipProfile => match self.profile_mode() {
                Some(ProfileMode::Keyword) => self.join_queue(ClientCommand::JoinQueue),
                Some(ProfileMode::Private) => {
                    self.join_queue(ClientCommand::CreatePrivateRoom(Profile::default()))
                }
                None => warn!("profile skipped without a visible profile form"),
            },
            Action::JoinByKey {
                room_key,
                bio,
                purpose,
                keywords,
            } => match RoomKey::parse(&room_key) {
                Ok(room_key) => {
                    self.join_queue(ClientCommand::JoinPrivateRoom(JoinPrivateRoomCommand {
                        room_key,
                        profile: Profile::from_input(&bio, &purpose, &keywords),
                    }))
                }
                Err(RoomKeyError::InvalidLength { expected, .. }) => {
                    self.state.alert = Some(format!(
                        "Please enter a valid room key ({expected} characters)."
                    ));
                }
            },
            Action::CancelMatching => {
                if let Err(err) = self.transport.reconnect() {
                    error!(error = %err, "could not restart the connection");
                }
                self.cancel_pending_reset();
                self.state.reset_to_init();
            }
            Action::LeaveRoom => {
                self.emit(ClientCommand::LeaveRoom);
                self.cancel_pending_reset();
                self.state.reset_to_init();
            }
            Action::SendMessage { content } => {
                let content = content.trim();

                if content.is_empty() || !self.state.can_send() {
                    return;
                }

                self.emit(ClientCommand::SendMessage(SendMessageCommand {
                    content: content.to_string(),
                }));
            }
            Action::CopyRoomKey => self.copy_room_key(),
            Action::DismissAlert => self.state.alert = None,
            // termination is handled by the state store
            Action::Exit => (),
        }
    }

    pub fn handle_connection_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => {
                info!(user_id = %self.state.user_id, "connected to the chat server")
            }
            ConnectionEvent::Disconnected => info!("disconnected from the chat server"),
        }
    }

    pub fn handle_server_event(&mut self, event: ServerEvent) {
        debug!(event = event.name(), "handling server event");

        match event {
            ServerEvent::Waiting(event) => self.update_waiting_count(&event),
            ServerEvent::Matched(event) => {
                self.start_session(event.room_id, MatchType::Random, None);
                self.state.add_notification(MATCHED_MESSAGE);
            }
            ServerEvent::MatchedWithScore(event) => {
                let message = keyword_match_message(&event);

                self.start_session(event.room_id, MatchType::Keyword, None);
                self.state.add_notification(message);
            }
            ServerEvent::PrivateRoomCreated(event) => {
                self.start_session(event.room_id, MatchType::Private, Some(event.room_key));
                self.state
                    .add_notification(or_default(event.message, PRIVATE_ROOM_CREATED_MESSAGE));
            }
            ServerEvent::JoinedPrivateRoom(event) => {
                self.start_session(event.room_id, MatchType::Private, Some(event.room_key));

                if event.has_history {
                    self.state.add_notification(LOADING_HISTORY_MESSAGE);
                } else {
                    self.state
                        .add_notification(or_default(event.message, PRIVATE_ROOM_JOINED_MESSAGE));
                }
            }
            ServerEvent::RoomHistory(event) => {
                if event.messages.is_empty() {
                    return;
                }

                self.state.add_notification(format!(
                    "── {} earlier message(s) ──",
                    event.messages.len()
                ));
                for message in event.messages {
                    self.add_chat_message(message);
                }
                self.state.add_notification(HISTORY_END_MESSAGE);
            }
            ServerEvent::NewMessage(message) => self.add_chat_message(message),
            ServerEvent::PartnerLeft(event) => {
                self.state.add_notification(format!("❌ {}", event.message));
                self.state.input_enabled = false;

                self.cancel_pending_reset();
                self.pending_reset = Some(
                    self.scheduler
                        .schedule(PARTNER_LEFT_RESET_DELAY, TaskKind::ResetAfterPartnerLeft),
                );
            }
            ServerEvent::LeftRoom(event) => info!(message = %event.message, "left the room"),
            ServerEvent::Error(event) => {
                warn!(message = %event.message, "server reported an error");
                self.state.alert = Some(event.message);
            }
        }
    }

    pub fn handle_scheduled(&mut self, task: ScheduledTask) {
        let is_pending = self
            .pending_reset
            .as_ref()
            .is_some_and(|handle| handle.id() == task.id);

        if !is_pending {
            debug!(?task, "ignoring a cancelled task");
            return;
        }

        self.pending_reset = None;

        match task.kind {
            TaskKind::ResetAfterPartnerLeft => self.state.reset_to_init(),
        }
    }

    fn profile_mode(&self) -> Option<ProfileMode> {
        match self.state.form {
            Some(Form::Profile(mode)) => Some(mode),
            _ => None,
        }
    }

    /// Emits a matching request and shows the waiting screen.
    fn join_queue(&mut self, command: ClientCommand) {
        self.cancel_pending_reset();
        self.emit(command);

        self.state.waiting_text = None;
        self.state.switch_screen(Screen::Waiting);
    }

    fn emit(&mut self, command: ClientCommand) {
        let name = command.name();

        match self.transport.emit(command) {
            Ok(()) => debug!(event = name, "command queued"),
            Err(err) => error!(event = name, error = %err, "could not emit command"),
        }
    }

    fn start_session(&mut self, room_id: String, match_type: MatchType, room_key: Option<RoomKey>) {
        self.cancel_pending_reset();
        info!(%room_id, match_type = match_type.label(), "chat session started");

        self.state.session = SessionContext {
            room_id: Some(room_id),
            room_key,
            match_type: Some(match_type),
        };
        self.state.waiting_text = None;
        self.state.switch_screen(Screen::Chatting);
        self.state.clear_messages();
        self.state.input_enabled = true;
    }

    fn add_chat_message(&mut self, message: ChatMessageEvent) {
        self.state
            .add_message(message.sender_id, message.content, message.timestamp);
    }

    fn update_waiting_count(&mut self, event: &WaitingEvent) {
        self.state.waiting_text = if event.waiting_count > 1 {
            Some(format!("{} people are waiting", event.waiting_count))
        } else {
            None
        };
    }

    fn copy_room_key(&mut self) {
        let Some(room_key) = self.state.session.room_key.as_ref() else {
            return;
        };

        match self.clipboard.copy(room_key.as_str()) {
            Ok(()) => info!("room key copied to the clipboard"),
            Err(err) => {
                warn!(error = %err, "could not copy the room key");
                self.state.alert = Some(format!(
                    "Could not access the clipboard, copy the room key manually: {room_key}"
                ));
            }
        }
    }

    fn cancel_pending_reset(&mut self) {
        if let Some(handle) = self.pending_reset.take() {
            debug!("cancelling the pending reset");
            handle.cancel();
        }
    }
}

/// Similarity is reported as a whole percentage.
fn score_percentage(score: f64) -> u32 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u32
}

fn keyword_match_message(event: &MatchedWithScoreEvent) -> String {
    let keywords = if event.matched_keywords.is_empty() {
        String::from("none")
    } else {
        event.matched_keywords.join(", ")
    };

    format!(
        "✅ Matched by interests ({}% similar). Shared keywords: {}",
        score_percentage(event.score),
        keywords
    )
}

fn or_default(message: String, default: &str) -> String {
    if message.trim().is_empty() {
        default.to_string()
    } else {
        message
    }
}
