use chrono::{DateTime, FixedOffset};
use comms::room_key::RoomKey;

/// Top level screens, exactly one of them is visible at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Init,
    Waiting,
    Chatting,
}

/// What a submitted profile form is going to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMode {
    Keyword,
    Private,
}

/// Forms shown on top of the [Screen::Init] screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Profile(ProfileMode),
    JoinByKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Random,
    Keyword,
    Private,
}

impl MatchType {
    pub fn label(&self) -> &'static str {
        match self {
            MatchType::Random => "random",
            MatchType::Keyword => "keyword",
            MatchType::Private => "private",
        }
    }
}

/// Data about the room the user is chatting in, only lives as long as one chat session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub room_id: Option<String>,
    /// Only present for private rooms
    pub room_key: Option<RoomKey>,
    pub match_type: Option<MatchType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageBoxItem {
    Message {
        sender_id: String,
        content: String,
        timestamp: DateTime<FixedOffset>,
        is_own: bool,
    },
    /// Locally synthesized notice, not attributed to any user
    Notification(String),
}

/// State holds the view model of the application, rendered by the UI
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// The id of the local user, used to tell own messages apart
    pub user_id: String,
    /// Address of the chat server
    pub server_addr: String,
    /// Currently visible screen
    pub screen: Screen,
    /// Form visible on the init screen, if any
    pub form: Option<Form>,
    pub session: SessionContext,
    /// Messages of the current chat session, oldest first
    pub messages: Vec<MessageBoxItem>,
    pub input_enabled: bool,
    /// Queue status shown on the waiting screen
    pub waiting_text: Option<String>,
    /// Blocking notice the user has to dismiss
    pub alert: Option<String>,
}

impl State {
    pub fn new(user_id: String, server_addr: String) -> Self {
        State {
            user_id,
            server_addr,
            screen: Screen::Init,
            form: None,
            session: SessionContext::default(),
            messages: Vec::new(),
            input_enabled: true,
            waiting_text: None,
            alert: None,
        }
    }

    /// Hides every form and makes `screen` the only visible screen.
    pub fn switch_screen(&mut self, screen: Screen) {
        self.form = None;
        self.screen = screen;
    }

    /// Shows a form on the init screen, replacing any other visible form.
    pub fn show_form(&mut self, form: Form) {
        self.switch_screen(Screen::Init);
        self.form = Some(form);
    }

    pub fn is_active(&self, screen: Screen) -> bool {
        self.screen == screen
    }

    /// Messages can only be sent while chatting with a partner that has not left.
    pub fn can_send(&self) -> bool {
        self.screen == Screen::Chatting && self.input_enabled
    }

    pub fn add_message(
        &mut self,
        sender_id: String,
        content: String,
        timestamp: DateTime<FixedOffset>,
    ) {
        let is_own = sender_id == self.user_id;

        self.messages.push(MessageBoxItem::Message {
            sender_id,
            content,
            timestamp,
            is_own,
        });
    }

    pub fn add_notification(&mut self, content: impl Into<String>) {
        self.messages
            .push(MessageBoxItem::Notification(content.into()));
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// Returns to the init screen with an empty, writable chat.
    pub fn reset_to_init(&mut self) {
        self.switch_screen(Screen::Init);
        self.clear_messages();
        self.input_enabled = true;
        self.session = SessionContext::default();
        self.waiting_text = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> State {
        State::new("me".into(), "localhost:8080".into())
    }

    fn timestamp() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-01T10:00:00+00:00").unwrap()
    }

    #[test]
    fn test_switch_screen_is_exclusive_and_idempotent() {
        let mut state = state();
        state.show_form(Form::JoinByKey);

        for screen in [Screen::Waiting, Screen::Waiting, Screen::Chatting, Screen::Init] {
            state.switch_screen(screen);

            let active = [Screen::Init, Screen::Waiting, Screen::Chatting]
                .into_iter()
                .filter(|s| state.is_active(*s))
                .count();
            assert_eq!(active, 1);
            assert_eq!(state.screen, screen);
            assert_eq!(state.form, None);
        }
    }

    #[test]
    fn test_show_form_replaces_previous_form() {
        let mut state = state();
        state.switch_screen(Screen::Waiting);

        state.show_form(Form::Profile(ProfileMode::Keyword));
        state.show_form(Form::Profile(ProfileMode::Private));

        assert_eq!(state.screen, Screen::Init);
        assert_eq!(state.form, Some(Form::Profile(ProfileMode::Private)));
    }

    #[test]
    fn test_message_ownership() {
        let mut state = state();

        state.add_message("me".into(), "mine".into(), timestamp());
        state.add_message("other".into(), "theirs".into(), timestamp());

        let owners: Vec<bool> = state
            .messages
            .iter()
            .filter_map(|item| match item {
                MessageBoxItem::Message { is_own, .. } => Some(*is_own),
                MessageBoxItem::Notification(_) => None,
            })
            .collect();
        assert_eq!(owners, vec![true, false]);
    }

    #[test]
    fn test_reset_to_init() {
        let mut state = state();
        state.switch_screen(Screen::Chatting);
        state.session.room_id = Some("1".into());
        state.session.match_type = Some(MatchType::Random);
        state.input_enabled = false;
        state.add_notification("hello");

        state.reset_to_init();

        assert_eq!(state.screen, Screen::Init);
        assert!(state.messages.is_empty());
        assert!(state.input_enabled);
        assert_eq!(state.session, SessionContext::default());
    }
}
