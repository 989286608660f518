use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    prelude::{Backend, Rect},
    style::Color,
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, State};
use crate::ui_management::components::{
    input_box::{self, InputBox},
    usage::{HasUsageInfo, UsageInfo, UsageInfoLine},
    Component, ComponentRender,
};

/// Longest message the server accepts
pub const MAX_MESSAGE_CHARS: usize = 500;

struct Props {
    /// Whether the partner is still around to receive messages
    can_send: bool,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Self {
            can_send: state.can_send(),
        }
    }
}

pub struct MessageInputBox {
    action_tx: UnboundedSender<Action>,
    /// State Mapped MessageInputBox Props
    props: Props,
    // Internal State for the Component
    input_box: InputBox,
}

impl MessageInputBox {
    fn submit_message(&mut self) {
        let content = self.input_box.text().trim();
        if content.is_empty() {
            return;
        }

        let _ = self.action_tx.send(Action::SendMessage {
            content: content.to_string(),
        });

        self.input_box.reset();
    }
}

impl Component for MessageInputBox {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self {
        Self {
            action_tx,
            props: Props::from(state),
            input_box: InputBox::with_max_chars(MAX_MESSAGE_CHARS),
        }
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        Self {
            props: Props::from(state),
            ..self
        }
    }

    fn name(&self) -> &'static str {
        "Message Input"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press || !self.props.can_send {
            return;
        }

        if key.code == KeyCode::Enter {
            self.submit_message();
        } else {
            self.input_box.handle_key_event(key);
        }
    }
}

pub struct RenderProps {
    pub area: Rect,
    pub show_cursor: bool,
}

impl ComponentRender<RenderProps> for MessageInputBox {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        let (title, border_color) = if self.props.can_send {
            ("Message", Color::Yellow)
        } else {
            ("Message (disabled)", Color::DarkGray)
        };

        self.input_box.render(
            frame,
            input_box::RenderProps {
                title: title.into(),
                area: props.area,
                border_color,
                show_cursor: props.show_cursor && self.props.can_send,
            },
        )
    }
}

impl HasUsageInfo for MessageInputBox {
    fn usage_info(&self) -> UsageInfo {
        if self.props.can_send {
            UsageInfo {
                description: Some("Type your message to send it to your partner".into()),
                lines: vec![UsageInfoLine::new(&["Enter"], "to send your message")],
            }
        } else {
            UsageInfo {
                description: Some("Your partner has left, you can not send messages.".into()),
                lines: vec![],
            }
        }
    }
}
