use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, Screen, SessionContext, State};
use crate::ui_management::components::{
    usage::{render_usage, HasUsageInfo, UsageInfo, UsageInfoLine},
    Component, ComponentRender,
};
use crate::ui_management::pages::centered_rect;

use super::components::{
    message_input_box::{self, MessageInputBox},
    message_list::{self, sanitize, MessageList},
};

struct Props {
    /// Room the user is chatting in
    session: SessionContext,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            session: state.session.clone(),
        }
    }
}

/// ChatPage handles the UI and the state of the chat page
pub struct ChatPage {
    /// Action sender
    action_tx: UnboundedSender<Action>,
    /// State Mapped ChatPage Props
    props: Props,
    // Internal State
    /// Whether the "leave the chat?" question is visible
    confirming_leave: bool,
    // Child Components
    message_list: MessageList,
    message_input_box: MessageInputBox,
}

impl ChatPage {
    fn has_room_key(&self) -> bool {
        self.props.session.room_key.is_some()
    }

    fn handle_leave_confirmation(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.confirming_leave = false;
                let _ = self.action_tx.send(Action::LeaveRoom);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirming_leave = false;
            }
            _ => {}
        }
    }

    fn header(&self) -> Text<'static> {
        let session = &self.props.session;
        let match_type = session
            .match_type
            .map(|match_type| match_type.label())
            .unwrap_or("unknown");
        let room_id = session.room_id.as_deref().unwrap_or("-");

        let mut lines = vec![Line::from(vec![
            "Chatting with a ".into(),
            Span::from(match_type).bold(),
            " partner in room ".into(),
            Span::from(sanitize(room_id).into_owned()).bold(),
        ])];

        if let Some(room_key) = session.room_key.as_ref() {
            lines.push(Line::from(vec![
                "Room key: ".into(),
                Span::from(room_key.to_string()).bold().fg(Color::Yellow),
                " (Ctrl+Y to copy)".italic(),
            ]));
        }

        Text::from(lines)
    }
}

impl Component for ChatPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        ChatPage {
            action_tx: action_tx.clone(),
            props: Props::from(state),
            confirming_leave: false,
            message_list: MessageList::from(state),
            message_input_box: MessageInputBox::new(state, action_tx),
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        ChatPage {
            props: Props::from(state),
            confirming_leave: self.confirming_leave && state.screen == Screen::Chatting,
            message_list: MessageList::from(state),
            // propogate the update to the child components
            message_input_box: self.message_input_box.move_with_state(state),
            ..self
        }
    }

    fn name(&self) -> &'static str {
        "Chat Page"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.confirming_leave {
            self.handle_leave_confirmation(key);
            return;
        }

        match key.code {
            KeyCode::Esc => self.confirming_leave = true,
            KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.has_room_key() {
                    let _ = self.action_tx.send(Action::CopyRoomKey);
                }
            }
            _ => self.message_input_box.handle_key_event(key),
        }
    }
}

impl ComponentRender<()> for ChatPage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        let [container_header, container_messages, container_input, container_usage] =
            *Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Length(4),
                        Constraint::Min(1),
                        Constraint::Length(3),
                        Constraint::Length(5),
                    ]
                    .as_ref(),
                )
                .split(frame.size())
        else {
            panic!("The chat layout should have 4 chunks")
        };

        let header = Paragraph::new(self.header()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Anonymous Chat"),
        );
        frame.render_widget(header, container_header);

        self.message_list.render(
            frame,
            message_list::RenderProps {
                area: container_messages,
            },
        );

        self.message_input_box.render(
            frame,
            message_input_box::RenderProps {
                area: container_input,
                show_cursor: !self.confirming_leave,
            },
        );

        render_usage(frame, container_usage, self.usage_info());

        if self.confirming_leave {
            let area = centered_rect(frame.size(), 40, 5);
            let question = Paragraph::new(Text::from(vec![
                Line::from("Leave this chat?"),
                Line::from(vec!["(y)".bold(), " yes  ".into(), "(n)".bold(), " no".into()]),
            ]))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Leave"));

            frame.render_widget(Clear, area);
            frame.render_widget(question, area);
        }
    }
}

impl HasUsageInfo for ChatPage {
    fn usage_info(&self) -> UsageInfo {
        let mut usage = self.message_input_box.usage_info();

        if self.has_room_key() {
            usage
                .lines
                .push(UsageInfoLine::new(&["Ctrl+Y"], "to copy the room key"));
        }
        usage
            .lines
            .push(UsageInfoLine::new(&["Esc"], "to leave the chat"));

        usage
    }
}
