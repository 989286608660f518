use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, Form, ProfileMode, State};
use crate::ui_management::components::{
    input_box::{self, InputBox},
    usage::{render_usage, HasUsageInfo, UsageInfo, UsageInfoLine},
    Component, ComponentRender,
};

use super::centered_rect;

const PROFILE_FIELDS: [&str; 3] = ["Bio", "Purpose", "Keywords (space separated)"];
const JOIN_BY_KEY_FIELDS: [&str; 4] = [
    "Room Key (8 characters)",
    "Bio",
    "Purpose",
    "Keywords (space separated)",
];

struct Props {
    /// The id of the local user
    user_id: String,
    /// The server the client talks to
    server_addr: String,
    /// Form shown instead of the menu
    form: Option<Form>,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            user_id: state.user_id.clone(),
            server_addr: state.server_addr.clone(),
            form: state.form,
        }
    }
}

/// StartPage offers the matching modes and the forms some of them need
pub struct StartPage {
    /// Action sender
    action_tx: UnboundedSender<Action>,
    /// State Mapped StartPage Props
    props: Props,
    // Internal State
    /// Inputs of the visible form, in display order
    fields: Vec<InputBox>,
    /// Index of the input receiving key presses
    focused_field: usize,
}

impl StartPage {
    fn field_titles(&self) -> &'static [&'static str] {
        match self.props.form {
            Some(Form::Profile(_)) => &PROFILE_FIELDS,
            Some(Form::JoinByKey) => &JOIN_BY_KEY_FIELDS,
            None => &[],
        }
    }

    fn reset_fields(&mut self) {
        self.fields = self
            .field_titles()
            .iter()
            .map(|_| InputBox::default())
            .collect();
        self.focused_field = 0;
    }

    fn field_text(&self, idx: usize) -> String {
        self.fields
            .get(idx)
            .map(|field| field.text().to_string())
            .unwrap_or_default()
    }

    fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused_field = (self.focused_field + 1) % self.fields.len();
        }
    }

    fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focused_field = self
                .focused_field
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    fn submit(&self, form: Form) {
        let action = match form {
            Form::Profile(_) => Action::SubmitProfile {
                bio: self.field_text(0),
                purpose: self.field_text(1),
                keywords: self.field_text(2),
            },
            Form::JoinByKey => Action::JoinByKey {
                room_key: self.field_text(0),
                bio: self.field_text(1),
                purpose: self.field_text(2),
                keywords: self.field_text(3),
            },
        };

        let _ = self.action_tx.send(action);
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let action = match key.code {
            KeyCode::Char('r') => Action::StartRandomMatch,
            KeyCode::Char('k') => Action::StartKeywordMatch,
            KeyCode::Char('p') => Action::CreatePrivateRoom,
            KeyCode::Char('j') => Action::ShowJoinByKey,
            KeyCode::Char('q') => Action::Exit,
            _ => return,
        };

        let _ = self.action_tx.send(action);
    }

    fn handle_form_key(&mut self, form: Form, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                let _ = self.action_tx.send(Action::CloseForm);
            }
            KeyCode::Enter => self.submit(form),
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_previous(),
            KeyCode::Char('s')
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(form, Form::Profile(_)) =>
            {
                let _ = self.action_tx.send(Action::SkipProfile);
            }
            _ => {
                if let Some(field) = self.fields.get_mut(self.focused_field) {
                    field.handle_key_event(key);
                }
            }
        }
    }

    fn render_menu<B: Backend>(&self, frame: &mut Frame<B>) {
        let area = centered_rect(frame.size(), 50, 12);

        let menu = Paragraph::new(Text::from(vec![
            Line::from(vec![
                "Chatting anonymously as ".into(),
                Span::from(format!("@{}", self.props.user_id)).bold(),
            ]),
            Line::from(Span::from(format!("Server: {}", self.props.server_addr)).italic()),
            Line::from(""),
            Line::from(vec!["(r)".bold(), " Random match".into()]),
            Line::from(vec!["(k)".bold(), " Match by interests".into()]),
            Line::from(vec!["(p)".bold(), " Create a private room".into()]),
            Line::from(vec!["(j)".bold(), " Join a private room by key".into()]),
            Line::from(""),
            Line::from(vec!["(q)".bold(), " Quit".into()]),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Anonymous Chat"),
        );

        frame.render_widget(menu, area);
    }

    fn render_form<B: Backend>(&self, frame: &mut Frame<B>, form: Form) {
        let titles = self.field_titles();
        let area = centered_rect(frame.size(), 60, 3 * titles.len() as u16 + 8);

        let mut constraints: Vec<Constraint> =
            titles.iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Min(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, (field, title)) in self.fields.iter().zip(titles.iter()).enumerate() {
            let is_focused = idx == self.focused_field;

            field.render(
                frame,
                input_box::RenderProps {
                    title: title.to_string(),
                    area: chunks[idx],
                    border_color: if is_focused {
                        Color::Yellow
                    } else {
                        Color::Reset
                    },
                    show_cursor: is_focused,
                },
            );
        }

        let mut usage = self.usage_info();
        usage.description = Some(form_description(form).into());
        render_usage(frame, chunks[titles.len()], usage);
    }
}

fn form_description(form: Form) -> &'static str {
    match form {
        Form::Profile(ProfileMode::Keyword) => {
            "Describe yourself to find a partner with similar interests."
        }
        Form::Profile(ProfileMode::Private) => {
            "Optionally describe yourself before creating the room."
        }
        Form::JoinByKey => "Enter the key your partner has shared with you.",
    }
}

impl Component for StartPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        let mut page = StartPage {
            action_tx,
            props: Props::from(state),
            fields: Vec::new(),
            focused_field: 0,
        };
        page.reset_fields();

        page.move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        let form_changed = self.props.form != state.form;
        let mut page = StartPage {
            props: Props::from(state),
            ..self
        };

        // a different form starts out empty
        if form_changed {
            page.reset_fields();
        }

        page
    }

    fn name(&self) -> &'static str {
        "Start Page"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.props.form {
            None => self.handle_menu_key(key),
            Some(form) => self.handle_form_key(form, key),
        }
    }
}

impl ComponentRender<()> for StartPage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        match self.props.form {
            None => self.render_menu(frame),
            Some(form) => self.render_form(frame, form),
        }
    }
}

impl HasUsageInfo for StartPage {
    fn usage_info(&self) -> UsageInfo {
        let mut lines = vec![
            UsageInfoLine::new(&["Tab", "↓"], "next field"),
            UsageInfoLine::new(&["Enter"], "to submit"),
        ];
        if matches!(self.props.form, Some(Form::Profile(_))) {
            lines.push(UsageInfoLine::new(&["Ctrl+S"], "to skip the profile"));
        }
        lines.push(UsageInfoLine::new(&["Esc"], "to go back"));

        UsageInfo {
            description: None,
            lines,
        }
    }
}
