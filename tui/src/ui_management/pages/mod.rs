use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, Screen, State};

use self::{chat_page::ChatPage, start_page::StartPage, waiting_page::WaitingPage};

use super::components::{Component, ComponentRender};

mod chat_page;
mod start_page;
mod waiting_page;

struct Props {
    active_page: Screen,
    /// Blocking notice drawn above the active page
    alert: Option<String>,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            active_page: state.screen,
            alert: state.alert.clone(),
        }
    }
}

pub struct AppRouter {
    action_tx: UnboundedSender<Action>,
    props: Props,
    //
    start_page: StartPage,
    waiting_page: WaitingPage,
    chat_page: ChatPage,
}

impl AppRouter {
    fn get_active_page_component(&self) -> &dyn Component {
        match self.props.active_page {
            Screen::Init => &self.start_page,
            Screen::Waiting => &self.waiting_page,
            Screen::Chatting => &self.chat_page,
        }
    }

    fn get_active_page_component_mut(&mut self) -> &mut dyn Component {
        match self.props.active_page {
            Screen::Init => &mut self.start_page,
            Screen::Waiting => &mut self.waiting_page,
            Screen::Chatting => &mut self.chat_page,
        }
    }
}

impl Component for AppRouter {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        AppRouter {
            action_tx: action_tx.clone(),
            props: Props::from(state),
            //
            start_page: StartPage::new(state, action_tx.clone()),
            waiting_page: WaitingPage::new(state, action_tx.clone()),
            chat_page: ChatPage::new(state, action_tx),
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        AppRouter {
            props: Props::from(state),
            //
            start_page: self.start_page.move_with_state(state),
            waiting_page: self.waiting_page.move_with_state(state),
            chat_page: self.chat_page.move_with_state(state),
            ..self
        }
    }

    // route all functions to the active page
    fn name(&self) -> &'static str {
        self.get_active_page_component().name()
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Ctrl+C always quits, even behind an alert
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            let _ = self.action_tx.send(Action::Exit);
            return;
        }

        // the alert blocks every other interaction until it is dismissed
        if self.props.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                let _ = self.action_tx.send(Action::DismissAlert);
            }
            return;
        }

        self.get_active_page_component_mut().handle_key_event(key)
    }
}

impl ComponentRender<()> for AppRouter {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: ()) {
        match self.props.active_page {
            Screen::Init => self.start_page.render(frame, props),
            Screen::Waiting => self.waiting_page.render(frame, props),
            Screen::Chatting => self.chat_page.render(frame, props),
        }

        if let Some(alert) = self.props.alert.as_ref() {
            render_alert(frame, alert);
        }
    }
}

fn render_alert<B: Backend>(frame: &mut Frame<B>, alert: &str) {
    let area = centered_rect(frame.size(), 50, 7);

    let text = Text::from(vec![
        Line::from(alert.to_string()),
        Line::from(""),
        Line::from(vec![
            "Press ".into(),
            "<Enter>".bold(),
            " to dismiss.".into(),
        ]),
    ]);
    let alert = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title("Notice"),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(alert, area);
}

/// A rectangle of `percent_x` width and `height` rows in the middle of `area`.
pub(super) fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
    let [_, vertical_centered, _] = *Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(0),
                Constraint::Length(height),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area)
    else {
        panic!("The vertical layout should have 3 chunks")
    };

    let [_, both_centered, _] = *Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(vertical_centered)
    else {
        panic!("The horizontal layout should have 3 chunks")
    };

    both_centered
}
