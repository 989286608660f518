use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, State};
use crate::ui_management::components::{Component, ComponentRender};

use super::centered_rect;

struct Props {
    /// Queue status reported by the server
    waiting_text: Option<String>,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            waiting_text: state.waiting_text.clone(),
        }
    }
}

/// WaitingPage is shown while the server looks for a partner
pub struct WaitingPage {
    /// Action sender
    action_tx: UnboundedSender<Action>,
    /// State Mapped WaitingPage Props
    props: Props,
}

impl Component for WaitingPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        WaitingPage {
            action_tx,
            props: Props::from(state),
        }
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        WaitingPage {
            props: Props::from(state),
            ..self
        }
    }

    fn name(&self) -> &'static str {
        "Waiting Page"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('c') => {
                let _ = self.action_tx.send(Action::CancelMatching);
            }
            KeyCode::Char('q') => {
                let _ = self.action_tx.send(Action::Exit);
            }
            _ => {}
        }
    }
}

impl ComponentRender<()> for WaitingPage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        let area = centered_rect(frame.size(), 40, 7);

        let mut lines = vec![Line::from("Looking for someone to chat with...".bold())];
        lines.push(Line::from(
            self.props.waiting_text.clone().unwrap_or_default(),
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            "Press ".into(),
            "<Esc>".bold(),
            " to cancel.".into(),
        ]));

        let waiting = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Matching"));
        frame.render_widget(waiting, area);
    }
}
