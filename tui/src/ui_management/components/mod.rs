use crossterm::event::KeyEvent;
use ratatui::{prelude::Backend, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, State};

pub mod input_box;
pub mod usage;

/// A page or widget driven by the [State] snapshots of the state store.
///
/// Components never change the [State] themselves, key presses are turned
/// into [Action]s and the next snapshot reflects their outcome.
pub trait Component {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized;

    /// Rebuilds the component from the latest snapshot, keeping its local state
    /// such as half typed input.
    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized;

    /// Human readable name, used in logs
    fn name(&self) -> &'static str;

    fn handle_key_event(&mut self, key: KeyEvent);
}

/// Drawing is separated from [Component] so that children can take props
/// computed by their parent, such as the area they are drawn into.
pub trait ComponentRender<Props> {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: Props);
}
