pub mod action;
mod controller;
pub mod scheduler;
mod state;
#[allow(clippy::module_inception)]
mod state_store;

pub use self::controller::ChatController;
pub use self::state::{Form, MatchType, MessageBoxItem, ProfileMode, Screen, SessionContext, State};
pub use self::state_store::StateStore;
