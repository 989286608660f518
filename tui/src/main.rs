use clap::Parser;
use tracing::info;

use config::Config;
use state_store::{State, StateStore};
use termination::{create_termination, Interrupted, Terminator};
use ui_management::UiManager;

mod client;
mod clipboard;
mod config;
mod logging;
mod state_store;
mod termination;
mod ui_management;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init(&config.log_file, &config.log_level)?;

    let user_id = config.user_id.clone();
    info!(%user_id, server = %config.server, "anonymous chat client starting");

    let (terminator, mut interrupt_rx) = create_termination();
    let (state_store, state_rx) = StateStore::new();
    let (ui_manager, action_rx) = UiManager::new();

    tokio::try_join!(
        state_store.main_loop(
            State::new(user_id, config.server.clone()),
            terminator,
            action_rx,
            interrupt_rx.resubscribe()
        ),
        ui_manager.main_loop(state_rx, interrupt_rx.resubscribe()),
    )?;

    match interrupt_rx.recv().await {
        Ok(reason) => info!(?reason, "{}", reason.describe()),
        Err(_) => info!("exited because of an unexpected error"),
    }

    Ok(())
}
