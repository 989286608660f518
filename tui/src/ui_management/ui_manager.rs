use std::{
    io::{self, Stdout},
    time::Duration,
};

use anyhow::Context;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver},
};
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use crate::{
    state_store::{action::Action, State},
    ui_management::components::{Component, ComponentRender},
    Interrupted,
};

use super::pages::AppRouter;

const RENDERING_TICK_RATE: Duration = Duration::from_millis(250);

pub struct UiManager {
    action_tx: mpsc::UnboundedSender<Action>,
}

impl UiManager {
    pub fn new() -> (Self, UnboundedReceiver<Action>) {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        (Self { action_tx }, action_rx)
    }

    pub async fn main_loop(
        self,
        mut state_rx: UnboundedReceiver<State>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        // the state store sends the initial state before anything else
        let mut app_router = match state_rx.recv().await {
            Some(state) => AppRouter::new(&state, self.action_tx.clone()),
            None => anyhow::bail!("the state store stopped before the first render"),
        };

        let mut screen = Screen::enter()?;
        let mut ticker = tokio::time::interval(RENDERING_TICK_RATE);
        let mut crossterm_events = EventStream::new();

        loop {
            tokio::select! {
                // redraw at least every tick, e.g. after a resize
                _ = ticker.tick() => (),
                maybe_event = crossterm_events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        debug!(page = app_router.name(), code = ?key.code, "key pressed");
                        app_router.handle_key_event(key);
                    },
                    Some(Ok(_)) => (),
                    Some(Err(err)) => warn!(%err, "could not read terminal events"),
                    None => return Ok(Interrupted::UserInt),
                },
                Some(state) = state_rx.recv() => {
                    app_router = app_router.move_with_state(&state);
                },
                Ok(interrupted) = interrupt_rx.recv() => {
                    debug!(?interrupted, "ui loop interrupted");
                    return Ok(interrupted);
                }
            }

            screen.draw(&app_router)?;
        }
    }
}

/// The terminal in raw mode on the alternate screen, restored when dropped.
///
/// Mouse capture stays off so the room key can be selected with the mouse.
struct Screen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Screen {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("could not enable raw mode")?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Screen {
            terminal: Terminal::new(CrosstermBackend::new(stdout))?,
        })
    }

    fn draw(&mut self, app_router: &AppRouter) -> anyhow::Result<()> {
        self.terminal
            .draw(|frame| app_router.render(frame, ()))
            .context("could not render to the terminal")?;

        Ok(())
    }

    fn restore(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;

        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!(error = ?err, "could not restore the terminal");
        }
    }
}
