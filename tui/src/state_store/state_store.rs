use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver, UnboundedSender},
};
use tracing::info;

use crate::{
    client::{ClientHandle, Inbound},
    clipboard::SystemClipboard,
    Interrupted, Terminator,
};

use super::{action::Action, scheduler::TokioScheduler, ChatController, State};

pub struct StateStore {
    state_tx: UnboundedSender<State>,
}

impl StateStore {
    pub fn new() -> (Self, UnboundedReceiver<State>) {
        let (state_tx, state_rx) = mpsc::unbounded_channel::<State>();

        (StateStore { state_tx }, state_rx)
    }
}

impl StateStore {
    pub async fn main_loop(
        self,
        initial_state: State,
        terminator: Terminator,
        mut action_rx: UnboundedReceiver<Action>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let (client, mut inbound_rx) = ClientHandle::connect(initial_state.server_addr.clone());
        let (scheduler, mut task_rx) = TokioScheduler::new();
        let mut controller = ChatController::new(initial_state, client, SystemClipboard, scheduler);

        // the initial state once
        self.state_tx.send(controller.state().clone())?;

        let result = loop {
            tokio::select! {
                // Handle connection status and server events as they come in
                Some(inbound) = inbound_rx.recv() => match inbound {
                    Inbound::Connection(event) => controller.handle_connection_event(event),
                    Inbound::Event(event) => controller.handle_server_event(event),
                },
                // Handle the actions coming from the UI, a closed channel means the UI is gone
                maybe_action = action_rx.recv() => match maybe_action {
                    Some(Action::Exit) | None => {
                        let _ = terminator.terminate(Interrupted::UserInt);

                        break Interrupted::UserInt;
                    },
                    Some(action) => controller.handle_action(action),
                },
                // Timers scheduled by the controller
                Some(task) = task_rx.recv() => controller.handle_scheduled(task),
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break interrupted;
                },
            }

            self.state_tx.send(controller.state().clone())?;
        };

        info!(?result, "state store stopped");

        Ok(result)
    }
}
