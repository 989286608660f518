use tokio::sync::broadcast;
use tracing::{info, warn};

/// Why the application is shutting down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    OsSigInt,
    UserInt,
}

impl Interrupted {
    pub fn describe(&self) -> &'static str {
        match self {
            Interrupted::OsSigInt => "exited because of an os sig int",
            Interrupted::UserInt => "exited per user request",
        }
    }
}

/// Broadcasts the shutdown reason to every main loop.
#[derive(Debug, Clone)]
pub struct Terminator {
    interrupt_tx: broadcast::Sender<Interrupted>,
}

impl Terminator {
    pub fn new(interrupt_tx: broadcast::Sender<Interrupted>) -> Self {
        Self { interrupt_tx }
    }

    pub fn terminate(&self, interrupted: Interrupted) -> anyhow::Result<()> {
        self.interrupt_tx.send(interrupted)?;

        Ok(())
    }
}

async fn terminate_on_ctrl_c(terminator: Terminator) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not listen for the interrupt signal");
        return;
    }
    info!("received the interrupt signal");

    if let Err(err) = terminator.terminate(Interrupted::OsSigInt) {
        warn!(error = %err, "nobody is listening for the shutdown");
    }
}

/// Creates the shutdown channel and starts listening for an external interrupt.
///
/// In raw mode Ctrl+C reaches the UI as a key press, the signal handler only
/// covers interrupts sent from outside the terminal.
pub fn create_termination() -> (Terminator, broadcast::Receiver<Interrupted>) {
    let (tx, rx) = broadcast::channel(1);
    let terminator = Terminator::new(tx);

    tokio::spawn(terminate_on_ctrl_c(terminator.clone()));

    (terminator, rx)
}
