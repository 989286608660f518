use comms::{
    command::ClientCommand,
    event::ServerEvent,
    transport::{
        self,
        client::{CommandWriter, EventStream},
    },
};
use thiserror::Error;
use tokio::{
    net::TcpStream,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinSet,
};
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// Connection level notifications, they never carry data from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected,
    Disconnected,
}

/// Everything the connection task reports back to the state store
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Connection(ConnectionEvent),
    Event(ServerEvent),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("the connection task has stopped")]
    Closed,
}

/// Outbound side of the server connection, as seen by the controller.
pub trait Transport {
    /// Queues a command for the server. Commands emitted while disconnected are dropped.
    fn emit(&mut self, command: ClientCommand) -> Result<(), TransportError>;
    /// Drops the current connection and opens a new one.
    fn reconnect(&mut self) -> Result<(), TransportError>;
}

#[derive(Debug)]
enum Request {
    Emit(ClientCommand),
    Reconnect,
}

/// [Transport] implementation driving a background connection task.
/// Dropping the handle stops the task.
pub struct ClientHandle {
    _join_set: JoinSet<()>,
    request_tx: UnboundedSender<Request>,
}

impl ClientHandle {
    /// Spawns the connection task for `addr`. Connection status and server events
    /// are delivered over the returned receiver.
    pub fn connect(addr: String) -> (Self, UnboundedReceiver<Inbound>) {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let mut join_set = JoinSet::new();
        join_set.spawn(run_connection(addr, request_rx, inbound_tx));

        (
            ClientHandle {
                _join_set: join_set,
                request_tx,
            },
            inbound_rx,
        )
    }
}

impl Transport for ClientHandle {
    fn emit(&mut self, command: ClientCommand) -> Result<(), TransportError> {
        self.request_tx
            .send(Request::Emit(command))
            .map_err(|_| TransportError::Closed)
    }

    fn reconnect(&mut self) -> Result<(), TransportError> {
        self.request_tx
            .send(Request::Reconnect)
            .map_err(|_| TransportError::Closed)
    }
}

enum SessionEnd {
    ReconnectRequested,
    ServerClosed,
    HandleDropped,
}

async fn run_connection(
    addr: String,
    mut request_rx: UnboundedReceiver<Request>,
    inbound_tx: UnboundedSender<Inbound>,
) {
    loop {
        match TcpStream::connect(&addr).await {
            Ok(stream) => {
                info!(%addr, "connected to the server");
                let (mut event_stream, mut command_writer) =
                    transport::client::split_tcp_stream(stream);

                if inbound_tx
                    .send(Inbound::Connection(ConnectionEvent::Connected))
                    .is_err()
                {
                    return;
                }

                let end = forward(
                    &mut event_stream,
                    &mut command_writer,
                    &mut request_rx,
                    &inbound_tx,
                )
                .await;

                info!(%addr, "disconnected from the server");
                let _ = inbound_tx.send(Inbound::Connection(ConnectionEvent::Disconnected));

                match end {
                    SessionEnd::ReconnectRequested => continue,
                    SessionEnd::HandleDropped => return,
                    SessionEnd::ServerClosed => (),
                }
            }
            Err(err) => {
                warn!(%addr, error = %err, "could not connect to the server");
                let _ = inbound_tx.send(Inbound::Connection(ConnectionEvent::Disconnected));
            }
        }

        // stay offline until someone explicitly asks for a new connection
        if !wait_for_reconnect(&mut request_rx).await {
            return;
        }
    }
}

async fn forward(
    event_stream: &mut EventStream,
    command_writer: &mut CommandWriter,
    request_rx: &mut UnboundedReceiver<Request>,
    inbound_tx: &UnboundedSender<Inbound>,
) -> SessionEnd {
    loop {
        tokio::select! {
            maybe_event = event_stream.next() => match maybe_event {
                Some(Ok(event)) => {
                    debug!(event = event.name(), "received event");
                    if inbound_tx.send(Inbound::Event(event)).is_err() {
                        return SessionEnd::HandleDropped;
                    }
                },
                // a broken socket ends the session, an unparsable line is skipped
                Some(Err(err)) if is_read_failure(&err) => {
                    warn!(error = ?err, "failed to read from the server");
                    return SessionEnd::ServerClosed;
                },
                Some(Err(err)) => {
                    warn!(error = ?err, "skipping malformed event");
                },
                None => return SessionEnd::ServerClosed,
            },
            maybe_request = request_rx.recv() => match maybe_request {
                Some(Request::Emit(command)) => {
                    debug!(event = command.name(), "emitting command");
                    if let Err(err) = command_writer.write(&command).await {
                        warn!(error = ?err, "failed to write to the server");
                        return SessionEnd::ServerClosed;
                    }
                },
                Some(Request::Reconnect) => return SessionEnd::ReconnectRequested,
                None => return SessionEnd::HandleDropped,
            },
        }
    }
}

/// A line that is not valid UTF-8 is reported as `InvalidData`, the socket itself is fine.
fn is_read_failure(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|io_err| io_err.kind() != std::io::ErrorKind::InvalidData)
}

/// Returns `false` once the handle is gone.
async fn wait_for_reconnect(request_rx: &mut UnboundedReceiver<Request>) -> bool {
    while let Some(request) = request_rx.recv().await {
        match request {
            Request::Reconnect => return true,
            Request::Emit(command) => {
                warn!(event = command.name(), "not connected, dropping command");
            }
        }
    }

    false
}
