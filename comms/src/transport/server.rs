use tokio::net::TcpStream;

use crate::{command::ClientCommand, event::ServerEvent};

use super::common::{json_lines, BoxedStream, JsonLineWriter};

/// [ClientCommand]s emitted by the client. Cancel safe, can be polled from `tokio::select!`.
pub type CommandStream = BoxedStream<anyhow::Result<ClientCommand>>;

/// Pushes [ServerEvent]s to the client
pub type EventWriter = JsonLineWriter<ServerEvent>;

/// Splits an accepted client connection into its command stream and an event writer.
pub fn split_tcp_stream(stream: TcpStream) -> (CommandStream, EventWriter) {
    let (reader, writer) = stream.into_split();

    (json_lines(reader, "client"), EventWriter::new(writer))
}
