use tokio::net::TcpStream;

use crate::{command::ClientCommand, event::ServerEvent};

use super::common::{json_lines, BoxedStream, JsonLineWriter};

/// [ServerEvent]s pushed by the server. Cancel safe, can be polled from `tokio::select!`.
pub type EventStream = BoxedStream<anyhow::Result<ServerEvent>>;

/// Sends [ClientCommand]s to the server
pub type CommandWriter = JsonLineWriter<ClientCommand>;

/// Splits a connection to the server into its event stream and a command writer.
pub fn split_tcp_stream(stream: TcpStream) -> (EventStream, CommandWriter) {
    let (reader, writer) = stream.into_split();

    (json_lines(reader, "server"), CommandWriter::new(writer))
}
