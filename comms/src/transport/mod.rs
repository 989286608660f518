//! Newline delimited JSON over TCP. Both directions share the same codec, only
//! the message types differ.

/// Client side of the connection: reads events, writes commands
#[cfg(feature = "client")]
pub mod client;
#[cfg(any(feature = "client", feature = "server"))]
mod common;
/// Server side of the connection, used by test doubles of the chat server
#[cfg(feature = "server")]
pub mod server;
