/// Set of commands which the client emits to the server
pub mod command;
/// Set of events pushed by the server to a single client session
pub mod event;
/// Optional profile attached to keyword matching and private room requests
pub mod profile;
/// Shareable keys identifying private rooms
pub mod room_key;
/// Implementation of event and command transportation over TCP Streams.
/// Requires 'server' or 'client' features to be enabled and will bring in tokio dependency alongside with other dependencies
pub mod transport;
