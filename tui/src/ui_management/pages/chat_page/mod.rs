#[allow(clippy::module_inception)]
mod chat_page;
mod components;

pub use self::chat_page::ChatPage;
