mod components;
mod pages;
mod ui_manager;

pub use self::ui_manager::UiManager;
