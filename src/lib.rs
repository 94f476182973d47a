pub mod app;
pub mod client;
pub mod clipboard;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod input;
pub mod models;
pub mod session;
pub mod sessions;
pub mod state;
pub mod ui;

pub use app::router;
pub use client::{HttpShortenerApi, ShortenerApi};
pub use clipboard::{Clipboard, SystemClipboard};
pub use config::Settings;
pub use sessions::SessionStore;
pub use state::AppState;
