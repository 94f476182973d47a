use crate::client::ShortenerApi;
use crate::clipboard::Clipboard;
use crate::sessions::SessionStore;
use reqwest::Url;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub origin: Url,
    pub api: Arc<dyn ShortenerApi>,
    pub clipboard: Arc<dyn Clipboard>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(origin: Url, api: Arc<dyn ShortenerApi>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            origin,
            api,
            clipboard,
            sessions: SessionStore::new(),
        }
    }
}
