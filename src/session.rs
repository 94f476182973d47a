//! Page state and the three user actions that change it.
//!
//! Every action takes a [`Ticket`] when it starts. Only the holder of the most
//! recent ticket may write its result back; anything older is dropped, so two
//! overlapping actions can no longer clobber each other's loading flag, error
//! banner or result.

use crate::client::{ShortenerApi, short_link};
use crate::clipboard::Clipboard;
use crate::errors::{ClipboardError, OperationError};
use crate::input::normalize_target;
use crate::models::SessionView;
use reqwest::Url;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

pub const COPIED: &str = "Shortened URL copied to clipboard!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer action started while this one was in flight.
    Discarded,
}

#[derive(Debug, Default)]
pub struct Session {
    source_url: String,
    short_id: Option<String>,
    clicks: Option<u64>,
    error: Option<String>,
    loading: bool,
    generation: u64,
    notice: Option<String>,
    redirected: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn short_id(&self) -> Option<&str> {
        self.short_id.as_deref()
    }

    pub fn clicks(&self) -> Option<u64> {
        self.clicks
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_source_url(&mut self, raw: &str) {
        self.source_url = raw.to_string();
    }

    /// Starts an action: clears the banner, raises the loading flag and
    /// invalidates every ticket handed out before.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.error = None;
        self.loading = true;
        Ticket(self.generation)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    pub fn finish_shorten(
        &mut self,
        ticket: Ticket,
        result: Result<String, OperationError>,
    ) -> Result<Completion, OperationError> {
        self.finish(ticket, result, |session, id| {
            if session.short_id.as_deref() != Some(id.as_str()) {
                session.clicks = None;
            }
            session.short_id = Some(id);
        })
    }

    pub fn finish_analytics(
        &mut self,
        ticket: Ticket,
        result: Result<u64, OperationError>,
    ) -> Result<Completion, OperationError> {
        self.finish(ticket, result, |session, clicks| {
            session.clicks = Some(clicks);
        })
    }

    fn finish<T>(
        &mut self,
        ticket: Ticket,
        result: Result<T, OperationError>,
        apply: impl FnOnce(&mut Self, T),
    ) -> Result<Completion, OperationError> {
        if !self.is_current(ticket) {
            debug!("discarding result of superseded request {}", ticket.0);
            return Ok(Completion::Discarded);
        }
        self.loading = false;
        match result {
            Ok(value) => {
                apply(self, value);
                Ok(Completion::Applied)
            }
            Err(err) => {
                self.error = Some(err.message().to_string());
                Err(err)
            }
        }
    }

    /// Queues a one-shot acknowledgment for the next page render.
    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Marks that the next page load is the redirect after a form action and
    /// should show this session rather than start over.
    pub fn mark_redirected(&mut self) {
        self.redirected = true;
    }

    pub fn take_redirected(&mut self) -> bool {
        std::mem::take(&mut self.redirected)
    }

    pub fn view(&self, origin: &Url) -> SessionView {
        SessionView {
            source_url: self.source_url.clone(),
            short_id: self.short_id.clone(),
            short_link: self.short_id.as_deref().map(|id| short_link(origin, id)),
            clicks: self.clicks,
            error: self.error.clone(),
            loading: self.loading,
        }
    }
}

/// Shortens whatever the user typed. Empty input never reaches the network.
pub async fn submit(
    session: &Mutex<Session>,
    api: &dyn ShortenerApi,
    raw: &str,
) -> Result<Completion, OperationError> {
    let (ticket, target) = {
        let mut state = session.lock().await;
        state.set_source_url(raw);
        let ticket = state.begin();
        match normalize_target(raw) {
            Ok(target) => (ticket, target),
            Err(err) => return state.finish_shorten(ticket, Err(err)),
        }
    };

    let result = match api.create_short_link(&target).await {
        Ok(id) => {
            info!("shortened {target} as {id}");
            Ok(id)
        }
        Err(err) => {
            error!("failed to shorten {target}: {err}");
            Err(OperationError::SHORTEN_FAILED)
        }
    };

    session.lock().await.finish_shorten(ticket, result)
}

/// Fetches the click count for the id produced by the last successful shorten.
pub async fn view_analytics(
    session: &Mutex<Session>,
    api: &dyn ShortenerApi,
) -> Result<Completion, OperationError> {
    let (ticket, id) = {
        let mut state = session.lock().await;
        let ticket = state.begin();
        match state.short_id.clone() {
            Some(id) => (ticket, id),
            None => return state.finish_analytics(ticket, Err(OperationError::NO_SHORT_ID)),
        }
    };

    let result = api.total_clicks(&id).await.map_err(|err| {
        error!("failed to fetch analytics for {id}: {err}");
        OperationError::ANALYTICS_FAILED
    });

    session.lock().await.finish_analytics(ticket, result)
}

/// The link the copy button hands out.
pub async fn shortened_link(
    session: &Mutex<Session>,
    origin: &Url,
) -> Result<String, ClipboardError> {
    match session.lock().await.short_id() {
        Some(id) => Ok(short_link(origin, id)),
        None => Err(ClipboardError::NothingToCopy),
    }
}

/// Puts the shortened link on the server's clipboard and returns it. Does not
/// touch the loading flag or the error banner.
pub async fn copy_link(
    session: &Mutex<Session>,
    clipboard: Arc<dyn Clipboard>,
    origin: &Url,
) -> Result<String, ClipboardError> {
    let link = shortened_link(session, origin).await?;

    let text = link.clone();
    let written = tokio::task::spawn_blocking(move || clipboard.write_text(&text))
        .await
        .unwrap_or_else(|err| Err(ClipboardError::Unavailable(err.to_string())));
    if let Err(err) = written {
        error!("failed to copy {link}: {err}");
        return Err(err);
    }
    Ok(link)
}
