use crate::session::Session;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use moka::future::Cache;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::debug;

pub const SESSION_COOKIE: &str = "shortener_session";

const MAX_SESSIONS: u64 = 10_000;
const IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

pub type SharedSession = Arc<Mutex<Session>>;

/// One [`Session`] per browser, found through the session cookie. Pages that
/// are abandoned simply age out.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, SharedSession>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_idle(IDLE_TIMEOUT)
                .build(),
        }
    }

    /// The session named by the cookie, or a fresh one with a new cookie.
    pub async fn resolve(&self, jar: CookieJar) -> (CookieJar, SharedSession) {
        if let Some(cookie) = jar.get(SESSION_COOKIE)
            && let Some(session) = self.sessions.get(cookie.value()).await
        {
            return (jar, session);
        }
        self.start(jar).await
    }

    /// Drops whatever the cookie pointed at and hands out an empty session.
    pub async fn start(&self, jar: CookieJar) -> (CookieJar, SharedSession) {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            self.sessions.invalidate(cookie.value()).await;
        }

        let id = format!("{:032x}", rand::random::<u128>());
        let session = Arc::new(Mutex::new(Session::new()));
        self.sessions.insert(id.clone(), Arc::clone(&session)).await;
        debug!("started session {id}");

        let cookie = Cookie::build((SESSION_COOKIE, id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        (jar.add(cookie), session)
    }
}
