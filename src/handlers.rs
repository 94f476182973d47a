use crate::errors::{AppError, OperationError};
use crate::models::{CopyResponse, SessionView, ShortenForm};
use crate::session::{self, COPIED};
use crate::sessions::SharedSession;
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    Form, Json,
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;

/// Renders the page. A plain load or reload starts an empty session; only
/// the redirect that follows a form action shows the existing one.
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Html<String>) {
    let (jar, current) = state.sessions.resolve(jar).await;
    {
        let mut session = current.lock().await;
        if session.take_redirected() {
            let notice = session.take_notice();
            let html = render_index(&session.view(&state.origin), notice.as_deref());
            return (jar, Html(html));
        }
    }

    let (jar, fresh) = state.sessions.start(jar).await;
    let view = fresh.lock().await.view(&state.origin);
    (jar, Html(render_index(&view, None)))
}

pub async fn get_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionView>) {
    let (jar, current) = state.sessions.resolve(jar).await;
    (jar, Json(snapshot(&state, &current).await))
}

pub async fn shorten(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<ShortenForm>,
) -> (CookieJar, Result<Json<SessionView>, AppError>) {
    let (jar, current) = state.sessions.resolve(jar).await;
    let result = session::submit(&current, state.api.as_ref(), &payload.url).await;
    (jar, respond(result, &state, &current).await)
}

pub async fn analytics(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Result<Json<SessionView>, AppError>) {
    let (jar, current) = state.sessions.resolve(jar).await;
    let result = session::view_analytics(&current, state.api.as_ref()).await;
    (jar, respond(result, &state, &current).await)
}

/// Hands the link to the page, which writes it to the browser's clipboard.
pub async fn copy(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Result<Json<CopyResponse>, AppError>) {
    let (jar, current) = state.sessions.resolve(jar).await;
    let result = session::shortened_link(&current, &state.origin)
        .await
        .map(|link| Json(CopyResponse { link }))
        .map_err(AppError::from);
    (jar, result)
}

// Form fallbacks for browsers without scripts. Failures are already recorded
// in the session and show up on the next render.

pub async fn shorten_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ShortenForm>,
) -> (CookieJar, Redirect) {
    let (jar, current) = state.sessions.resolve(jar).await;
    let _ = session::submit(&current, state.api.as_ref(), &form.url).await;
    current.lock().await.mark_redirected();
    (jar, Redirect::to("/"))
}

pub async fn analytics_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let (jar, current) = state.sessions.resolve(jar).await;
    let _ = session::view_analytics(&current, state.api.as_ref()).await;
    current.lock().await.mark_redirected();
    (jar, Redirect::to("/"))
}

/// Without a script the only clipboard within reach is the server's.
pub async fn copy_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let (jar, current) = state.sessions.resolve(jar).await;
    let copied = session::copy_link(&current, state.clipboard.clone(), &state.origin).await;
    let notice = match copied {
        Ok(_) => COPIED,
        Err(err) => err.acknowledgment(),
    };

    let mut session = current.lock().await;
    session.set_notice(notice);
    session.mark_redirected();
    (jar, Redirect::to("/"))
}

async fn respond<T>(
    result: Result<T, OperationError>,
    state: &AppState,
    current: &SharedSession,
) -> Result<Json<SessionView>, AppError> {
    result?;
    Ok(Json(snapshot(state, current).await))
}

async fn snapshot(state: &AppState, current: &SharedSession) -> SessionView {
    current.lock().await.view(&state.origin)
}
