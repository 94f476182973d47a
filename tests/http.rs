use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use once_cell::sync::Lazy;
use reqwest::{Client, Url, redirect::Policy};
use serde::Deserialize;
use shortener_web::errors::ApiError;
use shortener_web::{HttpShortenerApi, ShortenerApi};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct SessionView {
    source_url: String,
    short_id: Option<String>,
    short_link: Option<String>,
    clicks: Option<u64>,
    error: Option<String>,
    loading: bool,
}

#[derive(Debug, Clone)]
struct CreateCall {
    url: String,
    headers: HeaderMap,
}

type Calls = Arc<StdMutex<Vec<CreateCall>>>;

/// Stand-in for the remote shortening service. Targets containing `fail` get
/// a 500, `malformed` gets a numeric id, `garbled` gets an id whose analytics
/// are not JSON, and everything else is assigned `abc123`.
struct FakeUpstream {
    origin: String,
    calls: Calls,
}

impl FakeUpstream {
    fn received(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|call| call.url.clone()).collect()
    }

    fn call_for(&self, url: &str) -> Option<CreateCall> {
        self.calls.lock().unwrap().iter().find(|call| call.url == url).cloned()
    }
}

#[derive(Debug, Deserialize)]
struct CreateBody {
    url: String,
}

async fn fake_create(
    State(calls): State<Calls>,
    headers: HeaderMap,
    Json(body): Json<CreateBody>,
) -> Response {
    calls.lock().unwrap().push(CreateCall {
        url: body.url.clone(),
        headers,
    });
    if body.url.contains("fail") {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    } else if body.url.contains("malformed") {
        Json(serde_json::json!({ "id": 5 })).into_response()
    } else if body.url.contains("garbled") {
        Json(serde_json::json!({ "id": "garbled" })).into_response()
    } else {
        Json(serde_json::json!({ "id": "abc123" })).into_response()
    }
}

async fn fake_analytics(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "abc123" => Json(serde_json::json!({ "totalClicks": 42 })).into_response(),
        "garbled" => "<html>oops</html>".into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn start_upstream() -> FakeUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind upstream");
    listener.set_nonblocking(true).expect("nonblocking upstream");
    let origin = format!("http://{}", listener.local_addr().unwrap());
    let calls: Calls = Arc::new(StdMutex::new(Vec::new()));

    let app = Router::new()
        .route("/url", post(fake_create))
        .route("/url/analytics/:id", get(fake_analytics))
        .with_state(Arc::clone(&calls));

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("upstream runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("upstream listener");
            axum::serve(listener, app).await.expect("upstream serve");
        });
    });

    FakeUpstream { origin, calls }
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static UPSTREAM: Lazy<FakeUpstream> = Lazy::new(start_upstream);
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/session")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_shortener_web"))
        .env("PORT", port.to_string())
        .env("SHORTENER_API_ORIGIN", &UPSTREAM.origin)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

/// A browser: keeps its session cookie and does not follow redirects.
fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .unwrap()
}

async fn shorten(client: &Client, server: &TestServer, url: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/shorten", server.base_url))
        .json(&serde_json::json!({ "url": url }))
        .send()
        .await
        .unwrap()
}

async fn post_empty(client: &Client, server: &TestServer, path: &str) -> reqwest::Response {
    client
        .post(format!("{}{path}", server.base_url))
        .send()
        .await
        .unwrap()
}

async fn post_form(
    client: &Client,
    server: &TestServer,
    path: &str,
    body: &str,
) -> reqwest::Response {
    client
        .post(format!("{}{path}", server.base_url))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body.to_string())
        .send()
        .await
        .unwrap()
}

async fn session(client: &Client, server: &TestServer) -> SessionView {
    client
        .get(format!("{}/api/session", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn page(client: &Client, server: &TestServer) -> String {
    client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
}

fn upstream_api() -> HttpShortenerApi {
    HttpShortenerApi::new(Url::parse(&UPSTREAM.origin).unwrap())
}

#[tokio::test]
async fn http_shorten_then_analytics() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = browser();

    let response = shorten(&client, &server, "https://example.com/some/long/path").await;
    assert!(response.status().is_success());
    let view: SessionView = response.json().await.unwrap();

    assert_eq!(view.short_id.as_deref(), Some("abc123"));
    assert_eq!(view.short_link, Some(format!("{}/abc123", UPSTREAM.origin)));
    assert_eq!(view.source_url, "https://example.com/some/long/path");
    assert!(!view.loading);
    assert!(
        UPSTREAM
            .received()
            .contains(&"http://example.com/some/long/path".to_string())
    );

    let view: SessionView = post_empty(&client, &server, "/api/analytics")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view.clicks, Some(42));
    assert_eq!(view.error, None);
}

#[tokio::test]
async fn http_create_request_carries_cors_headers() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = browser();

    let response = shorten(&client, &server, "example.com/cors").await;
    assert!(response.status().is_success());

    let call = UPSTREAM.call_for("http://example.com/cors").expect("create call recorded");
    assert_eq!(call.headers["access-control-allow-origin"], "*");
    assert_eq!(call.headers["access-control-allow-headers"], "*");
    assert_eq!(call.headers["access-control-allow-credentials"], "true");
}

#[tokio::test]
async fn http_empty_url_is_rejected_locally() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = browser();
    let before = UPSTREAM.received().len();

    let response = shorten(&client, &server, "https://").await;

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Please enter a URL.");
    assert_eq!(UPSTREAM.received().len(), before);
    let view = session(&client, &server).await;
    assert_eq!(view.error.as_deref(), Some("Please enter a URL."));
    assert!(!view.loading);
}

#[tokio::test]
async fn http_analytics_before_shorten_is_rejected_locally() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = browser();

    let response = post_empty(&client, &server, "/api/analytics").await;

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text().await.unwrap(),
        "Please shorten a URL first to view analytics."
    );
}

#[tokio::test]
async fn http_upstream_failure_keeps_previous_result() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = browser();

    let ok = shorten(&client, &server, "example.com/first").await;
    assert!(ok.status().is_success());

    let response = shorten(&client, &server, "example.com/fail").await;

    assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.text().await.unwrap(),
        "Failed to shorten URL. Please try again."
    );
    let view = session(&client, &server).await;
    assert_eq!(view.short_id.as_deref(), Some("abc123"));
    assert_eq!(
        view.error.as_deref(),
        Some("Failed to shorten URL. Please try again.")
    );
    assert!(!view.loading);
}

#[tokio::test]
async fn http_malformed_responses_are_request_errors() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = browser();

    let response = shorten(&client, &server, "example.com/malformed").await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.text().await.unwrap(),
        "Failed to shorten URL. Please try again."
    );
    assert_eq!(session(&client, &server).await.short_id, None);

    let response = shorten(&client, &server, "example.com/garbled").await;
    assert!(response.status().is_success());
    let response = post_empty(&client, &server, "/api/analytics").await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.text().await.unwrap(),
        "Failed to fetch analytics. Make sure the shortened URL is valid."
    );
    let view = session(&client, &server).await;
    assert_eq!(view.short_id.as_deref(), Some("garbled"));
    assert_eq!(view.clicks, None);
}

#[tokio::test]
async fn client_rejects_bodies_it_cannot_decode() {
    let api = upstream_api();

    let created = api.create_short_link("http://example.com/malformed").await;
    assert!(matches!(created, Err(ApiError::Http(_))), "{created:?}");

    let clicks = api.total_clicks("garbled").await;
    assert!(matches!(clicks, Err(ApiError::Http(_))), "{clicks:?}");

    let missing = api.total_clicks("missing").await;
    assert!(
        matches!(missing, Err(ApiError::Status(status)) if status == StatusCode::NOT_FOUND),
        "{missing:?}"
    );
}

#[tokio::test]
async fn http_api_copy_returns_the_link() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = browser();

    let response = post_empty(&client, &server, "/api/copy").await;
    assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);
    assert_eq!(response.text().await.unwrap(), "Please shorten a URL first.");

    shorten(&client, &server, "example.com/copy").await;
    let body: serde_json::Value = post_empty(&client, &server, "/api/copy")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["link"], format!("{}/abc123", UPSTREAM.origin));
}

#[tokio::test]
async fn http_browsers_have_separate_sessions() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let first = browser();
    let second = browser();

    shorten(&first, &server, "example.com/mine").await;

    assert_eq!(session(&first, &server).await.short_id.as_deref(), Some("abc123"));
    let other = session(&second, &server).await;
    assert_eq!(other.short_id, None);
    assert_eq!(other.source_url, "");
}

#[tokio::test]
async fn http_form_post_redirects_home() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = browser();

    let response = post_form(&client, &server, "/shorten", "url=example.com%2Fform").await;

    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/");
    assert!(UPSTREAM.received().contains(&"http://example.com/form".to_string()));
    let view = session(&client, &server).await;
    assert_eq!(view.source_url, "example.com/form");
    assert_eq!(view.error, None);
}

#[tokio::test]
async fn http_form_results_show_once_then_reload_starts_over() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = browser();

    post_form(&client, &server, "/shorten", "url=example.com").await;
    let response = post_empty(&client, &server, "/analytics").await;
    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);

    let html = page(&client, &server).await;
    assert!(html.contains(&format!("{}/abc123", UPSTREAM.origin)));
    assert!(html.contains(r#"<strong id="clicks-value">42</strong>"#));

    let reloaded = page(&client, &server).await;
    assert!(reloaded.contains(r#"id="result" hidden"#));
    assert!(!reloaded.contains("abc123"));
    assert_eq!(session(&client, &server).await.short_id, None);
}

#[tokio::test]
async fn http_copy_form_acknowledges_once() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = browser();

    post_form(&client, &server, "/shorten", "url=example.com%2Fcopy-form").await;
    let response = post_empty(&client, &server, "/copy").await;
    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);

    let html = page(&client, &server).await;
    assert!(html.contains("<dialog"));
    assert!(
        html.contains("<p>Shortened URL copied to clipboard!</p>")
            || html.contains("<p>Failed to copy URL.</p>"),
        "unexpected acknowledgment"
    );
    assert!(!html.contains(r#"role="alert" >"#));

    let reloaded = page(&client, &server).await;
    assert!(!reloaded.contains("<dialog"));
}
