use crate::errors::ApiError;
use crate::models::{AnalyticsResponse, CreateLinkRequest, CreateLinkResponse};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use tracing::debug;

/// The remote shortening service. Ids, storage, redirects and click counting
/// all live behind it.
#[async_trait]
pub trait ShortenerApi: Send + Sync {
    /// Registers `target` and returns the short identifier assigned to it.
    async fn create_short_link(&self, target: &str) -> Result<String, ApiError>;

    /// Reads the total click count recorded for `id`.
    async fn total_clicks(&self, id: &str) -> Result<u64, ApiError>;
}

pub struct HttpShortenerApi {
    client: Client,
    origin: Url,
}

impl HttpShortenerApi {
    pub fn new(origin: Url) -> Self {
        Self {
            client: Client::new(),
            origin,
        }
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.origin.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl ShortenerApi for HttpShortenerApi {
    async fn create_short_link(&self, target: &str) -> Result<String, ApiError> {
        let url = self.endpoint(["url"]);
        debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Headers", "*")
            .header("Access-Control-Allow-Credentials", "true")
            .json(&CreateLinkRequest {
                url: target.to_string(),
            })
            .send()
            .await?;

        let body: CreateLinkResponse = ensure_success(response)?.json().await?;
        Ok(body.id)
    }

    async fn total_clicks(&self, id: &str) -> Result<u64, ApiError> {
        let url = self.endpoint(["url", "analytics", id]);
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;

        let body: AnalyticsResponse = ensure_success(response)?.json().await?;
        Ok(body.total_clicks)
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(status))
    }
}

/// The user-facing link for `id`: the service origin, a slash, then the id.
pub fn short_link(origin: &Url, id: &str) -> String {
    format!("{}/{}", origin.as_str().trim_end_matches('/'), id)
}
