use serde::{Deserialize, Serialize};

/// Body of `POST /url` on the shortening service.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    #[serde(rename = "totalClicks")]
    pub total_clicks: u64,
}

/// Form field posted by the page, also accepted as JSON on `/api/shorten`.
#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: String,
}

/// Everything the page needs to render, as served by `/api/session`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionView {
    pub source_url: String,
    pub short_id: Option<String>,
    pub short_link: Option<String>,
    pub clicks: Option<u64>,
    pub error: Option<String>,
    pub loading: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CopyResponse {
    pub link: String,
}
