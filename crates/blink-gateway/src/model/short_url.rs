use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    #[serde(rename = "originalURL")]
    pub original_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUrlResponse {
    #[serde(rename = "shortURL")]
    pub short_url: String,
    #[serde(rename = "statsURL")]
    pub stats_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(rename = "shortURL")]
    pub short_url: String,
    #[serde(rename = "numRedirects")]
    pub num_redirects: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
