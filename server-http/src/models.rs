use chrono::{DateTime, NaiveDate, Utc};
use promo::domain::{PromoImage, PromoItem};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
}

// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// === Public API models ===

#[derive(Debug, Deserialize)]
pub struct PromosQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

impl From<PromoImage> for ImageResponse {
    fn from(image: PromoImage) -> Self {
        Self {
            url: image.url,
            width: image.width,
            height: image.height,
            alt: image.alt,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PromoResponse {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_url: Option<String>,
    pub display_priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    pub date: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl From<PromoItem> for PromoResponse {
    fn from(item: PromoItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            content: item.content,
            excerpt: item.excerpt,
            image: item.image.map(ImageResponse::from),
            cta_text: item.cta_text,
            cta_url: item.cta_url,
            display_priority: item.display_priority,
            expiry_date: item.expiry_date,
            date: item.date,
            modified: item.modified,
        }
    }
}

// === Async load models ===

#[derive(Debug, Deserialize)]
pub struct LoadRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoadSuccess {
    pub success: bool,
    pub html: String,
}

impl LoadSuccess {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            success: true,
            html: html.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoadFailure {
    pub success: bool,
    pub message: String,
}

impl LoadFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

// === Admin models ===

#[derive(Debug, Serialize)]
pub struct DeleteItemResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub requested: bool,
}
