use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Image descriptor attached to a promo item. All fields come from the
/// content store; `alt` may be empty when editors never filled it in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromoImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

/// A promotional block as the content store hands it out.
/// The core never mutates items; selection works on owned copies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromoItem {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image: Option<PromoImage>,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
    pub display_priority: i32,
    pub expiry_date: Option<NaiveDate>,
    pub date: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl PromoItem {
    /// An item stays active through the whole of its expiry day; comparison
    /// is at day granularity against the UTC calendar date.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        match self.expiry_date {
            Some(expiry) => expiry >= today,
            None => true,
        }
    }

    /// A call-to-action renders only when both halves are present and
    /// non-empty. One without the other is treated as absent.
    pub fn cta(&self) -> Option<(&str, &str)> {
        match (self.cta_text.as_deref(), self.cta_url.as_deref()) {
            (Some(text), Some(url)) if !text.is_empty() && !url.is_empty() => Some((text, url)),
            _ => None,
        }
    }
}

/// Editable fields of a promo item, as submitted through the
/// administrative surface. Identity and timestamps stay store-assigned.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PromoDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub image: Option<PromoImage>,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_url: Option<String>,
    #[serde(default)]
    pub display_priority: i32,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

/// Identifies one cache slot per logical view. The API slot is
/// parameterized by the caller-supplied limit, so different limits never
/// contaminate each other's results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionKey {
    Shortcode,
    AsyncLoad,
    Api { limit: usize },
}

impl std::fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionKey::Shortcode => write!(f, "promo_blocks"),
            SelectionKey::AsyncLoad => write!(f, "ajax_promo_blocks"),
            SelectionKey::Api { limit } => write!(f, "rest_promo_blocks_{limit}"),
        }
    }
}

pub const MIN_BLOCKS: usize = 1;
pub const MAX_BLOCKS: usize = 50;
pub const DEFAULT_MAX_BLOCKS: usize = 5;
pub const MAX_CACHE_TTL_MINUTES: u64 = 1440;
pub const DEFAULT_CACHE_TTL_MINUTES: u64 = 30;

/// Process-wide display configuration. Read on every selection and passed
/// explicitly into the pipeline; the core never reaches for ambient state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub feature_enabled: bool,
    pub max_blocks: usize,
    pub cache_ttl_minutes: u64,
    pub ajax_enabled: bool,
}

impl Settings {
    /// Clamp fields into their valid ranges. Applied at the settings
    /// persistence boundary only; the public API rejects out-of-range
    /// input instead of clamping.
    pub fn sanitized(self) -> Self {
        Self {
            feature_enabled: self.feature_enabled,
            max_blocks: self.max_blocks.clamp(MIN_BLOCKS, MAX_BLOCKS),
            cache_ttl_minutes: self.cache_ttl_minutes.min(MAX_CACHE_TTL_MINUTES),
            ajax_enabled: self.ajax_enabled,
        }
    }

    pub fn cache_ttl(&self) -> shared::TtlMinutes {
        shared::TtlMinutes(self.cache_ttl_minutes)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feature_enabled: true,
            max_blocks: DEFAULT_MAX_BLOCKS,
            cache_ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
            ajax_enabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item_expiring(expiry: Option<NaiveDate>) -> PromoItem {
        PromoItem {
            id: 1,
            title: "Summer sale".to_string(),
            content: String::new(),
            excerpt: String::new(),
            image: None,
            cta_text: None,
            cta_url: None,
            display_priority: 0,
            expiry_date: expiry,
            date: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
            modified: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn item_is_active_through_its_expiry_day() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let expires_today = item_expiring(NaiveDate::from_ymd_opt(2026, 6, 15));
        let expired_yesterday = item_expiring(NaiveDate::from_ymd_opt(2026, 6, 14));
        let never_expires = item_expiring(None);

        assert!(expires_today.is_active(today));
        assert!(!expired_yesterday.is_active(today));
        assert!(never_expires.is_active(today));
    }

    #[test]
    fn cta_requires_both_text_and_url() {
        let mut item = item_expiring(None);
        assert_eq!(item.cta(), None);

        item.cta_text = Some("Shop now".to_string());
        assert_eq!(item.cta(), None);

        item.cta_url = Some("https://example.com/sale".to_string());
        assert_eq!(item.cta(), Some(("Shop now", "https://example.com/sale")));

        item.cta_text = Some(String::new());
        assert_eq!(item.cta(), None);
    }

    #[test]
    fn sanitized_clamps_out_of_range_settings() {
        let settings = Settings {
            feature_enabled: true,
            max_blocks: 500,
            cache_ttl_minutes: 10_000,
            ajax_enabled: false,
        }
        .sanitized();

        assert_eq!(settings.max_blocks, MAX_BLOCKS);
        assert_eq!(settings.cache_ttl_minutes, MAX_CACHE_TTL_MINUTES);

        let zero = Settings {
            max_blocks: 0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(zero.max_blocks, MIN_BLOCKS);
    }

    #[test]
    fn api_keys_are_distinct_per_limit() {
        assert_ne!(
            SelectionKey::Api { limit: 5 }.to_string(),
            SelectionKey::Api { limit: 10 }.to_string()
        );
        assert_ne!(SelectionKey::Shortcode, SelectionKey::AsyncLoad);
    }
}
