use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromoEvent {
    ItemChanged(ItemChangedEvent),
    SettingsChanged(SettingsChangedEvent),
    CacheClearRequested(CacheClearRequestedEvent),
}

impl PromoEvent {
    pub fn item_changed(id: u64) -> Self {
        PromoEvent::ItemChanged(ItemChangedEvent {
            id,
            timestamp: now_timestamp(),
        })
    }

    pub fn settings_changed() -> Self {
        PromoEvent::SettingsChanged(SettingsChangedEvent {
            timestamp: now_timestamp(),
        })
    }

    pub fn cache_clear_requested() -> Self {
        PromoEvent::CacheClearRequested(CacheClearRequestedEvent {
            timestamp: now_timestamp(),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PromoEvent::ItemChanged(_) => "item_changed",
            PromoEvent::SettingsChanged(_) => "settings_changed",
            PromoEvent::CacheClearRequested(_) => "cache_clear_requested",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemChangedEvent {
    pub id: u64,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsChangedEvent {
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheClearRequestedEvent {
    pub timestamp: u64,
}

/// Helper to get current timestamp in seconds since UNIX epoch
pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
