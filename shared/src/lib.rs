// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("feature disabled")]
    FeatureDisabled,
    #[error("content store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Cache time-to-live expressed in whole minutes, as configured by admins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlMinutes(pub u64);

impl TtlMinutes {
    pub fn as_duration(self) -> std::time::Duration {
        std::time::Duration::from_secs(self.0 * 60)
    }
}

pub mod config;
