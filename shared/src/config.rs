use tracing::warn;

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub token_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    const DEFAULT_TOKEN_TTL_SECS: u64 = 900;
    const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

    pub fn from_env() -> Self {
        let host = std::env::var("PROMO_HOST").unwrap_or_else(|_| Self::DEFAULT_HOST.to_string());
        let http_port = std::env::var("PROMO_HTTP_PORT")
            .unwrap_or_else(|_| Self::DEFAULT_HTTP_PORT.to_string())
            .parse::<u16>()
            .unwrap_or(Self::DEFAULT_HTTP_PORT);
        let token_ttl_secs = std::env::var("PROMO_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TOKEN_TTL_SECS.to_string())
            .parse::<u64>()
            .unwrap_or(Self::DEFAULT_TOKEN_TTL_SECS);
        let sweep_interval_secs = std::env::var("PROMO_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .unwrap_or_else(|_| {
                warn!(
                    "PROMO_SWEEP_INTERVAL_SECS is not a number, using default of {}s",
                    Self::DEFAULT_SWEEP_INTERVAL_SECS
                );
                Self::DEFAULT_SWEEP_INTERVAL_SECS
            });

        Self {
            host,
            http_port,
            token_ttl_secs,
            sweep_interval_secs,
        }
    }
}
