use moka::sync::Cache;
use std::time::Duration;

/// Anti-forgery tokens for the async content fetch. Tokens are issued when
/// the placeholder container renders and stay valid until their TTL lapses;
/// they are not single-use, matching how page-embedded tokens get replayed
/// by every widget on the page.
pub struct TokenStore {
    tokens: Cache<String, ()>,
}

impl TokenStore {
    pub fn new(ttl: Duration) -> Self {
        let tokens = Cache::builder().time_to_live(ttl).build();
        Self { tokens }
    }

    /// Create with default settings (15 minute TTL)
    pub fn with_defaults() -> Self {
        Self::new(Duration::from_secs(900))
    }

    /// Issues a fresh token and records it for later validation.
    pub fn issue(&self) -> String {
        let token = generate_token();
        self.tokens.insert(token.clone(), ());
        token
    }

    /// True while the token is known and unexpired.
    pub fn validate(&self, token: &str) -> bool {
        self.tokens.get(token).is_some()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("entry_count", &self.tokens.entry_count())
            .finish()
    }
}

/// Generate a cryptographically secure random token
fn generate_token() -> String {
    use rand::Rng;

    // 32 random bytes encoded as hex (64 characters)
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.random()).collect();

    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>()
}
