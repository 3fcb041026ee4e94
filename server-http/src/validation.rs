use promo::domain::{DEFAULT_MAX_BLOCKS, MAX_BLOCKS, MIN_BLOCKS};
use shared::Error;

/// Validates the caller-supplied `limit` for the public API. Out-of-range
/// values are rejected, never clamped; clamping only happens at the
/// settings persistence boundary.
pub fn validate_limit(limit: Option<i64>) -> Result<usize, Error> {
    let limit = match limit {
        None => return Ok(DEFAULT_MAX_BLOCKS),
        Some(value) => value,
    };

    if limit < MIN_BLOCKS as i64 || limit > MAX_BLOCKS as i64 {
        return Err(Error::Validation(format!(
            "limit must be between {MIN_BLOCKS} and {MAX_BLOCKS}, got {limit}"
        )));
    }

    Ok(limit as usize)
}
