//! Testimonial rating bounds.

use crate::error::CoreError;

/// Lowest accepted star rating.
pub const MIN_RATING: i16 = 1;

/// Highest accepted star rating.
pub const MAX_RATING: i16 = 5;

/// Rating given when a form omits it.
pub const DEFAULT_RATING: i16 = 5;

/// Validate that a rating is within `1..=5`.
pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )))
    }
}
