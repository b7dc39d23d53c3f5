//! Common Result Type
//!
//! Type alias for image subsystem results.

use super::error::ImageError;

/// Image subsystem result type
pub type ImageResult<T> = Result<T, ImageError>;
