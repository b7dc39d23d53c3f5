//! Common Utilities
//!
//! Error types, path resolution, and HTTP helpers shared by the subsystem.

pub mod error;
pub mod http;
pub mod paths;
pub mod result;

pub use error::{FetchError, ImageError, ValidationError, ValidationErrorKind};
pub use http::create_http_client;
pub use paths::{hearth_dir, images_dir};
pub use result::ImageResult;
