//! HTTP handlers

pub mod download;
pub mod error;
pub mod health;
pub mod quality;

pub use download::download_video;
pub use error::{ApiError, ErrorBody};
pub use health::health_routes;
pub use quality::quality_info;
