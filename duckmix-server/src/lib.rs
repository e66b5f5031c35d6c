//! Axum HTTP service around the duckmix mixer.
//!
//! Endpoints:
//! - `GET /health`: liveness probe
//! - `POST /api/mix`: multipart upload of music and voice plus mix options
//! - `GET /download/{name}`: fetch a previously produced mix
//! - `GET /`: static upload page

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
