// src/api/mod.rs

pub mod error;
pub mod handlers;
pub mod router;

pub use error::{ApiError, ApiResult, GENERIC_FAILURE};
pub use router::create_router;
