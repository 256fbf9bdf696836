// src/api/mod.rs

pub mod chat;
pub mod error;
pub mod router;
pub mod status;

pub use error::{ApiError, ApiResult};
pub use router::{create_router, API_VERSION};
