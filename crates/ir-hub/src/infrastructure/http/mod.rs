//! Browser-facing HTTP API: JSON request/response routes plus the SSE event
//! stream. CRUD glue only — all device semantics live in the application
//! layer.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::api_routes;
pub use state::AppState;
