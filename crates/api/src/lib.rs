//! Admin HTTP API: health, counters and cache inspection.
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_api_routes;
pub use state::AppState;
