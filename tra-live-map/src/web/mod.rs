//! Web layer for the live train map.
//!
//! Serves the host page, the latest map document and a status summary.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
