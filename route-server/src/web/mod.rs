//! Web layer for the route optimizer.
//!
//! Provides an HTML form frontend and JSON endpoints for planning and
//! comparing routes.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, LastResult};
pub use templates::*;
