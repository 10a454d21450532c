//! HTTP API module for the Payroll Engine.
//!
//! This module exposes payroll runs over REST: run creation and listing,
//! line item management, status transitions and CSV export.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AddItemRequest, CreateRunRequest, ListRunsQuery};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
