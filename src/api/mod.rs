//! HTTP API module for the Distribution Engine.
//!
//! This module provides the REST API endpoints for running distribution
//! calculations and free-capacity queries against the injected store.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{HealthResponse, create_router};
pub use request::{CalculationRequest, FreeCapacityQuery};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
