//! IGCE API Library
//!
//! HTTP views for the IGCE and pricing-history CSV upload forms, with their middleware and
//! application setup.

pub mod auth;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod templates;
pub mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
