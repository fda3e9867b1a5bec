//! REST interface layer.
//!
//! Thin translation between HTTP and the domain services: JSON in, the
//! `ApiResponse` envelope out. Business rejections come back as 400 with
//! the service's message verbatim; unexpected failures as 500 with a
//! generic connection message. No business logic lives here.

pub mod master_apis;
pub mod planning_apis;
pub mod purchase_apis;
pub mod distribution_apis;
pub mod receipt_apis;
pub mod export_apis;
pub mod cleaning_apis;
pub mod user_apis;

/// Message used when a handler hits an unexpected storage failure; the
/// dashboard shows it in a toast as-is.
pub const SERVER_ERROR_MESSAGE: &str = "Unable to connect to server. Please try again.";
