//! Organize record log feature.
//!
//! # Design
//! - Pagination and the status filter are sent to the backend verbatim.
//! - Page counts derive from the backend-reported total only.

pub mod api;
pub mod logic;
pub mod state;
