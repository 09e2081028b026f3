//! Dashboard feature: status card, counters, recent activity, add-task form.
//!
//! # Design
//! - Each section loads independently; one failing query does not blank the page.
//! - The add-task form keeps raw input and builds the request only on submit.

pub mod api;
pub mod logic;
pub mod state;
