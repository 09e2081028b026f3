//! Feature slices, one per screen.

pub mod dashboard;
pub mod records;
pub mod settings;
pub mod tasks;
