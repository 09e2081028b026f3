//! Cross-feature helpers.

pub mod logic;
