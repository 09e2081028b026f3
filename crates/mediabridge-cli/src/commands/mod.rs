//! Command handlers, one module per screen.

pub(crate) mod dashboard;
pub(crate) mod prompt;
pub(crate) mod records;
pub(crate) mod settings;
pub(crate) mod tasks;
