//! Task list feature.
//!
//! # Design
//! - The backend returns one large page; status tabs filter client-side.
//! - Deletion is a two-step request/confirm held in state, never a direct call.

pub mod api;
pub mod logic;
pub mod state;
