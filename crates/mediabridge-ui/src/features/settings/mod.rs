//! Settings feature: a local draft of the configuration aggregate.
//!
//! # Design
//! - The draft is an owned value separate from the cached server copy.
//! - `DraftPhase` is explicit; saving is only possible from `Dirty`.
//! - Collisions and deletions park a `PendingAction` that the user must
//!   confirm or cancel. Nothing is clobbered or blocked silently.
//! - Form inputs stay as strings until they are applied.

pub mod api;
pub mod editor;
pub mod logic;
pub mod state;
