#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Page models for the MediaBridge dashboard.
//!
//! Every screen is split into plain state, pure logic, and a thin `api`
//! module that drives the shared [`mediabridge_client::QueryClient`]. Nothing
//! here renders; front-ends read the view structs and forward user intent.

pub mod core;
pub mod features;

pub use features::dashboard::state::{AddTaskForm, DashboardView, StatusSummary};
pub use features::records::state::{RecordFilter, RecordsState, RecordsView};
pub use features::settings::editor::SettingsEditor;
pub use features::tasks::state::{TaskCounts, TaskFilter, TasksState};
