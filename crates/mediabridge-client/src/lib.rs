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

//! Data access for the MediaBridge dashboard.
//!
//! Layout:
//! - `api.rs`: thin reqwest passthrough over the REST surface
//! - `query.rs`: cache keys, scopes, and fetch policy
//! - `cache.rs`: keyed cache with staleness, de-duplication, and invalidation
//! - `poll.rs`: background refetch loop for interval-polled queries
//! - `error.rs`: transport and query errors

pub mod api;
pub mod cache;
pub mod error;
pub mod poll;
pub mod query;

pub use api::ApiClient;
pub use cache::QueryClient;
pub use error::{ApiError, ApiResult, QueryError, QueryResult};
pub use poll::{PollHandle, QuerySnapshot};
pub use query::{QueryKey, QueryPolicy, QueryScope};
