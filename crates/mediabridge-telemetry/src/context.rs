//! Span helpers that tie log lines to a single CLI invocation.

use tracing::Span;

use crate::init::build_sha;

/// Root span for one command invocation.
///
/// The request identifier matches the `x-request-id` header sent to the
/// backend, so client and server logs can be correlated.
#[must_use]
pub fn invocation_span(command: &str, request_id: &str) -> Span {
    tracing::info_span!(
        "invocation",
        command = %command,
        request_id = %request_id,
        build_sha = %build_sha()
    )
}
