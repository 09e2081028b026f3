//! Records data access.

use mediabridge_client::{QueryClient, QueryResult};

use crate::features::records::logic::total_pages;
use crate::features::records::state::{RECORDS_PAGE_SIZE, RecordsState, RecordsView};

/// Load the page described by `state`.
///
/// # Errors
///
/// Returns the query failure after retries.
pub async fn load_records(client: &QueryClient, state: &RecordsState) -> QueryResult<RecordsView> {
    let response = client
        .organize_records(state.query())
        .await?
        .unwrap_or_default();
    Ok(RecordsView {
        total_pages: total_pages(response.total, RECORDS_PAGE_SIZE),
        total: response.total,
        page: state.page(),
        records: response.records,
    })
}
