//! Records pagination math and row formatting.

use mediabridge_api_models::{OrganizeRecordItem, OrganizeStatus};

use crate::core::logic::{EMPTY_CELL, format_date};

/// `ceil(total / page_size)`; zero rows means zero pages.
#[must_use]
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}

/// Detail line for a record: the error message for failures, otherwise the
/// organized target path.
#[must_use]
pub fn record_detail(record: &OrganizeRecordItem) -> String {
    match record.status {
        OrganizeStatus::Failed => record
            .error_message
            .clone()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| EMPTY_CELL.to_string()),
        _ => record.target_path.clone(),
    }
}

/// Creation time in display form.
#[must_use]
pub fn record_time(record: &OrganizeRecordItem) -> String {
    format_date(&record.created_at)
}
