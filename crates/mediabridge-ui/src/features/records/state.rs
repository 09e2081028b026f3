//! Records page state.

use mediabridge_api_models::{OrganizeRecordItem, OrganizeStatus, PageQuery};

use crate::features::records::logic::total_pages;

/// Rows per records page.
pub const RECORDS_PAGE_SIZE: u32 = 20;

/// Status filter for organize records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RecordFilter {
    /// Every record.
    #[default]
    All,
    /// Successful organizations (成功).
    Success,
    /// Failed organizations (失败).
    Failed,
}

impl RecordFilter {
    /// Filters in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Success, Self::Failed];

    /// Status code sent to the backend, `None` for no filter.
    #[must_use]
    pub const fn status_code(self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Success => Some(OrganizeStatus::Success.code()),
            Self::Failed => Some(OrganizeStatus::Failed.code()),
        }
    }

    /// Filter label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "全部",
            Self::Success => "成功",
            Self::Failed => "失败",
        }
    }

    /// Parse a filter from its label or an English alias.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim() {
            "all" | "全部" => Some(Self::All),
            "success" | "成功" => Some(Self::Success),
            "failed" | "失败" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Page number and filter for the records view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordsState {
    page: u32,
    filter: RecordFilter,
}

impl Default for RecordsState {
    fn default() -> Self {
        Self {
            page: 1,
            filter: RecordFilter::All,
        }
    }
}

impl RecordsState {
    /// Current one-based page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Current filter.
    #[must_use]
    pub const fn filter(&self) -> RecordFilter {
        self.filter
    }

    /// Query for the current page and filter.
    #[must_use]
    pub const fn query(&self) -> PageQuery {
        PageQuery::new(self.page, RECORDS_PAGE_SIZE).with_status(self.filter.status_code())
    }

    /// Change the filter; always returns to page 1.
    pub const fn set_filter(&mut self, filter: RecordFilter) {
        self.filter = filter;
        self.page = 1;
    }

    /// Move back one page, stopping at 1.
    pub const fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Move forward one page, stopping at the last page for `total` rows.
    pub fn next_page(&mut self, total: u64) {
        self.go_to(self.page.saturating_add(1), total);
    }

    /// Jump to `page`, clamped to `[1, total_pages]`.
    pub fn go_to(&mut self, page: u32, total: u64) {
        let last = total_pages(total, RECORDS_PAGE_SIZE).max(1);
        self.page = page.clamp(1, last);
    }
}

/// Rendered records page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordsView {
    /// Rows on this page.
    pub records: Vec<OrganizeRecordItem>,
    /// Backend-reported total across pages.
    pub total: u64,
    /// Page being shown.
    pub page: u32,
    /// Page count derived from `total`.
    pub total_pages: u32,
}

impl RecordsView {
    /// Whether previous/next controls are shown.
    #[must_use]
    pub const fn shows_pagination(&self) -> bool {
        self.total_pages > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_change_resets_page() {
        let mut state = RecordsState::default();
        state.go_to(3, 100);
        assert_eq!(state.page(), 3);

        state.set_filter(RecordFilter::Failed);
        assert_eq!(state.page(), 1);
        assert_eq!(
            state.query(),
            PageQuery::new(1, RECORDS_PAGE_SIZE).with_status(Some(1))
        );
    }

    #[test]
    fn paging_is_clamped() {
        let mut state = RecordsState::default();
        state.prev_page();
        assert_eq!(state.page(), 1);

        state.next_page(45);
        state.next_page(45);
        state.next_page(45);
        assert_eq!(state.page(), 3);

        state.go_to(99, 45);
        assert_eq!(state.page(), 3);
        state.go_to(0, 45);
        assert_eq!(state.page(), 1);

        state.next_page(0);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn filter_codes_and_labels() {
        assert_eq!(RecordFilter::All.status_code(), None);
        assert_eq!(RecordFilter::Success.status_code(), Some(0));
        assert_eq!(RecordFilter::from_value("成功"), Some(RecordFilter::Success));
        assert_eq!(RecordFilter::Failed.label(), "失败");
    }
}
