//! Page arithmetic for the PokéAPI listing endpoint
//!
//! Translates a 1-based page number into `offset`/`limit` query parameters and
//! derives the number of pages from the `count` reported by each listing.

use std::ops::RangeInclusive;

/// Default number of entries per listing page
pub const DEFAULT_PAGE_SIZE: u32 = 150;

/// Query parameters for one listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingParams {
    pub offset: u64,
    pub limit: u32,
}

/// Offset of the first entry of `page`, or `None` for pages below 1
pub fn compute_offset(page: u32, page_size: u32) -> Option<u64> {
    if page < 1 {
        return None;
    }
    Some(u64::from(page - 1) * u64::from(page_size))
}

/// Number of pages needed to show `total_count` entries
pub fn compute_total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Tracks the page size and the last known page count
#[derive(Debug, Clone)]
pub struct PaginationController {
    page_size: u32,
    total_pages: Option<u32>,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationController {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            total_pages: None,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Switches to a new page size, forgetting the page count derived from the old one
    pub fn set_page_size(&mut self, page_size: u32) {
        if page_size != self.page_size {
            self.page_size = page_size;
            self.total_pages = None;
        }
    }

    /// Listing parameters for `page`, or `None` if the page is below 1
    pub fn params(&self, page: u32) -> Option<ListingParams> {
        compute_offset(page, self.page_size).map(|offset| ListingParams {
            offset,
            limit: self.page_size,
        })
    }

    /// Recomputes the page count from a listing's `count`
    ///
    /// Called on every listing response since the collection may grow between fetches.
    pub fn record_total(&mut self, total_count: u64) -> u32 {
        let total = compute_total_pages(total_count, self.page_size);
        self.total_pages = Some(total);
        total
    }

    /// Last known page count, if any listing has been seen
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Selectable pages, empty until a listing has been seen
    pub fn pages(&self) -> RangeInclusive<u32> {
        match self.total_pages {
            Some(total) if total > 0 => 1..=total,
            _ => RangeInclusive::new(1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_for_page_three() {
        assert_eq!(compute_offset(3, 150), Some(300));
    }

    #[test]
    fn test_offset_for_first_page_is_zero() {
        assert_eq!(compute_offset(1, 150), Some(0));
    }

    #[test]
    fn test_offset_rejects_page_zero() {
        assert_eq!(compute_offset(0, 150), None);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(compute_total_pages(1302, 150), 9);
        assert_eq!(compute_total_pages(1350, 150), 9);
        assert_eq!(compute_total_pages(1351, 150), 10);
        assert_eq!(compute_total_pages(0, 150), 0);
    }

    #[test]
    fn test_total_pages_with_zero_page_size() {
        assert_eq!(compute_total_pages(1302, 0), 0);
    }

    #[test]
    fn test_params_use_page_size_as_limit() {
        let controller = PaginationController::new(20);
        assert_eq!(
            controller.params(2),
            Some(ListingParams {
                offset: 20,
                limit: 20
            })
        );
        assert_eq!(controller.params(0), None);
    }

    #[test]
    fn test_record_total_is_recomputed_each_time() {
        let mut controller = PaginationController::default();
        assert_eq!(controller.total_pages(), None);

        assert_eq!(controller.record_total(1302), 9);
        assert_eq!(controller.total_pages(), Some(9));

        // The collection grew between two fetches
        assert_eq!(controller.record_total(1351), 10);
        assert_eq!(controller.total_pages(), Some(10));
    }

    #[test]
    fn test_changing_page_size_forgets_total() {
        let mut controller = PaginationController::default();
        controller.record_total(1302);

        controller.set_page_size(50);

        assert_eq!(controller.page_size(), 50);
        assert_eq!(controller.total_pages(), None);
    }

    #[test]
    fn test_pages_range() {
        let mut controller = PaginationController::default();
        assert!(controller.pages().is_empty());

        controller.record_total(1302);
        let pages: Vec<u32> = controller.pages().collect();
        assert_eq!(pages, (1..=9).collect::<Vec<_>>());
    }
}
