/// Pagination for list endpoints
///
/// Clients control the page with `page` (1-based) and `page_size` query
/// parameters; `page_size` is capped at [`MAX_PAGE_SIZE`]. List responses
/// use a count/next/previous/results envelope, with `next` and `previous`
/// as page numbers (null when absent).
///
/// Examples:
///     GET /api/tasks?page=2
///     GET /api/tasks?page=1&page_size=5

use serde::Serialize;

/// Page size applied when the client does not supply one
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound on client-supplied page sizes
pub const MAX_PAGE_SIZE: i64 = 100;

/// Normalized pagination parameters
///
/// Construction clamps out-of-range values instead of rejecting them: page
/// numbers below 1 become 1, page sizes are clamped into `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    page: i64,
    page_size: i64,
}

impl PageParams {
    /// Normalizes raw query parameters
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        let page = i64::from(page.unwrap_or(1)).max(1);
        let page_size = i64::from(page_size.unwrap_or(DEFAULT_PAGE_SIZE as u32))
            .clamp(1, MAX_PAGE_SIZE);

        Self { page, page_size }
    }

    /// Current page number (1-based)
    pub fn page(&self) -> i64 {
        self.page
    }

    /// Number of rows per page
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Number of rows to skip
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Paginated list envelope
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// Total number of rows matching the query (across all pages)
    pub count: i64,

    /// Next page number, null on the last page
    pub next: Option<i64>,

    /// Previous page number, null on the first page
    pub previous: Option<i64>,

    /// Rows for this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Builds the envelope for one page of results
    pub fn new(results: Vec<T>, count: i64, params: PageParams) -> Self {
        let next = if params.page() * params.limit() < count {
            Some(params.page() + 1)
        } else {
            None
        };
        let previous = if params.page() > 1 {
            Some(params.page() - 1)
        } else {
            None
        };

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_page_size_is_capped() {
        let params = PageParams::new(None, Some(10_000));
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let params = PageParams::new(Some(0), Some(0));
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn test_offset_calculation() {
        let params = PageParams::new(Some(3), Some(5));
        assert_eq!(params.offset(), 10);
    }

    #[test]
    fn test_envelope_next_and_previous() {
        // 12 rows, page size 5: pages 1..=3
        let page1 = Page::new(vec![(); 5], 12, PageParams::new(Some(1), Some(5)));
        assert_eq!(page1.next, Some(2));
        assert_eq!(page1.previous, None);

        let page2 = Page::new(vec![(); 5], 12, PageParams::new(Some(2), Some(5)));
        assert_eq!(page2.next, Some(3));
        assert_eq!(page2.previous, Some(1));

        let page3 = Page::new(vec![(); 2], 12, PageParams::new(Some(3), Some(5)));
        assert_eq!(page3.next, None);
        assert_eq!(page3.previous, Some(2));
    }

    #[test]
    fn test_envelope_single_page() {
        let page = Page::new(vec![(); 3], 3, PageParams::default());
        assert_eq!(page.count, 3);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
    }
}
