/// Page requests and paginated result envelopes
///
/// Listings are paginated with a fixed page size per resource. The envelope
/// mirrors what the page components expect: the current slice plus enough
/// counters to draw page links.
///
/// # Example
///
/// ```
/// use paroki_shared::pagination::{PageRequest, Paginated};
///
/// let request = PageRequest::new(Some(2), 10);
/// assert_eq!(request.offset(), 10);
///
/// let page = Paginated::new(vec!["a", "b"], request, 12);
/// assert_eq!(page.last_page, 2);
/// assert_eq!(page.from, Some(11));
/// assert_eq!(page.to, Some(12));
/// ```

use serde::Serialize;

/// Requested page (1-based) and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,

    /// Rows per page, always at least 1
    pub per_page: u32,
}

impl PageRequest {
    /// Builds a request, treating a missing or zero page as the first page
    pub fn new(page: Option<u32>, per_page: u32) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1),
            per_page: per_page.max(1),
        }
    }

    /// SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub per_page: u32,
    pub total: i64,
    pub last_page: u32,

    /// 1-based index of the first row on this page (None when empty)
    pub from: Option<i64>,

    /// 1-based index of the last row on this page (None when empty)
    pub to: Option<i64>,
}

impl<T> Paginated<T> {
    /// Wraps a page slice fetched with `request`
    pub fn new(data: Vec<T>, request: PageRequest, total: i64) -> Self {
        let per_page = i64::from(request.per_page);
        let last_page = ((total.max(0) + per_page - 1) / per_page).max(1);

        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let first = request.offset() + 1;
            (Some(first), Some(first + data.len() as i64 - 1))
        };

        Self {
            data,
            current_page: request.page,
            per_page: request.per_page,
            total,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            from,
            to,
        }
    }

    /// Converts every row, keeping the counters
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
            from: self.from,
            to: self.to,
        }
    }

    /// Whether a later page exists
    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults_to_first_page() {
        assert_eq!(PageRequest::new(None, 9).page, 1);
        assert_eq!(PageRequest::new(Some(0), 9).page, 1);
        assert_eq!(PageRequest::new(Some(3), 0).per_page, 1);
    }

    #[test]
    fn test_limit_and_offset() {
        let request = PageRequest::new(Some(3), 9);
        assert_eq!(request.limit(), 9);
        assert_eq!(request.offset(), 18);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let page: Paginated<u8> = Paginated::new(Vec::new(), PageRequest::new(None, 10), 0);
        assert_eq!(page.last_page, 1);
        assert_eq!(page.from, None);
        assert_eq!(page.to, None);
        assert!(!page.has_more_pages());
    }

    #[test]
    fn test_last_page_rounds_up() {
        let page = Paginated::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9], PageRequest::new(Some(1), 9), 19);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.from, Some(1));
        assert_eq!(page.to, Some(9));
        assert!(page.has_more_pages());
    }

    #[test]
    fn test_map_keeps_counters() {
        let page = Paginated::new(vec![1, 2], PageRequest::new(Some(2), 2), 4).map(|n| n * 10);
        assert_eq!(page.data, vec![10, 20]);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.from, Some(3));
        assert_eq!(page.total, 4);
    }
}
