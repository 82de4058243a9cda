/// Pagination for list endpoints
///
/// Page numbers are 1-based. Query strings are parsed leniently: a missing,
/// unparsable or non-positive `page` falls back to 1, and the same for
/// `per_page` falls back to the configured default. `per_page` is capped at
/// the configured maximum.

use serde::Serialize;

/// Resolved pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (1-based)
    pub page: i64,

    /// Items per page (always >= 1)
    pub per_page: i64,
}

impl PageRequest {
    /// Creates a page request, clamping both values to at least 1
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Resolves raw query-string values into a page request
    ///
    /// # Example
    ///
    /// ```
    /// use taskboard_shared::pagination::PageRequest;
    ///
    /// let request = PageRequest::from_query(Some("2"), Some("abc"), 10, 100);
    /// assert_eq!(request, PageRequest::new(2, 10));
    ///
    /// let request = PageRequest::from_query(Some("0"), Some("500"), 10, 100);
    /// assert_eq!(request, PageRequest::new(1, 100));
    /// ```
    pub fn from_query(
        page: Option<&str>,
        per_page: Option<&str>,
        default_per_page: i64,
        max_per_page: i64,
    ) -> Self {
        let page = parse_positive(page).unwrap_or(1);
        let per_page = parse_positive(per_page)
            .unwrap_or(default_per_page)
            .min(max_per_page.max(1));

        Self::new(page, per_page)
    }

    /// Row offset for SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Row limit for SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value >= 1)
}

/// One page of results plus the totals clients need to render pagers
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// Total number of matching items across all pages
    pub total: i64,

    /// The request that produced this page
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Number of pages (0 when there are no items)
    pub fn pages(&self) -> i64 {
        page_count(self.total, self.request.per_page)
    }

    /// Converts the items while keeping the totals
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    /// Summary of the totals for a response body
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            total: self.total,
            pages: self.pages(),
            current_page: self.request.page,
        }
    }
}

/// Totals serialized alongside list payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
}

/// Ceiling division of `total` by `per_page`
pub fn page_count(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let request = PageRequest::from_query(None, None, 10, 100);
        assert_eq!(request, PageRequest::new(1, 10));
        assert_eq!(request.offset(), 0);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let request = PageRequest::from_query(Some("-3"), Some("zero"), 10, 100);
        assert_eq!(request, PageRequest::new(1, 10));

        let request = PageRequest::from_query(Some("x"), Some("0"), 25, 100);
        assert_eq!(request, PageRequest::new(1, 25));
    }

    #[test]
    fn test_per_page_is_capped() {
        let request = PageRequest::from_query(Some("1"), Some("1000"), 10, 50);
        assert_eq!(request.per_page, 50);
    }

    #[test]
    fn test_offset() {
        let request = PageRequest::new(3, 10);
        assert_eq!(request.offset(), 20);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(25, 5), 5);
    }

    #[test]
    fn test_page_meta_and_map() {
        let page = Page::new(vec![1, 2, 3], 13, PageRequest::new(2, 3));
        let mapped = page.map(|n| n * 10);

        assert_eq!(mapped.items, vec![10, 20, 30]);
        assert_eq!(
            mapped.meta(),
            PageMeta {
                total: 13,
                pages: 5,
                current_page: 2,
            }
        );
    }
}
