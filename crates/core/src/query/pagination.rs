//! Page bounds and the paginated response envelope.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// First page when the client does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size when the client does not ask for one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Maximum page size. Larger requests are rejected, not clamped, so
/// clients learn about the bound instead of silently getting less data.
pub const MAX_LIMIT: u32 = 100;

/// Validated page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
}

impl PageQuery {
    /// Validate raw client-supplied values.
    ///
    /// `page` must be >= 1 and `limit` in `1..=MAX_LIMIT`; absent values
    /// take the defaults. Out-of-range values fail with a validation
    /// error naming the parameter.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, CoreError> {
        let page = match page {
            None => DEFAULT_PAGE,
            Some(p) if p >= 1 && p <= u32::MAX as i64 => p as u32,
            Some(p) => {
                return Err(CoreError::Validation(format!(
                    "page must be >= 1, got {p}"
                )))
            }
        };
        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(l) if l >= 1 && l <= MAX_LIMIT as i64 => l as u32,
            Some(l) => {
                return Err(CoreError::Validation(format!(
                    "limit must be between 1 and {MAX_LIMIT}, got {l}"
                )))
            }
        };
        Ok(Self { page, limit })
    }

    /// Row offset for `LIMIT`/`OFFSET` queries.
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// The paginated response envelope.
///
/// The exact field set (`data`, `total`, `page`, `limit`, `totalPages`,
/// `hasNext`, `hasPrev`) is a wire contract: frontend code depends on all
/// seven fields, so none may be renamed or dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Assemble the envelope from a page of rows and the total row count.
    pub fn new(data: Vec<T>, total: i64, query: &PageQuery) -> Self {
        let total_pages = (total.max(0) as u64).div_ceil(query.limit as u64) as u32;
        Self {
            data,
            total: total.max(0),
            page: query.page,
            limit: query.limit,
            total_pages,
            has_next: query.page < total_pages,
            has_prev: query.page > 1,
        }
    }

    /// Convert the item type while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        let q = PageQuery::new(None, None).unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 10);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn rejects_out_of_range_page() {
        assert!(PageQuery::new(Some(0), None).is_err());
        assert!(PageQuery::new(Some(-3), None).is_err());
    }

    #[test]
    fn rejects_out_of_range_limit() {
        assert!(PageQuery::new(None, Some(0)).is_err());
        assert!(PageQuery::new(None, Some(101)).is_err());
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let q = PageQuery::new(Some(3), Some(25)).unwrap();
        assert_eq!(q.offset(), 50);
    }

    #[test]
    fn envelope_for_last_partial_page() {
        // total=25, limit=10, page=3 -> 3 pages, no next, has prev.
        let q = PageQuery::new(Some(3), Some(10)).unwrap();
        let page = Page::new(vec![1, 2, 3, 4, 5], 25, &q);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn envelope_for_first_page() {
        let q = PageQuery::new(Some(1), Some(10)).unwrap();
        let page = Page::new(vec![0; 10], 25, &q);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn envelope_for_empty_result() {
        let q = PageQuery::default();
        let page = Page::new(Vec::<i32>::new(), 0, &q);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn envelope_serializes_camel_case() {
        let q = PageQuery::default();
        let page = Page::new(vec![1], 1, &q);
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("totalPages").is_some());
        assert!(json.get("hasNext").is_some());
        assert!(json.get("hasPrev").is_some());
        assert!(json.get("data").is_some());
    }
}
