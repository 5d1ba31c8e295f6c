/// Page selection for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u64,
    pub page: u64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u64 = 5;

    /// Largest limit or offset a SQL backend can bind (`BIGINT`).
    pub const MAX_ROWS: u64 = i64::MAX as u64;

    /// Build a page from optional query values. Both are clamped to at least 1
    /// and the limit to at most [`Self::MAX_ROWS`].
    pub fn new(limit: Option<u64>, page: Option<u64>) -> Self {
        Self {
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_ROWS),
            page: page.unwrap_or(1).max(1),
        }
    }

    /// Number of rows to skip, capped at [`Self::MAX_ROWS`].
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(Self::MAX_ROWS)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageRequest::default();
        assert_eq!(page.limit, 5);
        assert_eq!(page.page, 1);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_offset_and_clamping() {
        assert_eq!(PageRequest::new(Some(10), Some(3)).offset(), 20);

        let clamped = PageRequest::new(Some(0), Some(0));
        assert_eq!(clamped.limit, 1);
        assert_eq!(clamped.page, 1);
    }

    #[test]
    fn test_huge_pages_stay_bindable() {
        let page = PageRequest::new(Some(u64::MAX), Some(3));
        assert_eq!(page.limit, i64::MAX as u64);
        assert_eq!(page.offset(), i64::MAX as u64);

        let far = PageRequest::new(Some(i64::MAX as u64), Some(i64::MAX as u64));
        assert!(i64::try_from(far.offset()).is_ok());
    }
}
