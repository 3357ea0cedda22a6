use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, AppResult};

/// 1-indexed page request. Zero values are rejected, never clamped; any
/// positive page size is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u64,
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, message = "per_page must be at least 1"))]
    pub per_page: u64,
}

fn default_page() -> u64 { 1 }
fn default_per_page() -> u64 { 10 }

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> AppResult<Self> {
        Self { page, per_page }.checked()
    }

    pub fn checked(self) -> AppResult<Self> {
        self.validate()
            .map_err(|e| AppError::invalid_argument(e.to_string()))?;
        Ok(self)
    }

    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: default_page(), per_page: default_per_page() }
    }
}

/// Page envelope in the length-aware paginator shape the mobile clients parse.
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T: Serialize> {
    pub current_page: u64,
    pub data: Vec<T>,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, params: &PageRequest) -> Self {
        let per_page = params.limit();
        let last_page = total.div_ceil(per_page.max(1)).max(1);
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let from = params.offset().saturating_add(1);
            (Some(from), Some(from.saturating_add(data.len() as u64 - 1)))
        };
        Self {
            current_page: params.page,
            data,
            per_page,
            total,
            last_page,
            from,
            to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn zero_page_is_rejected() {
        let err = PageRequest::new(0, 10).unwrap_err();
        assert!(err.is(ErrorCode::ValidationError));
    }

    #[test]
    fn zero_per_page_is_rejected() {
        let err = PageRequest::new(1, 0).unwrap_err();
        assert!(err.is(ErrorCode::ValidationError));
    }

    #[test]
    fn large_per_page_is_accepted() {
        assert_eq!(PageRequest::new(1, 150).unwrap().limit(), 150);
        assert_eq!(PageRequest::new(2, u64::MAX).unwrap().offset(), u64::MAX);
    }

    #[test]
    fn offset_is_one_indexed() {
        assert_eq!(PageRequest::new(1, 10).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 10).unwrap().offset(), 20);
    }

    #[test]
    fn envelope_counts_from_and_to() {
        let params = PageRequest::new(2, 2).unwrap();
        let page = Paginated::new(vec![3, 4], 5, &params);
        assert_eq!(page.from, Some(3));
        assert_eq!(page.to, Some(4));
        assert_eq!(page.last_page, 3);
    }

    #[test]
    fn empty_page_has_no_bounds() {
        let params = PageRequest::new(9, 10).unwrap();
        let page: Paginated<u64> = Paginated::new(vec![], 4, &params);
        assert_eq!(page.from, None);
        assert_eq!(page.last_page, 1);
        assert_eq!(page.current_page, 9);
    }

    #[test]
    fn defaults_apply_when_query_is_empty() {
        let params: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(params, PageRequest { page: 1, per_page: 10 });
    }
}
