//! Pagination types shared by the list endpoints.

use super::{AdminStoreRow, ContactMessageResponse, PaymentRecordResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            page_size: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

impl PaginationParams {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self { page, page_size }
    }

    /// 1-based; anything below 1 reads as 1.
    pub fn get_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn get_limit(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Saturates instead of overflowing on absurd page numbers.
    pub fn get_offset(&self) -> i64 {
        (self.get_page() - 1).saturating_mul(self.get_limit())
    }

    /// Slices an already filtered, already ordered list.
    pub fn paginate<T>(&self, items: Vec<T>) -> PaginatedResponse<T> {
        let total = items.len() as i64;
        let data = items
            .into_iter()
            .skip(usize::try_from(self.get_offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(self.get_limit()).unwrap_or(usize::MAX))
            .collect();
        PaginatedResponse::new(data, self.get_page(), self.get_limit(), total)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[aliases(
    PaginatedStores = PaginatedResponse<AdminStoreRow>,
    PaginatedPayments = PaginatedResponse<PaymentRecordResponse>,
    PaginatedMessages = PaginatedResponse<ContactMessageResponse>
)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, page_size: i64, total: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            data,
            page,
            page_size,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit_are_clamped() {
        let p = PaginationParams::new(Some(0), Some(500));
        assert_eq!(p.get_page(), 1);
        assert_eq!(p.get_limit(), MAX_PAGE_SIZE);
        assert_eq!(p.get_offset(), 0);

        let p = PaginationParams::new(Some(3), Some(10));
        assert_eq!(p.get_offset(), 20);
    }

    #[test]
    fn test_paginate_slices_and_counts() {
        let page = PaginationParams::new(Some(2), Some(2)).paginate((1..=5).collect::<Vec<_>>());
        assert_eq!(page.data, vec![3, 4]);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);

        let past_end = PaginationParams::new(Some(9), Some(2)).paginate(vec![1, 2]);
        assert!(past_end.data.is_empty());
        assert_eq!(past_end.total_pages, 1);
    }

    #[test]
    fn test_huge_page_number_yields_empty_page() {
        let p = PaginationParams::new(Some(i64::MAX), Some(100));
        assert_eq!(p.get_offset(), i64::MAX);

        let page = p.paginate(vec![1, 2, 3]);
        assert!(page.data.is_empty());
        assert_eq!(page.page, i64::MAX);
        assert_eq!(page.total, 3);
    }
}
