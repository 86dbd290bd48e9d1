//! Pagination primitives for list endpoints.

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

/// Raw `page`/`limit` query parameters as they arrive on the wire.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Normalized page window. Zero values fall back to the defaults.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl From<PageQuery> for Page {
    fn from(q: PageQuery) -> Self {
        Self {
            page: q.page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE),
            limit: q.limit.filter(|l| *l >= 1).unwrap_or(DEFAULT_LIMIT),
        }
    }
}

/// Pagination envelope returned alongside a page of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: Page, total: u64) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total,
            total_pages: total.div_ceil(u64::from(page.limit)),
        }
    }
}
