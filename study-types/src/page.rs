//! Pagination parameters for list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination parameters for list reads.
///
/// Pages are 1-based; the server clamps out-of-range pages to an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
}

impl PageRequest {
    /// Create a request for the given page.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Create a request for the first page.
    pub fn first(page_size: u32) -> Self {
        Self { page: 1, page_size }
    }

    /// Whether this targets the first page.
    ///
    /// Only first-page, non-refresh reads may be served from the local
    /// store; later pages always go to the network.
    pub fn is_first(&self) -> bool {
        self.page <= 1
    }

    /// Render the query parameters the API expects.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ]
    }
}
