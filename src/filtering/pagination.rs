use serde::Serialize;

/// Offset/limit window for one page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
}

impl PagePlan {
    /// Plan the window for a 1-based `page`. No upper bound is applied to
    /// `page`; a page past the end simply yields no rows.
    #[must_use]
    pub const fn new(page: u64, limit: u64) -> Self {
        Self {
            page,
            limit,
            offset: page.saturating_sub(1).saturating_mul(limit),
        }
    }

    /// Combine the plan with the total number of matching records
    #[must_use]
    pub const fn page_info(&self, total: u64) -> PageInfo {
        PageInfo {
            page: self.page,
            limit: self.limit,
            total,
            page_count: page_count(total, self.limit),
        }
    }
}

/// Computed paging summary returned with every result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub page_count: u64,
}

/// `ceil(total / limit)`, or 0 when nothing matched
#[must_use]
pub const fn page_count(total: u64, limit: u64) -> u64 {
    if total == 0 || limit == 0 {
        0
    } else {
        total.div_ceil(limit)
    }
}
