//! Offset/limit windows.

/// An `{offset, limit}` window, clamped to non-negative values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Rows to skip.
    pub offset: u64,
    /// Rows to return.
    pub limit: u64,
}

fn clamp(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

impl Pagination {
    /// Creates a window; negative inputs become zero.
    #[must_use]
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset: clamp(offset),
            limit: clamp(limit),
        }
    }

    /// Creates the window of the 1-based `page` of `size` rows.
    ///
    /// Pages below 1 are treated as page 1.
    #[must_use]
    pub fn page(page: i64, size: i64) -> Self {
        let size = clamp(size);
        let page = clamp(page).max(1);
        Self {
            offset: (page - 1).saturating_mul(size),
            limit: size,
        }
    }

    /// Replaces the offset; negative inputs become zero.
    #[must_use]
    pub fn with_offset(self, offset: i64) -> Self {
        Self {
            offset: clamp(offset),
            ..self
        }
    }
}
