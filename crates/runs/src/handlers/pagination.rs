//! Pagination helpers and types.

use serde::Serialize;

/// Default pagination limit.
pub const DEFAULT_LIMIT: i64 = 50;

/// Returns the default pagination limit, for serde defaults.
pub fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Paginated response wrapper.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Slice one page out of an already-filtered, already-ordered result set.
pub fn paginate<T>(items: Vec<T>, limit: i64, offset: i64) -> PaginatedResponse<T> {
    let total_count = items.len() as i64;
    let limit = limit.max(0);
    let offset = offset.max(0);
    let items = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    PaginatedResponse {
        items,
        total_count,
        limit,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page() {
        let page = paginate((0..5).collect(), 2, 0);
        assert_eq!(page.items, vec![0, 1]);
        assert_eq!(page.total_count, 5);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let page = paginate((0..3).collect::<Vec<i32>>(), 10, 5);
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 3);
    }

    #[test]
    fn negative_inputs_are_clamped() {
        let page = paginate((0..3).collect::<Vec<i32>>(), -1, -1);
        assert!(page.items.is_empty());
        assert_eq!(page.offset, 0);
    }
}
