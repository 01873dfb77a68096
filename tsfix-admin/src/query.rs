//! Keyword/filter/sort/pagination helpers shared by the services.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Slice one page out of `items`. Pages are 1-based; page 0 reads as 1 and a zero size as the
/// default size.
pub fn paginate<T>(items: Vec<T>, req: PageRequest) -> Page<T> {
    let page = req.page.max(1);
    let page_size = if req.page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        req.page_size
    };
    let total = items.len();
    let start = (page - 1).saturating_mul(page_size);
    let items = items.into_iter().skip(start).take(page_size).collect();
    Page {
        items,
        total,
        page,
        page_size,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

/// Lowercased, trimmed keyword; `None` when blank.
pub fn keyword(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_lowercase)
}

pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pages_are_one_based() {
        let p = paginate((1..=25).collect::<Vec<_>>(), PageRequest::new(3, 10));
        assert_eq!(p.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(p.total, 25);

        let p = paginate((1..=5).collect::<Vec<_>>(), PageRequest::new(0, 0));
        assert_eq!((p.page, p.page_size, p.items.len()), (1, 10, 5));

        let p = paginate((1..=5).collect::<Vec<_>>(), PageRequest::new(9, 10));
        assert!(p.items.is_empty());
        assert_eq!(p.total, 5);
    }

    #[test]
    fn blank_keyword_is_no_filter() {
        assert_eq!(keyword(Some("  ")), None);
        assert_eq!(keyword(Some(" Admin ")), Some("admin".to_string()));
        assert!(contains_ci("Editor001@Example.com", "example"));
    }
}
