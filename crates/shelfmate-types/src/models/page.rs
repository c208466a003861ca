//! Paginated list envelope.

use serde::{Deserialize, Serialize};

/// Page of results returned by list endpoints. Pages are 1-based.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    /// Total number of items across all pages
    #[serde(default)]
    pub total: u64,
}

const fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    pub fn has_more(&self) -> bool {
        u64::from(self.page).saturating_mul(u64::from(self.per_page)) < self.total
    }

    /// Map the items, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { items: Vec::new(), page: first_page(), per_page: 0, total: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::round_trip;

    #[test]
    fn test_has_more() {
        let page = Page { items: vec![1, 2], page: 1, per_page: 2, total: 5 };
        assert!(page.has_more());

        let last = Page { items: vec![5], page: 3, per_page: 2, total: 5 };
        assert!(!last.has_more());

        assert!(!Page::<u8>::default().has_more());
    }

    #[test]
    fn test_round_trip() {
        let full =
            Page { items: vec!["a".to_string(), "b".to_string()], page: 2, per_page: 2, total: 9 };
        assert_eq!(round_trip(&full), full);
        assert_eq!(round_trip(&Page::<String>::default()), Page::default());
    }
}
