use crate::storage::Article;

/// Articles requested per page.
pub const PAGE_SIZE: u32 = 12;

/// One upstream response unit: normalized articles plus a continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub articles: Vec<Article>,
    /// Page number to request next, or `None` when the results are exhausted.
    pub next_page: Option<u32>,
}

impl Page {
    pub fn new(articles: Vec<Article>, page: u32, total_results: u64) -> Self {
        Self {
            articles,
            next_page: next_page_token(page, total_results),
        }
    }
}

/// `page + 1` while `page * PAGE_SIZE` is below the upstream total.
///
/// Uses the upstream total, not the post-filter article count.
pub fn next_page_token(page: u32, total_results: u64) -> Option<u32> {
    let consumed = u64::from(page) * u64::from(PAGE_SIZE);
    if consumed < total_results {
        page.checked_add(1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_next_page_boundaries() {
        assert_eq!(next_page_token(1, 30), Some(2));
        assert_eq!(next_page_token(2, 30), Some(3));
        assert_eq!(next_page_token(3, 30), None);
        assert_eq!(next_page_token(1, 12), None);
        assert_eq!(next_page_token(1, 13), Some(2));
        assert_eq!(next_page_token(1, 0), None);
    }

    proptest! {
        #[test]
        fn next_page_is_none_iff_exhausted(page in 1u32..10_000, total in 0u64..200_000) {
            let token = next_page_token(page, total);
            let exhausted = u64::from(page) * u64::from(PAGE_SIZE) >= total;
            prop_assert_eq!(token.is_none(), exhausted);
            if let Some(next) = token {
                prop_assert_eq!(next, page + 1);
            }
        }
    }
}
