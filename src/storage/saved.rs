use super::types::Article;
use std::collections::HashSet;

/// The user's bookmarked articles, most-recently-saved first.
///
/// URLs are unique. Lookups go through a URL index so `is_saved` stays O(1)
/// while rendering every visible card.
#[derive(Debug, Clone, Default)]
pub struct SavedSet {
    articles: Vec<Article>,
    urls: HashSet<String>,
}

impl SavedSet {
    /// Build from a persisted list, dropping later duplicates of a URL.
    pub fn from_articles(articles: Vec<Article>) -> Self {
        let mut set = Self::default();
        for article in articles {
            if set.urls.insert(article.url.clone()) {
                set.articles.push(article);
            } else {
                tracing::debug!(url = %article.url, "Dropping duplicate saved article");
            }
        }
        set
    }

    /// Save the article if absent, remove it if present.
    ///
    /// Returns `true` when the article is saved after the call.
    pub fn toggle(&mut self, article: &Article) -> bool {
        if self.urls.remove(&article.url) {
            self.articles.retain(|a| a.url != article.url);
            false
        } else {
            self.urls.insert(article.url.clone());
            self.articles.insert(0, article.clone());
            true
        }
    }

    pub fn is_saved(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn as_slice(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Source;

    fn article(url: &str) -> Article {
        Article {
            source: Source {
                id: None,
                name: "Example".to_string(),
            },
            author: None,
            title: format!("Title for {}", url),
            description: None,
            url: url.to_string(),
            url_to_image: None,
            published_at: None,
            content: None,
        }
    }

    #[test]
    fn test_toggle_saves_then_unsaves() {
        let mut saved = SavedSet::default();
        let x = article("https://example.com/x");

        assert!(saved.toggle(&x));
        assert_eq!(saved.as_slice(), &[x.clone()]);

        assert!(!saved.toggle(&x));
        assert!(saved.is_empty());
        assert!(!saved.is_saved(&x.url));
    }

    #[test]
    fn test_newest_save_goes_first() {
        let mut saved = SavedSet::default();
        saved.toggle(&article("https://example.com/a"));
        saved.toggle(&article("https://example.com/b"));

        let urls: Vec<&str> = saved.as_slice().iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/b", "https://example.com/a"]);
    }

    #[test]
    fn test_unsave_restores_prior_state() {
        let mut saved = SavedSet::from_articles(vec![
            article("https://example.com/a"),
            article("https://example.com/b"),
        ]);
        let before = saved.as_slice().to_vec();

        let c = article("https://example.com/c");
        saved.toggle(&c);
        saved.toggle(&c);

        assert_eq!(saved.as_slice(), before.as_slice());
    }

    #[test]
    fn test_save_is_keyed_by_url_not_content() {
        let mut saved = SavedSet::default();
        let original = article("https://example.com/a");
        let mut edited = original.clone();
        edited.title = "Updated headline".to_string();

        saved.toggle(&original);
        // Same URL, different payload: treated as the same article
        assert!(!saved.toggle(&edited));
        assert!(saved.is_empty());
    }

    #[test]
    fn test_from_articles_drops_duplicates() {
        let saved = SavedSet::from_articles(vec![
            article("https://example.com/a"),
            article("https://example.com/a"),
            article("https://example.com/b"),
        ]);
        assert_eq!(saved.len(), 2);
        assert_eq!(saved.as_slice()[0].url, "https://example.com/a");
    }
}
