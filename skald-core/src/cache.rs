// Rendered-output caching backed by moka

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use moka::sync::Cache;

use crate::markdown::Markdown;

/// Caches rendered HTML keyed by a hash of the markdown content, with
/// LRU eviction at the configured capacity. Thread-safe; rendered output
/// is shared as `Arc<String>` so hits never clone the document.
pub struct ParserCache {
    markdown: Markdown,
    html: Cache<u64, Arc<String>>,
}

impl ParserCache {
    pub fn new(capacity: u64) -> Self {
        Self::with_markdown(Markdown::new(), capacity)
    }

    /// Cache conversions of a pre-configured `Markdown`, extensions
    /// included.
    pub fn with_markdown(markdown: Markdown, capacity: u64) -> Self {
        ParserCache {
            markdown,
            html: Cache::new(capacity),
        }
    }

    pub fn convert_cached(&self, text: &str) -> Arc<String> {
        let key = content_hash(text);
        self.html.get_with(key, || {
            log::debug!("cache miss for {} bytes", text.len());
            Arc::new(self.markdown.convert(text))
        })
    }

    pub fn entry_count(&self) -> u64 {
        self.html.entry_count()
    }

    pub fn invalidate_all(&self) {
        self.html.invalidate_all();
    }
}

fn content_hash(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_hit_returns_same_output() {
        let cache = ParserCache::new(16);
        let first = cache.convert_cached("# Hi\n");
        let second = cache.convert_cached("# Hi\n");
        assert_eq!(*first, "<h1>Hi</h1>\n");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn smoke_test_different_inputs_are_distinct() {
        let cache = ParserCache::new(16);
        let a = cache.convert_cached("a\n");
        let b = cache.convert_cached("b\n");
        assert_ne!(*a, *b);
    }
}
