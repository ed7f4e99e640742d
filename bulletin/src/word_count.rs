//! Word-frequency aggregation over every stored post.
//!
//! A run reads all post contents, tallies case-insensitive word occurrences
//! and publishes the tally to the cache under [`WORD_COUNTS_KEY`] for
//! [`WORD_COUNTS_TTL`]. Readers see either the latest tally or nothing.

use crate::ports::{CacheStore, PostRepository};
use serde::{Deserialize, Serialize};
use shared::{Error, Result, TtlMs};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub const WORD_COUNTS_KEY: &str = "word_counts";
pub const WORD_COUNTS_TTL: Duration = Duration::from_secs(20);

/// Normalized word -> number of occurrences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordCounts(BTreeMap<String, u64>);

impl WordCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of an already-normalized word
    pub fn record(&mut self, word: String) {
        *self.0.entry(word).or_insert(0) += 1;
    }

    pub fn get(&self, word: &str) -> u64 {
        self.0.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, u64> {
        self.0
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split text into maximal runs of ASCII alphanumerics and underscores
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
}

/// Tally lowercased tokens across all given texts combined
pub fn count_words<I, S>(contents: I) -> WordCounts
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts = WordCounts::new();
    for content in contents {
        for token in tokenize(content.as_ref()) {
            counts.record(token.to_ascii_lowercase());
        }
    }
    counts
}

/// Computes the word-frequency table and publishes it to the cache
#[derive(Clone)]
pub struct WordCountAggregator {
    posts: Arc<dyn PostRepository>,
    cache: Arc<dyn CacheStore<String, String>>,
}

impl WordCountAggregator {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        cache: Arc<dyn CacheStore<String, String>>,
    ) -> Self {
        Self { posts, cache }
    }

    /// Recompute counts over every post and overwrite the cached entry.
    /// Either the whole tally is written or the run fails with nothing written.
    pub async fn run(&self) -> Result<WordCounts> {
        let contents = self.posts.list_contents().await?;
        debug!("Counting words across {} post(s)", contents.len());

        let counts = count_words(&contents);
        let payload = serde_json::to_string(&counts)?;

        self.cache
            .put(
                WORD_COUNTS_KEY.to_string(),
                payload,
                Some(TtlMs::from(WORD_COUNTS_TTL)),
            )
            .await?;

        info!(
            "Word counts published: {} distinct word(s) from {} post(s)",
            counts.len(),
            contents.len()
        );
        Ok(counts)
    }

    /// Latest published counts, `None` if absent or expired
    pub async fn read(&self) -> Result<Option<WordCounts>> {
        match self.cache.get(&WORD_COUNTS_KEY.to_string()).await {
            Ok(response) => Ok(Some(serde_json::from_str(&response.message)?)),
            Err(Error::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for WordCountAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordCountAggregator")
            .field("key", &WORD_COUNTS_KEY)
            .field("ttl", &WORD_COUNTS_TTL)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::Post;
    use crate::domain::response::{DeleteResponse, GetResponse, PutResponse};
    use async_trait::async_trait;
    use fake::Fake;
    use fake::faker::lorem::en::Words;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::time::{Instant, advance};

    /// In-memory post store; `fail` makes every read error
    #[derive(Default)]
    pub(crate) struct FakePosts {
        pub posts: Mutex<Vec<Post>>,
        pub fail: bool,
    }

    impl FakePosts {
        pub fn with_contents(contents: &[&str]) -> Self {
            let posts = contents
                .iter()
                .map(|c| Post::new(c.to_string(), "author".to_string()))
                .collect();
            Self {
                posts: Mutex::new(posts),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl PostRepository for FakePosts {
        async fn create(&self, post: Post) -> Result<Post> {
            self.posts.lock().unwrap().push(post.clone());
            Ok(post)
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Post>> {
            Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned())
        }

        async fn list_all(&self) -> Result<Vec<Post>> {
            Ok(self.posts.lock().unwrap().clone())
        }

        async fn update(&self, post: Post) -> Result<Post> {
            let mut posts = self.posts.lock().unwrap();
            let slot = posts
                .iter_mut()
                .find(|p| p.id == post.id)
                .ok_or(Error::NotFound)?;
            *slot = post.clone();
            Ok(post)
        }

        async fn delete(&self, id: &str) -> Result<()> {
            self.posts.lock().unwrap().retain(|p| p.id != id);
            Ok(())
        }

        async fn list_contents(&self) -> Result<Vec<String>> {
            if self.fail {
                return Err(Error::Storage("posts unavailable".to_string()));
            }
            Ok(self
                .posts
                .lock()
                .unwrap()
                .iter()
                .map(|p| p.content.clone())
                .collect())
        }
    }

    /// Cache fake whose expiry follows the tokio clock and which records every write
    #[derive(Default)]
    pub(crate) struct FakeCache {
        entries: Mutex<HashMap<String, (String, Option<Instant>)>>,
        pub writes: Mutex<Vec<(String, String, Option<TtlMs>)>>,
        pub fail_writes: bool,
    }

    #[async_trait]
    impl CacheStore<String, String> for FakeCache {
        async fn put(&self, key: String, val: String, ttl: Option<TtlMs>) -> Result<PutResponse> {
            if self.fail_writes {
                return Err(Error::Cache("cache unavailable".to_string()));
            }
            self.writes
                .lock()
                .unwrap()
                .push((key.clone(), val.clone(), ttl));
            let deadline = ttl.map(|t| Instant::now() + t.as_duration());
            self.entries.lock().unwrap().insert(key, (val, deadline));
            Ok(PutResponse::new(true, "Successfully inserted"))
        }

        async fn get(&self, key: &String) -> Result<GetResponse<String>> {
            let entries = self.entries.lock().unwrap();
            match entries.get(key) {
                Some((_, Some(deadline))) if Instant::now() >= *deadline => Err(Error::NotFound),
                Some((value, _)) => Ok(GetResponse::new(true, value.clone())),
                None => Err(Error::NotFound),
            }
        }

        async fn delete(&self, key: &String) -> Result<DeleteResponse> {
            let existed = self.entries.lock().unwrap().remove(key).is_some();
            Ok(DeleteResponse::new(existed))
        }
    }

    fn aggregator(posts: FakePosts) -> (WordCountAggregator, Arc<FakeCache>) {
        let cache = Arc::new(FakeCache::default());
        (WordCountAggregator::new(Arc::new(posts), cache.clone()), cache)
    }

    #[test]
    fn test_tokenize_splits_on_punctuation_keeps_underscore() {
        let tokens: Vec<&str> = tokenize("foo_bar, foo-bar!").collect();
        assert_eq!(tokens, vec!["foo_bar", "foo", "bar"]);
    }

    #[test]
    fn test_tokenize_edge_cases() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize("  ...!?  ").count(), 0);
        let tokens: Vec<&str> = tokenize("it's 2024\ttabs\nnewlines").collect();
        assert_eq!(tokens, vec!["it", "s", "2024", "tabs", "newlines"]);
        // Non-ASCII letters separate tokens
        let tokens: Vec<&str> = tokenize("café au_lait").collect();
        assert_eq!(tokens, vec!["caf", "au_lait"]);
    }

    #[test]
    fn test_count_words_across_posts_case_insensitive() {
        let counts = count_words(["Hello World", "hello there world"]);
        let expected: BTreeMap<String, u64> = [("hello", 2), ("world", 2), ("there", 1)]
            .into_iter()
            .map(|(w, c)| (w.to_string(), c))
            .collect();
        assert_eq!(counts.into_inner(), expected);
    }

    #[test]
    fn test_count_words_matches_naive_tally_on_generated_text() {
        for _ in 0..20 {
            let posts: Vec<String> = (0..5)
                .map(|_| {
                    let words: Vec<String> = Words(1..12).fake();
                    words
                        .iter()
                        .enumerate()
                        .map(|(i, w)| if i % 2 == 0 { w.to_uppercase() } else { w.clone() })
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .collect();

            let mut expected: HashMap<String, u64> = HashMap::new();
            for post in &posts {
                for word in post.split([' ', ',']).filter(|w| !w.is_empty()) {
                    *expected.entry(word.to_lowercase()).or_default() += 1;
                }
            }

            let counts = count_words(&posts);
            assert_eq!(counts.len(), expected.len());
            for (word, count) in &expected {
                assert_eq!(counts.get(word), *count, "count for '{}'", word);
            }
        }
    }

    #[tokio::test]
    async fn test_run_publishes_counts_under_fixed_key_and_ttl() {
        let (aggregator, cache) = aggregator(FakePosts::with_contents(&[
            "Hello World",
            "hello there world",
        ]));

        let counts = aggregator.run().await.unwrap();
        assert_eq!(counts.get("hello"), 2);

        let writes = cache.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        let (key, value, ttl) = &writes[0];
        assert_eq!(key, WORD_COUNTS_KEY);
        assert_eq!(value, r#"{"hello":2,"there":1,"world":2}"#);
        assert_eq!(*ttl, Some(TtlMs(20_000)));
    }

    #[tokio::test]
    async fn test_run_with_no_posts_writes_empty_mapping() {
        let (aggregator, cache) = aggregator(FakePosts::default());

        let counts = aggregator.run().await.unwrap();
        assert!(counts.is_empty());
        assert_eq!(cache.writes.lock().unwrap()[0].1, "{}");
        assert_eq!(aggregator.read().await.unwrap(), Some(WordCounts::new()));
    }

    #[tokio::test]
    async fn test_repeated_runs_write_identical_mappings() {
        let (aggregator, cache) = aggregator(FakePosts::with_contents(&["a b a", "B c"]));

        aggregator.run().await.unwrap();
        aggregator.run().await.unwrap();

        let writes = cache.writes.lock().unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].1, writes[1].1);
    }

    #[tokio::test]
    async fn test_rerun_reflects_changed_posts() {
        let posts = Arc::new(FakePosts::with_contents(&["one"]));
        let cache = Arc::new(FakeCache::default());
        let aggregator = WordCountAggregator::new(posts.clone(), cache.clone());

        aggregator.run().await.unwrap();
        posts
            .create(Post::new("one two".to_string(), "author".to_string()))
            .await
            .unwrap();
        aggregator.run().await.unwrap();

        let latest = aggregator.read().await.unwrap().unwrap();
        assert_eq!(latest.get("one"), 2);
        assert_eq!(latest.get("two"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_before_ttl_returns_mapping() {
        let (aggregator, _cache) = aggregator(FakePosts::with_contents(&["Hello World"]));
        let written = aggregator.run().await.unwrap();

        advance(WORD_COUNTS_TTL - Duration::from_millis(1)).await;
        assert_eq!(aggregator.read().await.unwrap(), Some(written));
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_after_ttl_is_absent() {
        let (aggregator, _cache) = aggregator(FakePosts::with_contents(&["Hello World"]));
        aggregator.run().await.unwrap();

        advance(WORD_COUNTS_TTL + Duration::from_millis(1)).await;
        assert_eq!(aggregator.read().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rerun_refreshes_expiry() {
        let (aggregator, _cache) = aggregator(FakePosts::with_contents(&["Hello"]));
        aggregator.run().await.unwrap();

        advance(Duration::from_secs(15)).await;
        aggregator.run().await.unwrap();
        advance(Duration::from_secs(15)).await;

        assert!(aggregator.read().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_read_before_any_run_is_absent() {
        let (aggregator, _cache) = aggregator(FakePosts::with_contents(&["Hello"]));
        assert_eq!(aggregator.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_post_read_failure_fails_run_without_writing() {
        let posts = FakePosts {
            fail: true,
            ..FakePosts::default()
        };
        let (aggregator, cache) = aggregator(posts);

        let result = aggregator.run().await;
        assert!(matches!(result, Err(Error::Storage(_))));
        assert!(cache.writes.lock().unwrap().is_empty());
        assert_eq!(aggregator.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cache_write_failure_fails_run() {
        let cache = Arc::new(FakeCache {
            fail_writes: true,
            ..FakeCache::default()
        });
        let aggregator =
            WordCountAggregator::new(Arc::new(FakePosts::with_contents(&["Hello"])), cache);

        assert!(matches!(aggregator.run().await, Err(Error::Cache(_))));
    }
}
