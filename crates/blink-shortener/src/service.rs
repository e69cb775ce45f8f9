use async_trait::async_trait;
use blink_core::error::Result;
use blink_core::{
    ReadRepository, Repository, ShortCode, ShortenerError, StorageError, UrlRecord, UrlStore,
};
use blink_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use url::Url;

/// Candidates tried per create before giving up with
/// [`ShortenerError::CodeSpaceExhausted`].
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// A concrete implementation of the [`UrlStore`] trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - URL validation
/// - Short code allocation with bounded collision retries
/// - Mapping of backend results onto the store's error taxonomy
///
/// The generator is not trusted to be unique. Every candidate goes through
/// the repository's atomic insert; a conflict means another record already
/// owns the code and the next candidate is tried.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    max_attempts: usize,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            max_attempts: self.max_attempts,
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    pub fn new(repository: R, generator: G) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the number of candidates tried per create. Values below one
    /// are treated as one.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Validates that the URL has an http(s) scheme, a host, and only
    /// characters that can be sent back in a `Location` header.
    fn validate_url(url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        if url.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL contains whitespace or control characters: {:?}",
                url
            )));
        }

        // `Url::parse` tolerates `https:///path`, so the raw authority is checked first.
        let Some((scheme, rest)) = url.split_once("://") else {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a valid scheme and host: {}",
                url
            )));
        };

        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                scheme
            )));
        }

        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if authority.is_empty() {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a valid scheme and host: {}",
                url
            )));
        }

        let parsed = Url::parse(url)
            .map_err(|e| ShortenerError::InvalidUrl(format!("{}: {}", e, url)))?;
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a valid scheme and host: {}",
                url
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl<R: Repository, G: Generator> UrlStore for ShortenerService<R, G> {
    async fn create(&self, original_url: &str) -> Result<ShortCode> {
        Self::validate_url(original_url)?;

        for attempt in 1..=self.max_attempts {
            let code: ShortCode = self.generator.generate().into();

            match self
                .repository
                .insert(&code, UrlRecord::new(original_url))
                .await
            {
                Ok(()) => {
                    debug!(code = %code, attempt, "created short url");
                    return Ok(code);
                }
                Err(StorageError::Conflict(_)) => {
                    debug!(code = %code, attempt, "short code collision, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            attempts = self.max_attempts,
            "short code space exhausted; consider a longer code or larger alphabet"
        );
        Err(ShortenerError::CodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }

    async fn resolve(&self, code: &ShortCode) -> Result<String> {
        trace!(code = %code, "resolving short code");

        match self.repository.record_hit(code).await? {
            Some(url) => {
                debug!(code = %code, url = %url, "resolved short code");
                Ok(url)
            }
            None => {
                trace!(code = %code, "short code not found");
                Err(ShortenerError::NotFound(code.to_string()))
            }
        }
    }

    async fn stats(&self, code: &ShortCode) -> Result<u64> {
        self.repository
            .hits(code)
            .await?
            .ok_or_else(|| ShortenerError::NotFound(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blink_core::error::StorageResult;
    use blink_generator::{RandomGenerator, RandomGeneratorSettings, SeqGenerator};
    use blink_storage::InMemoryRepository;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_service() -> ShortenerService<InMemoryRepository, RandomGenerator> {
        ShortenerService::new(InMemoryRepository::new(), RandomGenerator::default())
    }

    fn code(s: &str) -> ShortCode {
        ShortCode::new(s).unwrap()
    }

    #[tokio::test]
    async fn create_then_resolve_returns_original_url() {
        let service = test_service();

        for url in [
            "https://example.com",
            "http://example.com/a/b?c=d#e",
            "HTTPS://EXAMPLE.COM/Path",
        ] {
            let code = service.create(url).await.unwrap();
            assert_eq!(service.resolve(&code).await.unwrap(), url);
        }
    }

    #[tokio::test]
    async fn create_resolve_stats_scenario() {
        let service = test_service();

        let c1 = service.create("https://example.com/a").await.unwrap();
        assert_eq!(c1.as_str().len(), 7);

        assert_eq!(service.stats(&c1).await.unwrap(), 0);
        assert_eq!(
            service.resolve(&c1).await.unwrap(),
            "https://example.com/a"
        );
        assert_eq!(service.stats(&c1).await.unwrap(), 1);

        service.resolve(&c1).await.unwrap();
        assert_eq!(service.stats(&c1).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let service = test_service();

        let err = service.resolve(&code("doesnotexist")).await.unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(ref c) if c == "doesnotexist"));

        let err = service.stats(&code("doesnotexist")).await.unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(_)));
    }

    #[tokio::test]
    async fn stats_is_idempotent_without_resolves() {
        let service = test_service();
        let c = service.create("https://example.com").await.unwrap();
        service.resolve(&c).await.unwrap();

        for _ in 0..5 {
            assert_eq!(service.stats(&c).await.unwrap(), 1);
        }
    }

    #[tokio::test]
    async fn invalid_urls_are_rejected_without_touching_storage() {
        let service = test_service();

        for url in [
            "",
            "   ",
            "not-a-valid-url",
            "ftp://example.com",
            "https://",
            "https:///path",
            "https://exa mple.com",
            "https://example.com/a\u{7f}b",
            "https://example.com/a\nb",
            "https://example.com/\u{0}",
            "https://example.com:99999",
            "http://[::1",
        ] {
            let err = service.create(url).await.unwrap_err();
            assert!(
                matches!(err, ShortenerError::InvalidUrl(_)),
                "{url:?} should be rejected"
            );
        }

        assert!(service.repository().is_empty());
    }

    #[tokio::test]
    async fn collision_is_retried_with_next_candidate() {
        let repository = Arc::new(InMemoryRepository::new());
        let first = ShortenerService::new(Arc::clone(&repository), SeqGenerator::with_prefix("bl"));
        let second =
            ShortenerService::new(Arc::clone(&repository), SeqGenerator::with_prefix("bl"));

        let a = first.create("https://a.example").await.unwrap();
        let b = second.create("https://b.example").await.unwrap();
        let c = first.create("https://c.example").await.unwrap();

        assert_eq!(a.as_str(), "bl000000");
        assert_eq!(b.as_str(), "bl000001");
        assert_eq!(c.as_str(), "bl000002");

        assert_eq!(first.resolve(&a).await.unwrap(), "https://a.example");
        assert_eq!(second.resolve(&b).await.unwrap(), "https://b.example");
        assert_eq!(repository.len(), 3);
    }

    #[tokio::test]
    async fn tiny_alphabet_eventually_exhausts_code_space() {
        let settings = RandomGeneratorSettings::builder()
            .alphabet("ab")
            .length(3)
            .build();
        let generator = RandomGenerator::new(settings).unwrap();
        let service = ShortenerService::new(InMemoryRepository::new(), generator);

        let mut created = HashSet::new();
        let mut exhausted = false;
        for i in 0..1000 {
            match service.create(&format!("https://example.com/{i}")).await {
                Ok(code) => assert!(created.insert(code)),
                Err(ShortenerError::CodeSpaceExhausted { attempts }) => {
                    assert_eq!(attempts, DEFAULT_MAX_ATTEMPTS);
                    exhausted = true;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert!(exhausted);
        assert!(created.len() <= 8);
        assert_eq!(service.repository().len(), created.len());
    }

    #[tokio::test]
    async fn full_code_space_always_exhausts() {
        let repository = Arc::new(InMemoryRepository::new());
        let service =
            ShortenerService::new(Arc::clone(&repository), SeqGenerator::with_prefix("bl"))
                .with_max_attempts(3);
        // Pre-claim the next three candidates.
        let squatter =
            ShortenerService::new(Arc::clone(&repository), SeqGenerator::with_prefix("bl"));
        for _ in 0..3 {
            squatter.create("https://squatter.example").await.unwrap();
        }

        let err = service.create("https://example.com").await.unwrap_err();
        assert!(matches!(
            err,
            ShortenerError::CodeSpaceExhausted { attempts: 3 }
        ));
        assert_eq!(repository.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_creates_never_share_a_code() {
        let service = test_service();

        let handles: Vec<_> = (0..1000)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create(&format!("https://example.com/{i}"))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut codes = HashSet::new();
        for handle in handles {
            assert!(codes.insert(handle.await.unwrap()));
        }
        assert_eq!(service.repository().len(), 1000);
    }

    /// Fails every write with an infrastructure error and counts the calls.
    #[derive(Default)]
    struct UnavailableRepository {
        inserts: AtomicUsize,
    }

    #[async_trait]
    impl ReadRepository for UnavailableRepository {
        async fn get(&self, _code: &ShortCode) -> StorageResult<Option<UrlRecord>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn hits(&self, _code: &ShortCode) -> StorageResult<Option<u64>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }
    }

    #[async_trait]
    impl Repository for UnavailableRepository {
        async fn insert(&self, _code: &ShortCode, _record: UrlRecord) -> StorageResult<()> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn record_hit(&self, _code: &ShortCode) -> StorageResult<Option<String>> {
            Err(StorageError::Timeout("pool timed out".to_string()))
        }
    }

    #[tokio::test]
    async fn infrastructure_errors_surface_without_retry() {
        let service = ShortenerService::new(
            UnavailableRepository::default(),
            RandomGenerator::default(),
        );

        let err = service.create("https://example.com").await.unwrap_err();
        assert!(matches!(
            err,
            ShortenerError::Infrastructure(StorageError::Unavailable(_))
        ));
        assert_eq!(service.repository().inserts.load(Ordering::SeqCst), 1);

        let err = service.resolve(&code("abc123")).await.unwrap_err();
        assert!(matches!(
            err,
            ShortenerError::Infrastructure(StorageError::Timeout(_))
        ));

        let err = service.stats(&code("abc123")).await.unwrap_err();
        assert!(matches!(err, ShortenerError::Infrastructure(_)));
    }

    #[test]
    fn max_attempts_is_at_least_one() {
        let service = test_service().with_max_attempts(0);
        assert_eq!(service.max_attempts(), 1);
    }
}
