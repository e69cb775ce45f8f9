use crate::error::Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// The capability set handlers depend on.
///
/// A `UrlStore` is chosen once at startup and injected into the HTTP layer.
/// Every operation returns either a value or exactly one
/// [`ShortenerError`][crate::ShortenerError].
#[async_trait]
pub trait UrlStore: Send + Sync + 'static {
    /// Stores `original_url` under a freshly generated short code and returns the code.
    async fn create(&self, original_url: &str) -> Result<ShortCode>;

    /// Records a redirect for `code` and returns the URL to redirect to.
    async fn resolve(&self, code: &ShortCode) -> Result<String>;

    /// Returns the number of redirects recorded for `code`.
    async fn stats(&self, code: &ShortCode) -> Result<u64>;
}
