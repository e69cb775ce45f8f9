//! URL store implementation.
//!
//! [`ShortenerService`] implements the [`UrlStore`][blink_core::UrlStore]
//! contract once, over any [`Repository`][blink_core::Repository] backend and
//! any [`Generator`][blink_generator::Generator]. Backends only need to
//! provide atomic insert and atomic hit counting; code allocation and
//! collision retries live here.

pub mod service;

pub use service::{ShortenerService, DEFAULT_MAX_ATTEMPTS};
