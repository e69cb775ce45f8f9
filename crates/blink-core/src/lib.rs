//! Core types and traits for the Blink URL shortener.
//!
//! This crate provides the types shared by every backend and by the HTTP
//! gateway: the [`ShortCode`] identifier, the stored [`UrlRecord`], the
//! backend-facing [`Repository`] traits and the [`UrlStore`] capability
//! that handlers talk to.

pub mod error;
pub mod repository;
pub mod shortcode;
pub mod store;

pub use error::{ShortenerError, StorageError};
pub use repository::{ReadRepository, Repository, UrlRecord};
pub use shortcode::ShortCode;
pub use store::UrlStore;
