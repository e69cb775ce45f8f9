//! Storage backends for Blink.
//!
//! Two interchangeable [`Repository`] implementations are provided:
//! [`InMemoryRepository`] for single-node, volatile deployments and
//! [`PgRepository`] for durable, multi-instance deployments.

pub mod error;
pub mod memory;
pub mod postgres;

pub use blink_core::{ReadRepository, Repository, StorageError, UrlRecord};
pub use memory::InMemoryRepository;
pub use postgres::PgRepository;
