//! Short code generators.
//!
//! Generators only propose candidate codes. They never talk to storage and
//! are not required to be globally unique: collisions are detected by the
//! repository and resolved by the caller with a fresh candidate.

pub mod error;
pub mod random;
pub mod seq;

pub use error::GeneratorError;
pub use random::{RandomGenerator, RandomGeneratorSettings, BASE62_ALPHABET};
pub use seq::SeqGenerator;

use blink_core::ShortCode;

/// Trait for generating candidate short codes.
///
/// Implementations are pure generators that don't interact with storage.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Produces the next candidate code.
    fn generate(&self) -> Self::Output;
}
