use crate::error::GeneratorError;
use crate::Generator;
use blink_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use blink_core::ShortCode;
use rand::Rng;
use std::collections::HashSet;
use typed_builder::TypedBuilder;

/// Case-sensitive alphanumeric alphabet, 62 symbols.
pub const BASE62_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

pub const DEFAULT_LENGTH: usize = 7;

/// Configures a [`RandomGenerator`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGeneratorSettings {
    /// Symbols a code is drawn from. Must be valid short code characters.
    #[builder(default = BASE62_ALPHABET.to_string(), setter(into))]
    pub alphabet: String,
    /// Number of symbols per code.
    #[builder(default = DEFAULT_LENGTH)]
    pub length: usize,
}

impl Default for RandomGeneratorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Draws fixed-length codes uniformly at random from an alphabet.
///
/// With the default settings the keyspace is 62^7 (about 3.5 * 10^12) codes.
/// Candidates are independent draws, so two generators (or two service
/// instances) may propose the same code; the repository decides who wins.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    alphabet: Vec<u8>,
    length: usize,
}

impl RandomGenerator {
    pub fn new(settings: RandomGeneratorSettings) -> Result<Self, GeneratorError> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&settings.length) {
            return Err(GeneratorError::InvalidLength {
                length: settings.length,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            });
        }

        let mut seen = HashSet::new();
        for c in settings.alphabet.chars() {
            if !(c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                return Err(GeneratorError::InvalidAlphabetChar(c));
            }
            if !seen.insert(c) {
                return Err(GeneratorError::DuplicateAlphabetChar(c));
            }
        }
        if seen.len() < 2 {
            return Err(GeneratorError::AlphabetTooSmall);
        }

        Ok(Self {
            alphabet: settings.alphabet.into_bytes(),
            length: settings.length,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Total number of distinct codes this generator can produce, saturating at `u128::MAX`.
    pub fn keyspace(&self) -> u128 {
        (self.alphabet.len() as u128).saturating_pow(self.length as u32)
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self {
            alphabet: BASE62_ALPHABET.as_bytes().to_vec(),
            length: DEFAULT_LENGTH,
        }
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let mut rng = rand::thread_rng();
        let code: String = (0..self.length)
            .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}
