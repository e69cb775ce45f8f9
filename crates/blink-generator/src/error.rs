use thiserror::Error;

/// Errors returned when a generator is configured with unusable settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("invalid code length {length}; expected {min}..={max}")]
    InvalidLength { length: usize, min: usize, max: usize },
    #[error("alphabet must contain at least two distinct characters")]
    AlphabetTooSmall,
    #[error("alphabet contains a character not allowed in short codes: {0:?}")]
    InvalidAlphabetChar(char),
    #[error("alphabet contains duplicate character: {0:?}")]
    DuplicateAlphabetChar(char),
}
