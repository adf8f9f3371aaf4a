use crate::vector::VectorType;

/// Contract violations on a single [`crate::Vector`].
///
/// The panicking `set`/`append` methods format these as their panic message;
/// the `try_*` variants hand them back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VectorError {
    #[error("index {index} out of bounds for vector of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("type mismatch: vector holds {expected}, got {actual}")]
    TypeMismatch { expected: VectorType, actual: String },
}

/// Failures of row-oriented operations across the fields of a [`crate::Frame`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("frame has no fields")]
    NoFields,
    #[error("row has {actual} values but frame has {expected} fields")]
    FieldCountMismatch { expected: usize, actual: usize },
    #[error("field {index} ({name:?}): expected {expected}, got {actual}")]
    TypeMismatch {
        index: usize,
        name: String,
        expected: VectorType,
        actual: String,
    },
    #[error("field {index} ({name:?}): null value given for non-nullable {expected}")]
    NullNotAllowed {
        index: usize,
        name: String,
        expected: VectorType,
    },
    #[error("field {index} ({name:?}) has length {actual}, expected {expected}")]
    LengthMismatch {
        index: usize,
        name: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelsError {
    #[error("label pair {0:?} is missing '='")]
    MissingSeparator(String),
    #[error("label pair {0:?} has an empty key")]
    EmptyKey(String),
}
