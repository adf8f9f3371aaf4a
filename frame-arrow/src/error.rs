use arrow::error::ArrowError;
use arrow_schema::DataType;
use chrono::{DateTime, Utc};
use frame_data::{FrameError, LabelsError, VectorType};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Failures of the IPC container itself, including corrupt or truncated input.
    #[error(transparent)]
    Arrow(#[from] ArrowError),
    #[error("Frame is not encodable: {0}")]
    Frame(#[from] FrameError),
    #[error("Unsupported Arrow data type {data_type} (nullable: {nullable}) for field {field:?}")]
    UnsupportedArrowType {
        field: String,
        data_type: DataType,
        nullable: bool,
    },
    #[error("Column for field {field:?} has type {data_type}, expected a {expected} column")]
    ColumnTypeMismatch {
        field: String,
        expected: VectorType,
        data_type: DataType,
    },
    #[error("Column for non-nullable field {field:?} contains nulls")]
    UnexpectedNull { field: String },
    #[error("Time {value} in field {field:?} is outside the nanosecond timestamp range")]
    TimestampOutOfRange { field: String, value: DateTime<Utc> },
    #[error("Invalid labels metadata on field {field:?}: {source}")]
    InvalidLabels {
        field: String,
        #[source]
        source: LabelsError,
    },
    #[error("Labels {labels:?} on field {field:?} cannot be written in the k=v, k=v form")]
    UnencodableLabels { field: String, labels: String },
    #[error("Invalid {key:?} metadata: {source}")]
    Metadata {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Record batch has {actual} columns, schema has {expected} fields")]
    ColumnCountMismatch { expected: usize, actual: usize },
}
