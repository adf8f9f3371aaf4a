use chrono::{DateTime, Utc};
use frame_data::{FrameError, VectorType};

use crate::schema::TimeSeriesType;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReshapeError {
    #[error("long to wide requires a long time series, frame is {actual}")]
    NotLong { actual: TimeSeriesType },
    #[error("wide to long requires a wide time series, frame is {actual}")]
    NotWide { actual: TimeSeriesType },
    #[error("frame has no rows")]
    EmptyFrame,
    #[error("row {row}: time {current} is earlier than previous time {previous}, input must be sorted ascending")]
    Unsorted {
        row: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
    #[error("row {row}: time is null")]
    NullTime { row: usize },
    #[error("value fields named {name:?} differ in type: {expected} and {actual}")]
    MismatchedValueTypes {
        name: String,
        expected: VectorType,
        actual: VectorType,
    },
    #[error("more than one value field named {name:?} has labels {{{labels}}}")]
    DuplicateSeries { name: String, labels: String },
    #[error(transparent)]
    Frame(#[from] FrameError),
}
