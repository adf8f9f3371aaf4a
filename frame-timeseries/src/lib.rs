//! Classification of frames as time series and conversion between the long
//! and wide layouts.
//!
//! A *long* frame has one row per observation and string "factor" fields
//! saying which series the row belongs to. A *wide* frame has one row per
//! timestamp and one value field per series, with the factors moved into the
//! field labels.

pub mod error;
pub mod long_to_wide;
pub mod schema;
pub mod wide_to_long;

use chrono::{DateTime, Utc};
use frame_data::{Field, Vector};

pub use error::ReshapeError;
pub use long_to_wide::long_to_wide;
pub use schema::{time_series_schema, time_series_type, TimeSeriesSchema, TimeSeriesType};
pub use wide_to_long::wide_to_long;

pub type ReshapeResult<T> = std::result::Result<T, ReshapeError>;

/// Time at `row`, `None` for a null or a non-time field.
pub(crate) fn time_at(field: &Field, row: usize) -> Option<DateTime<Utc>> {
    match field.vector() {
        Vector::Time(v) => Some(v[row]),
        Vector::NullableTime(v) => v[row],
        _ => None,
    }
}

/// Factor value at `row`; null reads as the empty string.
pub(crate) fn factor_at(field: &Field, row: usize) -> String {
    match field.vector() {
        Vector::String(v) => v[row].clone(),
        Vector::NullableString(v) => v[row].clone().unwrap_or_default(),
        _ => String::new(),
    }
}
