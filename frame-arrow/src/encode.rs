use std::sync::Arc;

use arrow::{
    array::{
        ArrayRef, BooleanBuilder, Float32Builder, Float64Builder, Int16Builder, Int32Builder,
        Int64Builder, Int8Builder, RecordBatch, RecordBatchOptions, StringBuilder,
        TimestampNanosecondBuilder, UInt16Builder, UInt32Builder, UInt64Builder, UInt8Builder,
    },
    datatypes::SchemaRef,
};
use chrono::{DateTime, Utc};
use frame_data::{Field, Frame, Vector};

use crate::{error::CodecError, schema::frame_to_schema, CodecResult};

macro_rules! build_values {
    ($builder:ty, $values:expr) => {{
        let mut builder = <$builder>::with_capacity($values.len());
        for value in $values.iter() {
            builder.append_value(*value);
        }
        Arc::new(builder.finish()) as ArrayRef
    }};
}

macro_rules! build_options {
    ($builder:ty, $values:expr) => {{
        let mut builder = <$builder>::with_capacity($values.len());
        for value in $values.iter() {
            builder.append_option(*value);
        }
        Arc::new(builder.finish()) as ArrayRef
    }};
}

/// Converts one field's vector into an Arrow array of the mapped type.
///
/// Nulls in nullable vectors become Arrow nulls, never sentinel values.
pub fn field_to_array(field: &Field) -> CodecResult<ArrayRef> {
    let array: ArrayRef = match field.vector() {
        Vector::Int8(v) => build_values!(Int8Builder, v),
        Vector::NullableInt8(v) => build_options!(Int8Builder, v),
        Vector::Int16(v) => build_values!(Int16Builder, v),
        Vector::NullableInt16(v) => build_options!(Int16Builder, v),
        Vector::Int32(v) => build_values!(Int32Builder, v),
        Vector::NullableInt32(v) => build_options!(Int32Builder, v),
        Vector::Int64(v) => build_values!(Int64Builder, v),
        Vector::NullableInt64(v) => build_options!(Int64Builder, v),
        Vector::Uint8(v) => build_values!(UInt8Builder, v),
        Vector::NullableUint8(v) => build_options!(UInt8Builder, v),
        Vector::Uint16(v) => build_values!(UInt16Builder, v),
        Vector::NullableUint16(v) => build_options!(UInt16Builder, v),
        Vector::Uint32(v) => build_values!(UInt32Builder, v),
        Vector::NullableUint32(v) => build_options!(UInt32Builder, v),
        Vector::Uint64(v) => build_values!(UInt64Builder, v),
        Vector::NullableUint64(v) => build_options!(UInt64Builder, v),
        Vector::Float32(v) => build_values!(Float32Builder, v),
        Vector::NullableFloat32(v) => build_options!(Float32Builder, v),
        Vector::Float64(v) => build_values!(Float64Builder, v),
        Vector::NullableFloat64(v) => build_options!(Float64Builder, v),
        Vector::Bool(v) => build_values!(BooleanBuilder, v),
        Vector::NullableBool(v) => build_options!(BooleanBuilder, v),
        Vector::String(v) => {
            let mut builder =
                StringBuilder::with_capacity(v.len(), v.iter().map(String::len).sum());
            for value in v {
                builder.append_value(value);
            }
            Arc::new(builder.finish())
        }
        Vector::NullableString(v) => {
            let mut builder = StringBuilder::with_capacity(
                v.len(),
                v.iter().flatten().map(String::len).sum(),
            );
            for value in v {
                builder.append_option(value.as_deref());
            }
            Arc::new(builder.finish())
        }
        Vector::Time(v) => {
            let mut builder = TimestampNanosecondBuilder::with_capacity(v.len());
            for value in v {
                builder.append_value(timestamp_nanos(&field.name, value)?);
            }
            Arc::new(builder.finish())
        }
        Vector::NullableTime(v) => {
            let mut builder = TimestampNanosecondBuilder::with_capacity(v.len());
            for value in v {
                let nanos = value
                    .as_ref()
                    .map(|value| timestamp_nanos(&field.name, value))
                    .transpose()?;
                builder.append_option(nanos);
            }
            Arc::new(builder.finish())
        }
    };
    Ok(array)
}

fn timestamp_nanos(field: &str, value: &DateTime<Utc>) -> CodecResult<i64> {
    value
        .timestamp_nanos_opt()
        .ok_or_else(|| CodecError::TimestampOutOfRange {
            field: field.to_string(),
            value: *value,
        })
}

/// Converts a whole frame into a single record batch carrying the frame's schema.
///
/// Field lengths are checked before any Arrow array is built. A frame without
/// fields becomes a zero-row, zero-column batch.
pub fn frame_to_record_batch(frame: &Frame) -> CodecResult<RecordBatch> {
    let rows = if frame.fields.is_empty() {
        0
    } else {
        frame.row_len()?
    };

    let schema: SchemaRef = Arc::new(frame_to_schema(frame)?);
    let columns = frame
        .fields
        .iter()
        .map(field_to_array)
        .collect::<CodecResult<Vec<_>>>()?;

    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    Ok(RecordBatch::try_new_with_options(schema, columns, &options)?)
}
