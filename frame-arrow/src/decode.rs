use arrow::{
    array::{Array, ArrowPrimitiveType, AsArray, RecordBatch},
    datatypes::{
        Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
        TimestampNanosecondType, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
    },
};
use chrono::{DateTime, TimeZone, Utc};
use frame_data::{Field, Frame, Vector, VectorType};

use crate::{error::CodecError, CodecResult};

/// Appends every row of `batch` to the matching fields of `frame`.
///
/// `frame` is expected to come from [`crate::schema::frame_from_schema`] on the
/// batch's schema, so column `i` feeds field `i`.
pub fn append_record_batch(frame: &mut Frame, batch: &RecordBatch) -> CodecResult<()> {
    if batch.num_columns() != frame.fields.len() {
        return Err(CodecError::ColumnCountMismatch {
            expected: frame.fields.len(),
            actual: batch.num_columns(),
        });
    }

    for (field, column) in frame.fields.iter_mut().zip(batch.columns()) {
        append_array(field, column.as_ref())?;
    }
    Ok(())
}

fn append_array(field: &mut Field, array: &dyn Array) -> CodecResult<()> {
    let name = field.name.clone();
    let expected = field.vector_type();
    let mismatch = || column_mismatch(&name, expected, array);

    match field.vector_mut() {
        Vector::Int8(v) => append_values::<Int8Type>(&name, expected, v, array)?,
        Vector::NullableInt8(v) => append_options::<Int8Type>(&name, expected, v, array)?,
        Vector::Int16(v) => append_values::<Int16Type>(&name, expected, v, array)?,
        Vector::NullableInt16(v) => append_options::<Int16Type>(&name, expected, v, array)?,
        Vector::Int32(v) => append_values::<Int32Type>(&name, expected, v, array)?,
        Vector::NullableInt32(v) => append_options::<Int32Type>(&name, expected, v, array)?,
        Vector::Int64(v) => append_values::<Int64Type>(&name, expected, v, array)?,
        Vector::NullableInt64(v) => append_options::<Int64Type>(&name, expected, v, array)?,
        Vector::Uint8(v) => append_values::<UInt8Type>(&name, expected, v, array)?,
        Vector::NullableUint8(v) => append_options::<UInt8Type>(&name, expected, v, array)?,
        Vector::Uint16(v) => append_values::<UInt16Type>(&name, expected, v, array)?,
        Vector::NullableUint16(v) => append_options::<UInt16Type>(&name, expected, v, array)?,
        Vector::Uint32(v) => append_values::<UInt32Type>(&name, expected, v, array)?,
        Vector::NullableUint32(v) => append_options::<UInt32Type>(&name, expected, v, array)?,
        Vector::Uint64(v) => append_values::<UInt64Type>(&name, expected, v, array)?,
        Vector::NullableUint64(v) => append_options::<UInt64Type>(&name, expected, v, array)?,
        Vector::Float32(v) => append_values::<Float32Type>(&name, expected, v, array)?,
        Vector::NullableFloat32(v) => append_options::<Float32Type>(&name, expected, v, array)?,
        Vector::Float64(v) => append_values::<Float64Type>(&name, expected, v, array)?,
        Vector::NullableFloat64(v) => append_options::<Float64Type>(&name, expected, v, array)?,
        Vector::String(v) => {
            let strings = array.as_string_opt::<i32>().ok_or_else(mismatch)?;
            reject_nulls(&name, array)?;
            v.extend((0..strings.len()).map(|i| strings.value(i).to_string()));
        }
        Vector::NullableString(v) => {
            let strings = array.as_string_opt::<i32>().ok_or_else(mismatch)?;
            v.extend(strings.iter().map(|value| value.map(str::to_string)));
        }
        Vector::Bool(v) => {
            let bools = array.as_boolean_opt().ok_or_else(mismatch)?;
            reject_nulls(&name, array)?;
            v.extend(bools.values().iter());
        }
        Vector::NullableBool(v) => {
            let bools = array.as_boolean_opt().ok_or_else(mismatch)?;
            v.extend(bools.iter());
        }
        Vector::Time(v) => {
            let times = array
                .as_primitive_opt::<TimestampNanosecondType>()
                .ok_or_else(mismatch)?;
            reject_nulls(&name, array)?;
            v.extend(times.values().iter().map(|nanos| time_from_nanos(*nanos)));
        }
        Vector::NullableTime(v) => {
            let times = array
                .as_primitive_opt::<TimestampNanosecondType>()
                .ok_or_else(mismatch)?;
            v.extend(times.iter().map(|nanos| nanos.map(time_from_nanos)));
        }
    }
    Ok(())
}

fn append_values<T: ArrowPrimitiveType>(
    name: &str,
    expected: VectorType,
    values: &mut Vec<T::Native>,
    array: &dyn Array,
) -> CodecResult<()> {
    let primitives = array
        .as_primitive_opt::<T>()
        .ok_or_else(|| column_mismatch(name, expected, array))?;
    reject_nulls(name, array)?;
    values.extend_from_slice(primitives.values());
    Ok(())
}

fn append_options<T: ArrowPrimitiveType>(
    name: &str,
    expected: VectorType,
    values: &mut Vec<Option<T::Native>>,
    array: &dyn Array,
) -> CodecResult<()> {
    let primitives = array
        .as_primitive_opt::<T>()
        .ok_or_else(|| column_mismatch(name, expected, array))?;
    values.extend(primitives.iter());
    Ok(())
}

fn column_mismatch(name: &str, expected: VectorType, array: &dyn Array) -> CodecError {
    CodecError::ColumnTypeMismatch {
        field: name.to_string(),
        expected,
        data_type: array.data_type().clone(),
    }
}

fn reject_nulls(name: &str, array: &dyn Array) -> CodecResult<()> {
    if array.null_count() > 0 {
        return Err(CodecError::UnexpectedNull {
            field: name.to_string(),
        });
    }
    Ok(())
}

fn time_from_nanos(nanos: i64) -> DateTime<Utc> {
    Utc.timestamp_nanos(nanos)
}
