use chrono::{DateTime, Utc};
use frame_data::{Field, Frame, Labels, Value};
use indexmap::IndexMap;

use crate::{
    error::ReshapeError,
    factor_at,
    schema::{time_series_schema, TimeSeriesType},
    time_at, ReshapeResult,
};

/// Pivots a long time series into one column per (value field, factor values)
/// pair, with one row per distinct timestamp.
///
/// Input rows must be sorted ascending by time. Rows with equal timestamps
/// merge into one output row. A series with no observation at some timestamp
/// holds the zero value there, or null if its source field is nullable.
///
/// Null factor values label the series with an empty string.
///
/// Labels already on a value field are copied onto each of its series, and a
/// factor named like one of those labels replaces its value. Since
/// [`crate::wide_to_long`] turns every label key into a factor field, such
/// labels come back as extra factor fields rather than as labels.
pub fn long_to_wide(frame: &Frame) -> ReshapeResult<Frame> {
    let schema = time_series_schema(frame);
    let time_index = match (schema.series_type, schema.time_index) {
        (TimeSeriesType::Long, Some(index)) => index,
        (actual, _) => return Err(ReshapeError::NotLong { actual }),
    };
    let rows = frame.row_len()?;
    if rows == 0 {
        return Err(ReshapeError::EmptyFrame);
    }

    let time_field = &frame.fields[time_index];
    let mut wide_time = Field::new(
        time_field.name.clone(),
        Some(time_field.labels.clone()),
        Vec::<DateTime<Utc>>::with_capacity(rows),
    );
    wide_time.config = time_field.config.clone();

    let mut wide = Frame {
        name: frame.name.clone(),
        fields: vec![wide_time],
        ref_id: frame.ref_id.clone(),
        meta: frame.meta.clone(),
        warnings: frame.warnings.clone(),
    };

    // Factor values -> output field index for each input value field, in
    // `schema.value_indices` order.
    let mut series: IndexMap<Vec<String>, Vec<usize>> = IndexMap::new();
    let mut last: Option<DateTime<Utc>> = None;
    let mut wide_rows = 0;

    for row in 0..rows {
        let time = time_at(time_field, row).ok_or(ReshapeError::NullTime { row })?;
        match last {
            Some(previous) if time < previous => {
                return Err(ReshapeError::Unsorted {
                    row,
                    previous,
                    current: time,
                });
            }
            Some(previous) if time == previous => {}
            _ => {
                wide.fields[0].append(Value::Time(time));
                for field in wide.fields.iter_mut().skip(1) {
                    field.extend(1);
                }
                wide_rows += 1;
                last = Some(time);
            }
        }

        let key: Vec<String> = schema
            .factor_indices
            .iter()
            .map(|&index| factor_at(&frame.fields[index], row))
            .collect();

        if !series.contains_key(&key) {
            let labels: Labels = schema
                .factor_indices
                .iter()
                .zip(&key)
                .map(|(&index, value)| (frame.fields[index].name.clone(), value.clone()))
                .collect();

            let targets = schema
                .value_indices
                .iter()
                .map(|&index| {
                    let source = &frame.fields[index];
                    let mut series_labels = source.labels.clone();
                    for (name, value) in labels.iter() {
                        series_labels.insert(name, value);
                    }
                    let mut field = Field::with_type(
                        source.name.clone(),
                        Some(series_labels),
                        source.vector_type(),
                        wide_rows,
                    );
                    field.config = source.config.clone();
                    wide.fields.push(field);
                    wide.fields.len() - 1
                })
                .collect();
            tracing::trace!(row, labels = %labels, "new series");
            series.insert(key.clone(), targets);
        }

        for (&source, &target) in schema.value_indices.iter().zip(&series[&key]) {
            wide.fields[target].set(wide_rows - 1, frame.copy_at(source, row));
        }
    }

    tracing::debug!(
        frame = %frame.name,
        long_rows = rows,
        wide_rows,
        series = series.len(),
        fields = wide.fields.len(),
        "converted long time series to wide"
    );
    Ok(wide)
}
