use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use frame_data::{Field, Frame, Value, VectorType};
use indexmap::IndexMap;

use crate::{
    error::ReshapeError,
    schema::{time_series_schema, TimeSeriesType},
    time_at, ReshapeResult,
};

/// Unpivots a wide time series into one row per (timestamp, label set).
///
/// Value fields sharing a name become one output value field, so all fields of
/// a name must have the same vector type and no two of them may carry the same
/// labels. Every label key seen on any value field becomes a string factor
/// field, sorted by key; a field lacking a key contributes `""` for it. For every input row one output row is emitted per
/// distinct label set, in the order the label sets first appear among the
/// fields. A value name with no field for some label set yields zero (or null
/// for nullable types) in those rows.
///
/// Output fields are ordered time, values, factors.
pub fn wide_to_long(frame: &Frame) -> ReshapeResult<Frame> {
    let schema = time_series_schema(frame);
    let time_index = match (schema.series_type, schema.time_index) {
        (TimeSeriesType::Wide, Some(index)) => index,
        (actual, _) => return Err(ReshapeError::NotWide { actual }),
    };
    let rows = frame.row_len()?;
    if rows == 0 {
        return Err(ReshapeError::EmptyFrame);
    }

    // Value name -> (type, first field index).
    let mut groups: IndexMap<&str, (VectorType, usize)> = IndexMap::new();
    for &index in &schema.value_indices {
        let field = &frame.fields[index];
        let vector_type = field.vector_type();
        match groups.get(field.name.as_str()) {
            Some(&(expected, _)) if expected != vector_type => {
                return Err(ReshapeError::MismatchedValueTypes {
                    name: field.name.clone(),
                    expected,
                    actual: vector_type,
                });
            }
            Some(_) => {}
            None => {
                groups.insert(field.name.as_str(), (vector_type, index));
            }
        }
    }

    let factor_names: Vec<&str> = schema
        .value_indices
        .iter()
        .flat_map(|&index| frame.fields[index].labels.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    // Factor values -> source field for each value group, in `groups` order.
    let mut combinations: IndexMap<Vec<String>, Vec<Option<usize>>> = IndexMap::new();
    for &index in &schema.value_indices {
        let field = &frame.fields[index];
        let key: Vec<String> = factor_names
            .iter()
            .map(|name| field.labels.get(name).unwrap_or_default().to_string())
            .collect();
        if let Some(group) = groups.get_index_of(field.name.as_str()) {
            let slot = &mut combinations
                .entry(key)
                .or_insert_with(|| vec![None; groups.len()])[group];
            if slot.is_some() {
                return Err(ReshapeError::DuplicateSeries {
                    name: field.name.clone(),
                    labels: field.labels.to_string(),
                });
            }
            *slot = Some(index);
        }
    }

    let long_rows = rows * combinations.len();
    let time_field = &frame.fields[time_index];
    let mut long_time = Field::new(
        time_field.name.clone(),
        Some(time_field.labels.clone()),
        Vec::<DateTime<Utc>>::with_capacity(long_rows),
    );
    long_time.config = time_field.config.clone();

    let mut fields = vec![long_time];
    for (name, &(vector_type, first)) in &groups {
        let mut field = Field::with_type(*name, None, vector_type, 0);
        field.config = frame.fields[first].config.clone();
        fields.push(field);
    }
    for name in &factor_names {
        fields.push(Field::new(*name, None, Vec::<String>::with_capacity(long_rows)));
    }

    let mut long = Frame {
        name: frame.name.clone(),
        fields,
        ref_id: frame.ref_id.clone(),
        meta: frame.meta.clone(),
        warnings: frame.warnings.clone(),
    };

    let factor_offset = 1 + groups.len();
    for row in 0..rows {
        let time = time_at(time_field, row).ok_or(ReshapeError::NullTime { row })?;
        for (key, sources) in &combinations {
            long.fields[0].append(Value::Time(time));
            for (group, source) in sources.iter().enumerate() {
                let target = &mut long.fields[1 + group];
                match source {
                    Some(source) => target.append(frame.copy_at(*source, row)),
                    None => target.extend(1),
                }
            }
            for (offset, value) in key.iter().enumerate() {
                long.fields[factor_offset + offset].append(Value::String(value.clone()));
            }
        }
    }

    tracing::debug!(
        frame = %frame.name,
        wide_rows = rows,
        long_rows,
        series = combinations.len(),
        factors = factor_names.len(),
        "converted wide time series to long"
    );
    Ok(long)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use frame_data::{Labels, Vector};

    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn one_row_per_time_and_label_set() {
        let wide = Frame::new(
            "cpu",
            vec![
                Field::new("time", None, vec![t(0), t(1)]),
                Field::new("value", Some(Labels::from([("user", "alice")])), vec![1.0f64, 3.0]),
                Field::new("value", Some(Labels::from([("user", "bob")])), vec![2.0f64, 4.0]),
            ],
        )
        .with_ref_id("A");

        let long = wide_to_long(&wide).unwrap();
        assert_eq!(
            long,
            Frame::new(
                "cpu",
                vec![
                    Field::new("time", None, vec![t(0), t(0), t(1), t(1)]),
                    Field::new("value", None, vec![1.0f64, 2.0, 3.0, 4.0]),
                    Field::new("user", None, strings(&["alice", "bob", "alice", "bob"])),
                ],
            )
            .with_ref_id("A")
        );
    }

    #[test]
    fn unlabeled_fields_become_plain_long_rows() {
        let wide = Frame::new(
            "f",
            vec![
                Field::new("time", None, vec![Some(t(0))]),
                Field::new("a", None, vec![1i32]),
                Field::new("b", None, vec![Some(2u64)]),
            ],
        );

        let long = wide_to_long(&wide).unwrap();
        assert_eq!(long.fields.len(), 3);
        assert_eq!(long.fields[0].vector(), &Vector::from(vec![t(0)]));
        assert_eq!(long.fields[1].vector(), &Vector::from(vec![1i32]));
        assert_eq!(long.fields[2].vector(), &Vector::from(vec![Some(2u64)]));
    }

    #[test]
    fn missing_keys_and_series_fill_with_empty_and_zero() {
        let wide = Frame::new(
            "f",
            vec![
                Field::new("time", None, vec![t(0)]),
                Field::new("rx", Some(Labels::from([("host", "a")])), vec![10u32]),
                Field::new(
                    "tx",
                    Some(Labels::from([("host", "a"), ("dc", "eu")])),
                    vec![Some(20u32)],
                ),
                Field::new("rx", Some(Labels::from([("host", "b")])), vec![30u32]),
            ],
        );

        let long = wide_to_long(&wide).unwrap();
        let names: Vec<&str> = long.fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(names, vec!["time", "rx", "tx", "dc", "host"]);
        assert_eq!(long.row_len(), Ok(3));

        assert_eq!(long.fields[1].vector(), &Vector::from(vec![10u32, 0, 30]));
        assert_eq!(
            long.fields[2].vector(),
            &Vector::from(vec![None, Some(20u32), None])
        );
        assert_eq!(long.fields[3].vector(), &Vector::from(strings(&["", "eu", ""])));
        assert_eq!(long.fields[4].vector(), &Vector::from(strings(&["a", "a", "b"])));
    }

    #[test]
    fn same_name_with_different_types_is_rejected() {
        let wide = Frame::new(
            "f",
            vec![
                Field::new("time", None, vec![t(0)]),
                Field::new("v", Some(Labels::from([("k", "1")])), vec![1i64]),
                Field::new("v", Some(Labels::from([("k", "2")])), vec![Some(1i64)]),
            ],
        );
        assert_eq!(
            wide_to_long(&wide),
            Err(ReshapeError::MismatchedValueTypes {
                name: "v".to_string(),
                expected: VectorType::Int64,
                actual: VectorType::NullableInt64,
            })
        );
    }

    #[test]
    fn same_name_and_labels_is_rejected() {
        let wide = Frame::new(
            "f",
            vec![
                Field::new("time", None, vec![t(0)]),
                Field::new("v", Some(Labels::from([("k", "1")])), vec![1i64]),
                Field::new("v", Some(Labels::from([("k", "1")])), vec![2i64]),
            ],
        );
        assert_eq!(
            wide_to_long(&wide),
            Err(ReshapeError::DuplicateSeries {
                name: "v".to_string(),
                labels: "k=1".to_string(),
            })
        );
    }

    #[test]
    fn long_frames_and_empty_frames_are_rejected() {
        let long = Frame::new(
            "f",
            vec![
                Field::new("time", None, vec![t(0)]),
                Field::new("v", None, vec![1.0f64]),
                Field::new("s", None, strings(&["a"])),
            ],
        );
        assert_eq!(
            wide_to_long(&long),
            Err(ReshapeError::NotWide {
                actual: TimeSeriesType::Long
            })
        );

        let empty = Frame::new(
            "f",
            vec![
                Field::new("time", None, Vec::<DateTime<Utc>>::new()),
                Field::new("v", None, Vec::<f64>::new()),
            ],
        );
        assert_eq!(wide_to_long(&empty), Err(ReshapeError::EmptyFrame));
    }
}
