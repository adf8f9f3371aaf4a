use std::fmt;

use frame_data::{Frame, PrimitiveKind};

/// Shape of a frame as seen by the reshaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeSeriesType {
    /// Not a time series: no single time field, no value field, or a field
    /// that is neither time, numeric nor string.
    Not,
    /// One time field, numeric value fields and at least one string factor field.
    Long,
    /// One time field and numeric value fields only.
    Wide,
}

impl fmt::Display for TimeSeriesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSeriesType::Not => write!(f, "not a time series"),
            TimeSeriesType::Long => write!(f, "long"),
            TimeSeriesType::Wide => write!(f, "wide"),
        }
    }
}

/// Classification of a frame plus the field positions it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSeriesSchema {
    pub series_type: TimeSeriesType,
    /// Set only when the frame has exactly one time field.
    pub time_index: Option<usize>,
    pub time_nullable: bool,
    pub value_indices: Vec<usize>,
    pub factor_indices: Vec<usize>,
}

/// Classifies `frame` by the types of its fields. Never fails.
///
/// A frame with a field of any other kind (e.g. bool) classifies as
/// [`TimeSeriesType::Not`] even when it otherwise looks like a time series.
pub fn time_series_schema(frame: &Frame) -> TimeSeriesSchema {
    let mut schema = TimeSeriesSchema {
        series_type: TimeSeriesType::Not,
        time_index: None,
        time_nullable: false,
        value_indices: Vec::new(),
        factor_indices: Vec::new(),
    };

    let mut time_indices = Vec::new();
    for (index, field) in frame.fields.iter().enumerate() {
        let kind = field.vector_type().kind();
        match kind {
            PrimitiveKind::Time => time_indices.push(index),
            PrimitiveKind::String => schema.factor_indices.push(index),
            _ if kind.is_numeric() => schema.value_indices.push(index),
            _ => {}
        }
    }

    if time_indices.len() != 1 {
        return schema;
    }
    let time_index = time_indices[0];
    schema.time_index = Some(time_index);
    schema.time_nullable = frame.fields[time_index].nullable();

    if schema.value_indices.is_empty()
        || 1 + schema.value_indices.len() + schema.factor_indices.len() != frame.fields.len()
    {
        return schema;
    }

    schema.series_type = if schema.factor_indices.is_empty() {
        TimeSeriesType::Wide
    } else {
        TimeSeriesType::Long
    };
    schema
}

pub fn time_series_type(frame: &Frame) -> TimeSeriesType {
    time_series_schema(frame).series_type
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use frame_data::Field;

    use super::*;

    fn time(name: &str) -> Field {
        Field::new(name, None, Vec::<DateTime<Utc>>::new())
    }

    fn float(name: &str) -> Field {
        Field::new(name, None, Vec::<f64>::new())
    }

    fn string(name: &str) -> Field {
        Field::new(name, None, Vec::<String>::new())
    }

    fn classify(fields: Vec<Field>) -> TimeSeriesType {
        time_series_type(&Frame::new("f", fields))
    }

    #[test]
    fn classification_truth_table() {
        assert_eq!(classify(vec![time("t"), float("a")]), TimeSeriesType::Wide);
        assert_eq!(
            classify(vec![time("t"), float("a"), float("b")]),
            TimeSeriesType::Wide
        );
        assert_eq!(
            classify(vec![time("t"), float("a"), string("s")]),
            TimeSeriesType::Long
        );
        assert_eq!(classify(vec![time("t"), string("s")]), TimeSeriesType::Not);
        assert_eq!(classify(vec![float("a"), float("b")]), TimeSeriesType::Not);
        assert_eq!(
            classify(vec![time("t"), time("u"), float("a")]),
            TimeSeriesType::Not
        );
    }

    #[test]
    fn unclassifiable_field_makes_frame_not_a_time_series() {
        let frame = Frame::new(
            "f",
            vec![
                time("t"),
                float("a"),
                Field::new("ok", None, Vec::<Option<bool>>::new()),
            ],
        );
        let schema = time_series_schema(&frame);
        assert_eq!(schema.series_type, TimeSeriesType::Not);
        assert_eq!(schema.time_index, Some(0));
        assert_eq!(schema.value_indices, vec![1]);
    }

    #[test]
    fn schema_records_positions_and_nullable_time() {
        let frame = Frame::new(
            "f",
            vec![
                string("host"),
                Field::new("v", None, Vec::<Option<i32>>::new()),
                Field::new("t", None, Vec::<Option<DateTime<Utc>>>::new()),
                Field::new("region", None, Vec::<Option<String>>::new()),
                Field::new("w", None, Vec::<u8>::new()),
            ],
        );
        assert_eq!(
            time_series_schema(&frame),
            TimeSeriesSchema {
                series_type: TimeSeriesType::Long,
                time_index: Some(2),
                time_nullable: true,
                value_indices: vec![1, 4],
                factor_indices: vec![0, 3],
            }
        );
    }
}
