use std::collections::HashMap;

use arrow_schema::{DataType, Field as ArrowField, Schema, TimeUnit};
use frame_data::{Field, FieldConfig, Frame, FrameMeta, Labels, PrimitiveKind, VectorType, Warning};

use crate::{error::CodecError, CodecResult};

/// Table metadata key holding [`Frame::name`].
pub const FRAME_NAME_KEY: &str = "name";
/// Table metadata key holding [`Frame::ref_id`].
pub const FRAME_REF_ID_KEY: &str = "refId";
/// Table metadata key holding [`Frame::meta`] as JSON. Omitted when unset.
pub const FRAME_META_KEY: &str = "meta";
/// Table metadata key holding [`Frame::warnings`] as a JSON array. Omitted when empty.
pub const FRAME_WARNINGS_KEY: &str = "warnings";

/// Field metadata key holding [`Field::name`].
pub const FIELD_NAME_KEY: &str = "name";
/// Field metadata key holding the `k1=v1, k2=v2` rendering of [`Field::labels`].
pub const FIELD_LABELS_KEY: &str = "labels";
/// Field metadata key holding [`Field::config`] as JSON. Omitted when unset.
pub const FIELD_CONFIG_KEY: &str = "config";

/// The Arrow type a vector of `vector_type` is written as.
///
/// Nullability is carried by the Arrow field, not the data type.
pub fn arrow_data_type(vector_type: VectorType) -> DataType {
    match vector_type.kind() {
        PrimitiveKind::Int8 => DataType::Int8,
        PrimitiveKind::Int16 => DataType::Int16,
        PrimitiveKind::Int32 => DataType::Int32,
        PrimitiveKind::Int64 => DataType::Int64,
        PrimitiveKind::Uint8 => DataType::UInt8,
        PrimitiveKind::Uint16 => DataType::UInt16,
        PrimitiveKind::Uint32 => DataType::UInt32,
        PrimitiveKind::Uint64 => DataType::UInt64,
        PrimitiveKind::Float32 => DataType::Float32,
        PrimitiveKind::Float64 => DataType::Float64,
        PrimitiveKind::String => DataType::Utf8,
        PrimitiveKind::Bool => DataType::Boolean,
        PrimitiveKind::Time => DataType::Timestamp(TimeUnit::Nanosecond, None),
    }
}

/// The vector type an Arrow field decodes into.
///
/// Timestamps are accepted in any time zone but only at nanosecond resolution.
pub fn vector_type_of(field: &ArrowField) -> CodecResult<VectorType> {
    let kind = match field.data_type() {
        DataType::Int8 => PrimitiveKind::Int8,
        DataType::Int16 => PrimitiveKind::Int16,
        DataType::Int32 => PrimitiveKind::Int32,
        DataType::Int64 => PrimitiveKind::Int64,
        DataType::UInt8 => PrimitiveKind::Uint8,
        DataType::UInt16 => PrimitiveKind::Uint16,
        DataType::UInt32 => PrimitiveKind::Uint32,
        DataType::UInt64 => PrimitiveKind::Uint64,
        DataType::Float32 => PrimitiveKind::Float32,
        DataType::Float64 => PrimitiveKind::Float64,
        DataType::Utf8 => PrimitiveKind::String,
        DataType::Boolean => PrimitiveKind::Bool,
        DataType::Timestamp(TimeUnit::Nanosecond, _) => PrimitiveKind::Time,
        other => {
            return Err(CodecError::UnsupportedArrowType {
                field: field.name().clone(),
                data_type: other.clone(),
                nullable: field.is_nullable(),
            })
        }
    };
    Ok(VectorType::from_kind(kind, field.is_nullable()))
}

/// Builds the Arrow schema for `frame`, including field and table metadata.
pub fn frame_to_schema(frame: &Frame) -> CodecResult<Schema> {
    let fields = frame
        .fields
        .iter()
        .map(field_to_arrow)
        .collect::<CodecResult<Vec<_>>>()?;

    let mut metadata = HashMap::new();
    metadata.insert(FRAME_NAME_KEY.to_string(), frame.name.clone());
    metadata.insert(FRAME_REF_ID_KEY.to_string(), frame.ref_id.clone());
    if let Some(meta) = &frame.meta {
        metadata.insert(FRAME_META_KEY.to_string(), to_json(FRAME_META_KEY, meta)?);
    }
    if !frame.warnings.is_empty() {
        metadata.insert(
            FRAME_WARNINGS_KEY.to_string(),
            to_json(FRAME_WARNINGS_KEY, &frame.warnings)?,
        );
    }

    Ok(Schema::new(fields).with_metadata(metadata))
}

fn field_to_arrow(field: &Field) -> CodecResult<ArrowField> {
    let vector_type = field.vector_type();
    if !field.labels.is_encodable() {
        return Err(CodecError::UnencodableLabels {
            field: field.name.clone(),
            labels: field.labels.to_string(),
        });
    }

    let mut metadata = HashMap::new();
    metadata.insert(FIELD_NAME_KEY.to_string(), field.name.clone());
    metadata.insert(FIELD_LABELS_KEY.to_string(), field.labels.to_string());
    if let Some(config) = &field.config {
        metadata.insert(FIELD_CONFIG_KEY.to_string(), to_json(FIELD_CONFIG_KEY, config)?);
    }

    Ok(ArrowField::new(
        field.name.clone(),
        arrow_data_type(vector_type),
        vector_type.nullable(),
    )
    .with_metadata(metadata))
}

/// Builds a zero-row frame whose fields mirror `schema`.
///
/// Missing table keys decode to empty/unset values rather than errors.
pub fn frame_from_schema(schema: &Schema) -> CodecResult<Frame> {
    let metadata = schema.metadata();

    let fields = schema
        .fields()
        .iter()
        .map(|field| field_from_arrow(field))
        .collect::<CodecResult<Vec<_>>>()?;

    let mut frame = Frame::new(
        metadata.get(FRAME_NAME_KEY).cloned().unwrap_or_default(),
        fields,
    )
    .with_ref_id(metadata.get(FRAME_REF_ID_KEY).cloned().unwrap_or_default());

    if let Some(raw) = metadata.get(FRAME_META_KEY) {
        frame.meta = Some(from_json::<FrameMeta>(FRAME_META_KEY, raw)?);
    }
    if let Some(raw) = metadata.get(FRAME_WARNINGS_KEY) {
        frame.warnings = from_json::<Vec<Warning>>(FRAME_WARNINGS_KEY, raw)?;
    }

    Ok(frame)
}

fn field_from_arrow(field: &ArrowField) -> CodecResult<Field> {
    let vector_type = vector_type_of(field)?;
    let metadata = field.metadata();

    let labels = match metadata.get(FIELD_LABELS_KEY) {
        Some(raw) => raw
            .parse::<Labels>()
            .map_err(|source| CodecError::InvalidLabels {
                field: field.name().clone(),
                source,
            })?,
        None => Labels::new(),
    };

    let mut out = Field::with_type(field.name().clone(), Some(labels), vector_type, 0);
    if let Some(raw) = metadata.get(FIELD_CONFIG_KEY) {
        out.config = Some(from_json::<FieldConfig>(FIELD_CONFIG_KEY, raw)?);
    }
    Ok(out)
}

fn to_json<T: serde::Serialize + ?Sized>(key: &str, value: &T) -> CodecResult<String> {
    serde_json::to_string(value).map_err(|source| CodecError::Metadata {
        key: key.to_string(),
        source,
    })
}

fn from_json<T: serde::de::DeserializeOwned>(key: &str, raw: &str) -> CodecResult<T> {
    serde_json::from_str(raw).map_err(|source| CodecError::Metadata {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_vector_type_maps_back_to_itself() {
        for vector_type in VectorType::ALL {
            let field = ArrowField::new(
                "f",
                arrow_data_type(vector_type),
                vector_type.nullable(),
            );
            assert_eq!(vector_type_of(&field).unwrap(), vector_type);
        }
    }

    #[test]
    fn timestamps_in_other_zones_are_time() {
        let field = ArrowField::new(
            "t",
            DataType::Timestamp(TimeUnit::Nanosecond, Some("Europe/Amsterdam".into())),
            false,
        );
        assert_eq!(vector_type_of(&field).unwrap(), VectorType::Time);
    }

    #[test]
    fn unsupported_types_name_the_field() {
        for data_type in [
            DataType::Date32,
            DataType::LargeUtf8,
            DataType::Timestamp(TimeUnit::Millisecond, None),
        ] {
            let field = ArrowField::new("when", data_type.clone(), true);
            let err = vector_type_of(&field).unwrap_err();
            assert!(matches!(
                &err,
                CodecError::UnsupportedArrowType { field, data_type: dt, nullable: true }
                    if field == "when" && dt == &data_type
            ));
        }
    }

    #[test]
    fn schema_carries_names_and_sorted_labels() {
        let frame = Frame::new(
            "cpu",
            vec![Field::new(
                "usage",
                Some(Labels::from([("zone", "b"), ("host", "a")])),
                vec![Some(1.0f64)],
            )],
        )
        .with_ref_id("A");

        let schema = frame_to_schema(&frame).unwrap();
        assert_eq!(schema.metadata()[FRAME_NAME_KEY], "cpu");
        assert_eq!(schema.metadata()[FRAME_REF_ID_KEY], "A");
        assert!(!schema.metadata().contains_key(FRAME_META_KEY));
        assert!(!schema.metadata().contains_key(FRAME_WARNINGS_KEY));

        let field = schema.field(0);
        assert_eq!(field.data_type(), &DataType::Float64);
        assert!(field.is_nullable());
        assert_eq!(field.metadata()[FIELD_NAME_KEY], "usage");
        assert_eq!(field.metadata()[FIELD_LABELS_KEY], "host=a, zone=b");
        assert!(!field.metadata().contains_key(FIELD_CONFIG_KEY));
    }

    #[test]
    fn labels_that_would_not_parse_back_are_rejected() {
        let frame = Frame::new(
            "f",
            vec![Field::new(
                "v",
                Some(Labels::from([("path", "/a, /b")])),
                vec![1i64],
            )],
        );
        let err = frame_to_schema(&frame).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnencodableLabels { field, labels } if field == "v" && labels == "path=/a, /b"
        ));
    }

    #[test]
    fn missing_metadata_decodes_to_defaults() {
        let schema = Schema::new(vec![ArrowField::new("v", DataType::Int64, false)]);
        let frame = frame_from_schema(&schema).unwrap();
        assert_eq!(frame.name, "");
        assert_eq!(frame.ref_id, "");
        assert!(frame.meta.is_none());
        assert!(frame.warnings.is_empty());
        assert!(frame.fields[0].labels.is_empty());
        assert_eq!(frame.fields[0].vector_type(), VectorType::Int64);
        assert_eq!(frame.fields[0].len(), 0);
    }

    #[test]
    fn malformed_labels_are_rejected() {
        let field = ArrowField::new("v", DataType::Int64, false).with_metadata(HashMap::from([(
            FIELD_LABELS_KEY.to_string(),
            "no-separator".to_string(),
        )]));
        let err = frame_from_schema(&Schema::new(vec![field])).unwrap_err();
        assert!(matches!(err, CodecError::InvalidLabels { field, .. } if field == "v"));
    }

    #[test]
    fn malformed_meta_is_rejected() {
        let schema = Schema::new(Vec::<ArrowField>::new()).with_metadata(HashMap::from([(
            FRAME_META_KEY.to_string(),
            "{not json".to_string(),
        )]));
        let err = frame_from_schema(&schema).unwrap_err();
        assert!(matches!(err, CodecError::Metadata { key, .. } if key == FRAME_META_KEY));
    }
}
