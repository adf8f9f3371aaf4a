use crate::{
    error::FrameError,
    field::Field,
    meta::{FrameMeta, Warning},
    vector::{Value, VectorType},
};

/// An ordered set of [`Field`]s that share a row length, plus table identity.
///
/// The shared length is not enforced on mutation; [`Frame::row_len`] reports
/// violations and row-oriented callers are expected to check it first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub name: String,
    pub fields: Vec<Field>,
    /// Identifier of the query that produced this frame
    pub ref_id: String,
    pub meta: Option<FrameMeta>,
    pub warnings: Vec<Warning>,
}

impl Frame {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            ..Default::default()
        }
    }

    pub fn with_ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = ref_id.into();
        self
    }

    pub fn with_meta(mut self, meta: FrameMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_warning(mut self, warning: Warning) -> Self {
        self.warnings.push(warning);
        self
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Appends one row after validating every value against its field.
    ///
    /// All checks run before the first mutation, so a rejected row leaves the
    /// frame untouched.
    pub fn append_row_safe(&mut self, values: Vec<Value>) -> Result<(), FrameError> {
        if values.len() != self.fields.len() {
            return Err(FrameError::FieldCountMismatch {
                expected: self.fields.len(),
                actual: values.len(),
            });
        }

        for (index, (field, value)) in self.fields.iter().zip(values.iter()).enumerate() {
            let expected = field.vector_type();
            match value.vector_type() {
                None if !expected.nullable() => {
                    return Err(FrameError::NullNotAllowed {
                        index,
                        name: field.name.clone(),
                        expected,
                    });
                }
                Some(actual) if actual != expected => {
                    return Err(FrameError::TypeMismatch {
                        index,
                        name: field.name.clone(),
                        expected,
                        actual: actual.to_string(),
                    });
                }
                _ => {}
            }
        }

        self.append_row(values);
        Ok(())
    }

    /// Appends one row without up-front validation.
    ///
    /// # Panics
    /// If the value count differs from the field count or a value does not
    /// match its field's type. Fields before the offending one are already
    /// extended at that point.
    pub fn append_row(&mut self, values: Vec<Value>) {
        assert_eq!(
            values.len(),
            self.fields.len(),
            "Frame::append_row: value count does not match field count"
        );
        for (field, value) in self.fields.iter_mut().zip(values) {
            field.append(value);
        }
    }

    /// Indices of the fields whose type is one of `types`, in field order.
    pub fn type_indices(&self, types: &[VectorType]) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| types.contains(&field.vector_type()))
            .map(|(index, _)| index)
            .collect()
    }

    /// The common length of all fields.
    pub fn row_len(&self) -> Result<usize, FrameError> {
        let (first, rest) = self.fields.split_first().ok_or(FrameError::NoFields)?;
        let expected = first.len();
        for (offset, field) in rest.iter().enumerate() {
            if field.len() != expected {
                return Err(FrameError::LengthMismatch {
                    index: offset + 1,
                    name: field.name.clone(),
                    expected,
                    actual: field.len(),
                });
            }
        }
        Ok(expected)
    }

    /// Grows every field by `n` zero/null rows.
    pub fn extend(&mut self, n: usize) {
        for field in &mut self.fields {
            field.extend(n);
        }
    }

    /// # Panics
    /// If either index is out of bounds.
    pub fn at(&self, field_index: usize, row_index: usize) -> Value {
        self.fields[field_index].at(row_index)
    }

    /// # Panics
    /// If either index is out of bounds.
    pub fn copy_at(&self, field_index: usize, row_index: usize) -> Value {
        self.fields[field_index].vector().copy_at(row_index)
    }

    /// # Panics
    /// If either index is out of bounds.
    pub fn concrete_at(&self, field_index: usize, row_index: usize) -> (Value, bool) {
        self.fields[field_index].vector().concrete_at(row_index)
    }

    /// # Panics
    /// If either index is out of bounds or the value does not match the field's type.
    pub fn set(&mut self, field_index: usize, row_index: usize, value: Value) {
        self.fields[field_index].set(row_index, value)
    }

    /// Copies out one row across all fields.
    ///
    /// # Panics
    /// If `row_index` is out of bounds for any field.
    pub fn row(&self, row_index: usize) -> Vec<Value> {
        self.fields
            .iter()
            .map(|field| field.vector().copy_at(row_index))
            .collect()
    }
}
