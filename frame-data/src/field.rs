use crate::{
    field_config::FieldConfig,
    labels::Labels,
    vector::{Value, Vector, VectorElement, VectorType},
};

/// A named column: one owned [`Vector`] plus labels and display configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub labels: Labels,
    pub config: Option<FieldConfig>,
    vector: Vector,
}

impl Field {
    /// Builds a field from typed values, e.g. `Vec<f64>` or `Vec<Option<String>>`.
    pub fn new<T: VectorElement>(
        name: impl Into<String>,
        labels: Option<Labels>,
        values: Vec<T>,
    ) -> Self {
        Self::from_vector(name, labels, Vector::from(values))
    }

    /// Builds a field of `len` zero/null values of the given type.
    pub fn with_type(
        name: impl Into<String>,
        labels: Option<Labels>,
        vector_type: VectorType,
        len: usize,
    ) -> Self {
        Self::from_vector(name, labels, Vector::new(vector_type, len))
    }

    pub fn from_vector(name: impl Into<String>, labels: Option<Labels>, vector: Vector) -> Self {
        Self {
            name: name.into(),
            labels: labels.unwrap_or_default(),
            config: None,
            vector,
        }
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn len(&self) -> usize {
        self.vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }

    pub fn vector_type(&self) -> VectorType {
        self.vector.vector_type()
    }

    pub fn nullable(&self) -> bool {
        self.vector.nullable()
    }

    pub fn vector(&self) -> &Vector {
        &self.vector
    }

    pub fn vector_mut(&mut self) -> &mut Vector {
        &mut self.vector
    }

    pub fn into_vector(self) -> Vector {
        self.vector
    }

    pub fn at(&self, index: usize) -> Value {
        self.vector.at(index)
    }

    /// # Panics
    /// See [`Vector::set`].
    pub fn set(&mut self, index: usize, value: Value) {
        self.vector.set(index, value)
    }

    /// # Panics
    /// See [`Vector::append`].
    pub fn append(&mut self, value: Value) {
        self.vector.append(value)
    }

    pub fn extend(&mut self, n: usize) {
        self.vector.extend(n)
    }
}
