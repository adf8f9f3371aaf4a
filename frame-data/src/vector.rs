use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::VectorError;

/// The thirteen element kinds a [`Vector`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
    Bool,
    Time,
}

impl PrimitiveKind {
    /// Integer and floating point kinds. `Bool` is not numeric.
    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            PrimitiveKind::String | PrimitiveKind::Bool | PrimitiveKind::Time
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Uint32 => "uint32",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Float32 => "float32",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::String => "string",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Time => "time",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rust element types that map onto exactly one [`VectorType`].
///
/// This is the compile-time checked path into a [`Vector`]: `Vec<T>` converts
/// into the matching variant, and typed slices come back out without going
/// through [`Value`].
pub trait VectorElement: Clone + Sized {
    const VECTOR_TYPE: VectorType;

    fn into_vector(values: Vec<Self>) -> Vector;
    fn from_vector(vector: &Vector) -> Option<&[Self]>;
    fn from_vector_mut(vector: &mut Vector) -> Option<&mut Vec<Self>>;
    fn into_value(self) -> Value;
}

macro_rules! vector_types {
    ($( $kind:ident => $variant:ident, $nullable:ident, $ty:ty; )*) => {
        /// The closed set of kind × nullability pairs a [`Vector`] can be.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum VectorType {
            $( $variant, $nullable, )*
        }

        impl VectorType {
            pub const ALL: [VectorType; 26] = [ $( VectorType::$variant, VectorType::$nullable, )* ];

            pub fn kind(&self) -> PrimitiveKind {
                match self {
                    $( VectorType::$variant | VectorType::$nullable => PrimitiveKind::$kind, )*
                }
            }

            pub fn nullable(&self) -> bool {
                match self {
                    $(
                        VectorType::$variant => false,
                        VectorType::$nullable => true,
                    )*
                }
            }

            pub fn from_kind(kind: PrimitiveKind, nullable: bool) -> Self {
                match (kind, nullable) {
                    $(
                        (PrimitiveKind::$kind, false) => VectorType::$variant,
                        (PrimitiveKind::$kind, true) => VectorType::$nullable,
                    )*
                }
            }
        }

        /// A single dynamically typed cell.
        ///
        /// Each variant corresponds to one [`VectorType`]. `Null` is the untyped
        /// "no value" and is accepted by nullable vectors only.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Value {
            Null,
            $( $variant($ty), $nullable(Option<$ty>), )*
        }

        impl Value {
            /// The vector type this value belongs to, `None` for [`Value::Null`].
            pub fn vector_type(&self) -> Option<VectorType> {
                match self {
                    Value::Null => None,
                    $(
                        Value::$variant(_) => Some(VectorType::$variant),
                        Value::$nullable(_) => Some(VectorType::$nullable),
                    )*
                }
            }

            pub fn is_null(&self) -> bool {
                match self {
                    Value::Null => true,
                    $(
                        Value::$variant(_) => false,
                        Value::$nullable(v) => v.is_none(),
                    )*
                }
            }
        }

        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl From<Option<$ty>> for Value {
                fn from(value: Option<$ty>) -> Self {
                    Value::$nullable(value)
                }
            }
        )*

        /// Typed, homogeneous column storage.
        ///
        /// The variant fixes the [`VectorType`] for the lifetime of the vector;
        /// no operation converts between variants.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Vector {
            $( $variant(Vec<$ty>), $nullable(Vec<Option<$ty>>), )*
        }

        impl Vector {
            /// A vector of `len` zero values (or nulls for nullable types).
            pub fn new(vector_type: VectorType, len: usize) -> Self {
                match vector_type {
                    $(
                        VectorType::$variant => Vector::$variant(vec![<$ty as Default>::default(); len]),
                        VectorType::$nullable => Vector::$nullable(vec![None; len]),
                    )*
                }
            }

            pub fn vector_type(&self) -> VectorType {
                match self {
                    $(
                        Vector::$variant(_) => VectorType::$variant,
                        Vector::$nullable(_) => VectorType::$nullable,
                    )*
                }
            }

            pub fn len(&self) -> usize {
                match self {
                    $(
                        Vector::$variant(v) => v.len(),
                        Vector::$nullable(v) => v.len(),
                    )*
                }
            }

            /// Grows the vector by `n` zero/null slots.
            pub fn extend(&mut self, n: usize) {
                match self {
                    $(
                        Vector::$variant(v) => v.resize(v.len() + n, <$ty as Default>::default()),
                        Vector::$nullable(v) => v.resize(v.len() + n, None),
                    )*
                }
            }

            /// Returns the cell at `index` as a [`Value`] of this vector's type.
            ///
            /// # Panics
            /// If `index` is out of bounds.
            pub fn at(&self, index: usize) -> Value {
                match self {
                    $(
                        Vector::$variant(v) => Value::$variant(v[index].clone()),
                        Vector::$nullable(v) => Value::$nullable(v[index].clone()),
                    )*
                }
            }

            /// Dereferences the cell at `index`.
            ///
            /// Nullable cells come back as the non-nullable variant of the same
            /// kind. A null yields that kind's zero value and `false`.
            ///
            /// # Panics
            /// If `index` is out of bounds.
            pub fn concrete_at(&self, index: usize) -> (Value, bool) {
                match self {
                    $(
                        Vector::$variant(v) => (Value::$variant(v[index].clone()), true),
                        Vector::$nullable(v) => match &v[index] {
                            Some(value) => (Value::$variant(value.clone()), true),
                            None => (Value::$variant(<$ty as Default>::default()), false),
                        },
                    )*
                }
            }

            /// Replaces the cell at `index`, rejecting out of bounds indices and values of another type.
            pub fn try_set(&mut self, index: usize, value: Value) -> Result<(), VectorError> {
                let len = self.len();
                if index >= len {
                    return Err(VectorError::IndexOutOfBounds { index, len });
                }
                match (self, value) {
                    $(
                        (Vector::$variant(v), Value::$variant(value)) => v[index] = value,
                        (Vector::$nullable(v), Value::$nullable(value)) => v[index] = value,
                        (Vector::$nullable(v), Value::Null) => v[index] = None,
                    )*
                    (vector, value) => {
                        return Err(VectorError::TypeMismatch {
                            expected: vector.vector_type(),
                            actual: value.type_name(),
                        })
                    }
                }
                Ok(())
            }

            /// Appends one cell, rejecting values of another type.
            pub fn try_append(&mut self, value: Value) -> Result<(), VectorError> {
                match (self, value) {
                    $(
                        (Vector::$variant(v), Value::$variant(value)) => v.push(value),
                        (Vector::$nullable(v), Value::$nullable(value)) => v.push(value),
                        (Vector::$nullable(v), Value::Null) => v.push(None),
                    )*
                    (vector, value) => {
                        return Err(VectorError::TypeMismatch {
                            expected: vector.vector_type(),
                            actual: value.type_name(),
                        })
                    }
                }
                Ok(())
            }
        }

        $(
            impl VectorElement for $ty {
                const VECTOR_TYPE: VectorType = VectorType::$variant;

                fn into_vector(values: Vec<Self>) -> Vector {
                    Vector::$variant(values)
                }

                fn from_vector(vector: &Vector) -> Option<&[Self]> {
                    match vector {
                        Vector::$variant(v) => Some(v.as_slice()),
                        _ => None,
                    }
                }

                fn from_vector_mut(vector: &mut Vector) -> Option<&mut Vec<Self>> {
                    match vector {
                        Vector::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }

            impl VectorElement for Option<$ty> {
                const VECTOR_TYPE: VectorType = VectorType::$nullable;

                fn into_vector(values: Vec<Self>) -> Vector {
                    Vector::$nullable(values)
                }

                fn from_vector(vector: &Vector) -> Option<&[Self]> {
                    match vector {
                        Vector::$nullable(v) => Some(v.as_slice()),
                        _ => None,
                    }
                }

                fn from_vector_mut(vector: &mut Vector) -> Option<&mut Vec<Self>> {
                    match vector {
                        Vector::$nullable(v) => Some(v),
                        _ => None,
                    }
                }

                fn into_value(self) -> Value {
                    Value::$nullable(self)
                }
            }
        )*
    };
}

vector_types! {
    Int8 => Int8, NullableInt8, i8;
    Int16 => Int16, NullableInt16, i16;
    Int32 => Int32, NullableInt32, i32;
    Int64 => Int64, NullableInt64, i64;
    Uint8 => Uint8, NullableUint8, u8;
    Uint16 => Uint16, NullableUint16, u16;
    Uint32 => Uint32, NullableUint32, u32;
    Uint64 => Uint64, NullableUint64, u64;
    Float32 => Float32, NullableFloat32, f32;
    Float64 => Float64, NullableFloat64, f64;
    String => String, NullableString, String;
    Bool => Bool, NullableBool, bool;
    Time => Time, NullableTime, DateTime<Utc>;
}

impl fmt::Display for VectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable() {
            write!(f, "nullable {}", self.kind())
        } else {
            write!(f, "{}", self.kind())
        }
    }
}

impl Value {
    /// Human readable type of this value, used in mismatch errors.
    pub fn type_name(&self) -> String {
        match self.vector_type() {
            Some(vector_type) => vector_type.to_string(),
            None => "null".to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: VectorElement> From<Vec<T>> for Vector {
    fn from(values: Vec<T>) -> Self {
        T::into_vector(values)
    }
}

impl Vector {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn nullable(&self) -> bool {
        self.vector_type().nullable()
    }

    /// Whether [`Vector::try_set`] / [`Vector::try_append`] would take `value`.
    pub fn accepts(&self, value: &Value) -> bool {
        match value.vector_type() {
            Some(vector_type) => vector_type == self.vector_type(),
            None => self.nullable(),
        }
    }

    /// Returns an owned copy of the cell at `index`.
    ///
    /// Later mutation of the vector never changes a returned copy.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn copy_at(&self, index: usize) -> Value {
        self.at(index)
    }

    /// # Panics
    /// If `index` is out of bounds or `value` is not of this vector's type.
    pub fn set(&mut self, index: usize, value: Value) {
        if let Err(err) = self.try_set(index, value) {
            panic!("Vector::set: {err}");
        }
    }

    /// # Panics
    /// If `value` is not of this vector's type.
    pub fn append(&mut self, value: Value) {
        if let Err(err) = self.try_append(value) {
            panic!("Vector::append: {err}");
        }
    }

    /// Typed view of the storage, `None` if `T` is not this vector's element type.
    pub fn as_slice<T: VectorElement>(&self) -> Option<&[T]> {
        T::from_vector(self)
    }

    pub fn as_vec_mut<T: VectorElement>(&mut self) -> Option<&mut Vec<T>> {
        T::from_vector_mut(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;
    use crate::error::VectorError;

    #[test]
    fn vector_types_are_closed_and_distinct() {
        let all: HashSet<VectorType> = VectorType::ALL.into_iter().collect();
        assert_eq!(all.len(), 26);
        for vector_type in VectorType::ALL {
            assert_eq!(
                VectorType::from_kind(vector_type.kind(), vector_type.nullable()),
                vector_type
            );
            assert_eq!(Vector::new(vector_type, 2).vector_type(), vector_type);
        }
    }

    #[test]
    fn copy_at_does_not_alias_storage() {
        let mut vector = Vector::from(vec![Some(1.5f64), None]);
        let copy = vector.copy_at(0);
        vector.set(0, Value::NullableFloat64(Some(9.0)));
        assert_eq!(copy, Value::NullableFloat64(Some(1.5)));
        assert_eq!(vector.at(0), Value::NullableFloat64(Some(9.0)));
    }

    #[test]
    fn concrete_at_dereferences_nullable_slots() {
        let vector = Vector::from(vec![Some(3i32), None]);
        assert_eq!(vector.concrete_at(0), (Value::Int32(3), true));
        assert_eq!(vector.concrete_at(1), (Value::Int32(0), false));

        let vector = Vector::from(vec!["a".to_string()]);
        assert_eq!(vector.concrete_at(0), (Value::String("a".to_string()), true));
    }

    #[test]
    fn extend_pads_with_zero_or_null() {
        let mut values = Vector::from(vec![1u16]);
        values.extend(2);
        assert_eq!(values.as_slice::<u16>(), Some(&[1u16, 0, 0][..]));

        let mut times = Vector::new(VectorType::NullableTime, 0);
        times.extend(1);
        assert_eq!(times.at(0), Value::NullableTime(None));

        let mut flags = Vector::new(VectorType::Bool, 1);
        flags.extend(0);
        assert_eq!(flags.len(), 1);
    }

    #[test]
    fn null_is_only_accepted_by_nullable_vectors() {
        let mut nullable = Vector::new(VectorType::NullableString, 0);
        nullable.append(Value::Null);
        assert_eq!(nullable.at(0), Value::NullableString(None));

        let mut plain = Vector::new(VectorType::String, 0);
        let err = plain.try_append(Value::Null).unwrap_err();
        assert_eq!(
            err,
            VectorError::TypeMismatch {
                expected: VectorType::String,
                actual: "null".to_string()
            }
        );
        assert!(plain.is_empty());
    }

    #[test]
    fn no_implicit_coercion_between_types() {
        let mut vector = Vector::from(vec![1i64]);
        assert!(!vector.accepts(&Value::Int32(1)));
        assert!(!vector.accepts(&Value::NullableInt64(Some(1))));
        let err = vector.try_set(0, Value::Float64(1.0)).unwrap_err();
        assert!(matches!(
            err,
            VectorError::TypeMismatch {
                expected: VectorType::Int64,
                ..
            }
        ));
        assert_eq!(vector.at(0), Value::Int64(1));
    }

    #[test]
    fn try_set_reports_out_of_bounds() {
        let mut vector = Vector::new(VectorType::Uint8, 1);
        assert_eq!(
            vector.try_set(3, Value::Uint8(1)),
            Err(VectorError::IndexOutOfBounds { index: 3, len: 1 })
        );
    }

    #[test]
    #[should_panic(expected = "type mismatch")]
    fn set_panics_on_type_mismatch() {
        let mut vector = Vector::new(VectorType::Float32, 1);
        vector.set(0, Value::from("nope"));
    }

    #[test]
    #[should_panic(expected = "type mismatch")]
    fn append_panics_on_type_mismatch() {
        let mut vector = Vector::new(VectorType::Bool, 0);
        vector.append(Value::Int8(1));
    }

    #[test]
    fn typed_access_round_trips_time() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut vector = Vector::from(vec![t0]);
        vector
            .as_vec_mut::<DateTime<Utc>>()
            .unwrap()
            .push(t0 + chrono::Duration::seconds(1));
        assert_eq!(vector.len(), 2);
        assert!(vector.as_slice::<Option<DateTime<Utc>>>().is_none());
        assert_eq!(vector.vector_type().to_string(), "time");
        assert_eq!(VectorType::NullableTime.to_string(), "nullable time");
    }
}
