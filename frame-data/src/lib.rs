//! Columnar data model for query results.
//!
//! A [`Frame`] is an ordered list of [`Field`]s; each field owns exactly one
//! [`Vector`], a homogeneous column of one of 26 [`VectorType`]s (thirteen
//! element kinds, each nullable or not).
//!
//! ```
//! use frame_data::{Field, Frame, Labels, Value};
//!
//! let mut frame = Frame::new(
//!     "cpu",
//!     vec![
//!         Field::new("host", None, Vec::<String>::new()),
//!         Field::new("usage", Some(Labels::from([("unit", "pct")])), Vec::<Option<f64>>::new()),
//!     ],
//! );
//! frame.append_row_safe(vec![Value::from("a"), Value::NullableFloat64(Some(0.5))])?;
//! frame.append_row_safe(vec![Value::from("b"), Value::Null])?;
//! assert_eq!(frame.row_len()?, 2);
//! # Ok::<(), frame_data::FrameError>(())
//! ```

pub mod error;
pub mod field;
pub mod field_config;
pub mod frame;
pub mod labels;
pub mod meta;
pub mod vector;

pub use error::{FrameError, LabelsError, VectorError};
pub use field::Field;
pub use field_config::FieldConfig;
pub use frame::Frame;
pub use labels::Labels;
pub use meta::{FrameMeta, VisType, Warning};
pub use vector::{PrimitiveKind, Value, Vector, VectorElement, VectorType};
