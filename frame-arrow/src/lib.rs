//! Arrow IPC file encoding for [`frame_data::Frame`].
//!
//! A frame becomes one Arrow schema plus zero or more record batches inside a
//! standard IPC file container. Arrow has no notion of labels, display config
//! or frame identity, so those travel in schema and field metadata
//! (see [`schema`] for the keys).
//!
//! The binding property is that `unmarshal(&marshal(&frame)?)?` equals `frame`;
//! the bytes themselves may differ between calls with different batching.

pub mod decode;
pub mod encode;
pub mod error;
pub mod schema;

use std::io::Cursor;

use arrow::ipc::{reader::FileReader, writer::FileWriter};
use frame_data::Frame;

pub use decode::append_record_batch;
pub use encode::{field_to_array, frame_to_record_batch};
pub use error::CodecError;
pub use schema::{frame_from_schema, frame_to_schema};

pub type CodecResult<T> = std::result::Result<T, CodecError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarshalOptions {
    /// Maximum rows per written record batch. `None` writes all rows in one batch.
    pub max_batch_rows: Option<usize>,
}

impl Default for MarshalOptions {
    fn default() -> Self {
        Self {
            max_batch_rows: frame_config::CONFIG.max_batch_rows(),
        }
    }
}

impl MarshalOptions {
    pub fn with_max_batch_rows(mut self, rows: usize) -> Self {
        self.max_batch_rows = Some(rows);
        self
    }
}

/// Encodes `frame` as an Arrow IPC file using the configured defaults.
pub fn marshal(frame: &Frame) -> CodecResult<Vec<u8>> {
    marshal_with_options(frame, &MarshalOptions::default())
}

/// Encodes `frame` as an Arrow IPC file.
///
/// A frame with zero rows is written as a schema with no record batches.
pub fn marshal_with_options(frame: &Frame, options: &MarshalOptions) -> CodecResult<Vec<u8>> {
    let batch = frame_to_record_batch(frame)?;
    let rows = batch.num_rows();
    let batch_rows = options.max_batch_rows.unwrap_or(rows).max(1);

    let mut writer = FileWriter::try_new(Vec::new(), &batch.schema())?;
    let mut offset = 0;
    while offset < rows {
        let length = batch_rows.min(rows - offset);
        tracing::trace!(frame = %frame.name, offset, length, "writing record batch");
        writer.write(&batch.slice(offset, length))?;
        offset += length;
    }
    writer.finish()?;
    let bytes = writer.into_inner()?;

    tracing::debug!(
        frame = %frame.name,
        fields = frame.fields.len(),
        rows,
        bytes = bytes.len(),
        "marshalled frame"
    );
    Ok(bytes)
}

/// Decodes an Arrow IPC file produced by [`marshal`] (or any writer using the
/// same type mapping) back into a frame.
pub fn unmarshal(bytes: &[u8]) -> CodecResult<Frame> {
    let reader = FileReader::try_new(Cursor::new(bytes), None)?;
    let mut frame = frame_from_schema(reader.schema().as_ref())?;

    let mut batches = 0;
    for batch in reader {
        let batch = batch?;
        tracing::trace!(frame = %frame.name, rows = batch.num_rows(), "reading record batch");
        append_record_batch(&mut frame, &batch)?;
        batches += 1;
    }

    tracing::debug!(
        frame = %frame.name,
        fields = frame.fields.len(),
        batches,
        bytes = bytes.len(),
        "unmarshalled frame"
    );
    Ok(frame)
}

/// Encodes each frame of a query response independently.
pub fn marshal_frames(frames: &[Frame]) -> CodecResult<Vec<Vec<u8>>> {
    frames.iter().map(marshal).collect()
}

/// Decodes a list of independently encoded frames, failing on the first bad entry.
pub fn unmarshal_frames<B: AsRef<[u8]>>(encoded: &[B]) -> CodecResult<Vec<Frame>> {
    encoded
        .iter()
        .map(|bytes| unmarshal(bytes.as_ref()))
        .collect()
}
