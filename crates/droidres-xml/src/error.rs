//! Error types for XML parsing and editing.

use thiserror::Error;

/// Error types for document parsing and edit application.
#[derive(Error, Debug)]
pub enum XmlError {
    /// Source could not be parsed as XML.
    #[error("XML parse error at byte {position}: {message}")]
    Parse {
        /// Byte offset where parsing failed.
        position: usize,
        /// Parser diagnostic.
        message: String,
    },

    /// A planned edit range does not lie within the source text.
    #[error("edit range {start}..{end} is outside the source (len {len})")]
    RangeOutOfBounds {
        /// Edit start offset.
        start: usize,
        /// Edit end offset.
        end: usize,
        /// Source length.
        len: usize,
    },

    /// Two planned edits overlap and cannot be applied in one pass.
    #[error("overlapping edits at {first_start}..{first_end} and {second_start}..{second_end}")]
    OverlappingEdits {
        /// First edit start offset.
        first_start: usize,
        /// First edit end offset.
        first_end: usize,
        /// Second edit start offset.
        second_start: usize,
        /// Second edit end offset.
        second_end: usize,
    },
}
