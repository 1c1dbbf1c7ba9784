//! Error types for listing parsing.

use thiserror::Error;

/// Kind of table row, as decided by the row classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    CourseHeader,
    Class,
    Comment,
}

/// Errors raised by a single field decoder.
///
/// These never abort a document: the row keeps going with the field unknown.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Text doesn't follow the layout the decoder expects
    #[error("Unrecognized {field} format: {value:?}")]
    Format { field: &'static str, value: String },

    /// Text is well-formed but names a code we don't know
    #[error("Unknown {field} code: {value:?}")]
    UnknownCode { field: &'static str, value: String },
}

impl FieldError {
    pub(crate) fn format(field: &'static str, value: &str) -> Self {
        FieldError::Format {
            field,
            value: value.to_string(),
        }
    }

    pub(crate) fn unknown_code(field: &'static str, value: &str) -> Self {
        FieldError::UnknownCode {
            field,
            value: value.to_string(),
        }
    }
}

/// Errors that abort parsing of a whole document. Both mean the table
/// itself is out of shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A class or comment row showed up before any course header
    #[error("Row {row}: {kind:?} row without an open course")]
    MalformedRow { row: usize, kind: RowKind },

    /// A class row has fewer cells than the schema declares
    #[error("Row {row}: missing cell {index} ({field})")]
    MissingCell {
        row: usize,
        index: usize,
        field: &'static str,
    },
}

impl ParseError {
    /// Returns the row the error was raised on.
    pub fn row(&self) -> usize {
        match self {
            ParseError::MalformedRow { row, .. }
            | ParseError::MissingCell { row, .. } => *row,
        }
    }
}
