use thiserror::Error;

/// Fatal ingestion errors. Line numbers are 1-based.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// A line with the wrong number of fields
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A field that could not be parsed
    #[error("line {line}: invalid {field}: {value:?}")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
    /// An alignment block ended before all of its lines were read
    #[error("line {line}: alignment block is missing its {missing} line")]
    TruncatedBlock { line: usize, missing: &'static str },
    /// Paired aligned strings of different lengths
    #[error("line {line}: aligned strings differ in length ({subject} vs {query})")]
    AlignedLength {
        line: usize,
        subject: usize,
        query: usize,
    },
    #[error("empty interval {seq}:{start}-{end}")]
    EmptyInterval { seq: String, start: u64, end: u64 },
    /// An alignment walk that leaves the subject
    #[error("alignment of {query} runs past the end of {subject} (length {length})")]
    OutOfBounds {
        subject: String,
        query: String,
        length: usize,
    },
}
