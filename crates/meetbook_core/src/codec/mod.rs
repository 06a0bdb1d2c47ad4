//! Binary encoding primitives for the meeting snapshot file.
//!
//! # Responsibility
//! - Encode and decode fixed-width integers, dates and length-prefixed
//!   strings in one explicit packed layout.
//!
//! # Invariants
//! - Integers are little-endian two's complement.
//! - A date is 4 bytes: `i16` year, `i8` month, `i8` day, no padding.
//! - Strings are an `i64` byte length followed by raw UTF-8 bytes.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod reader;
pub mod writer;

pub use reader::ByteReader;
pub use writer::ByteWriter;

/// Encoded width of an `i64` field.
pub const I64_ENCODED_LEN: usize = 8;
/// Encoded width of a `Date` field.
pub const DATE_ENCODED_LEN: usize = 4;

/// Reader operation that hit a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOp {
    I64,
    Date,
    String,
}

impl ReadOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::I64 => "read_i64",
            Self::Date => "read_date",
            Self::String => "read_string",
        }
    }
}

/// First failure recorded by a `ByteReader`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes remain than the operation needs.
    NotEnoughBytes {
        op: ReadOp,
        needed: u64,
        remaining: usize,
    },
    /// String length prefix is negative.
    NegativeLength(i64),
    /// String payload is not valid UTF-8.
    InvalidUtf8,
    /// Date fields do not name an existing calendar day.
    InvalidDate { year: i16, month: i8, day: i8 },
    /// Record content is well-formed bytes but violates store rules.
    InvalidRecord(String),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotEnoughBytes {
                op,
                needed,
                remaining,
            } => write!(
                f,
                "{}: not enough bytes (needed {needed}, remaining {remaining})",
                op.as_str()
            ),
            Self::NegativeLength(len) => write!(f, "read_string: negative length {len}"),
            Self::InvalidUtf8 => write!(f, "read_string: payload is not valid UTF-8"),
            Self::InvalidDate { year, month, day } => {
                write!(f, "read_date: invalid date {year}-{month}-{day}")
            }
            Self::InvalidRecord(message) => write!(f, "invalid record: {message}"),
        }
    }
}

impl Error for DecodeError {}
