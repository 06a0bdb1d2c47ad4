//! Forward-only byte cursor with a sticky first error.
//!
//! # Responsibility
//! - Extract `i64`, `Date` and length-prefixed strings from a byte slice.
//! - Record the first failure and turn every later read into a no-op.
//!
//! # Invariants
//! - Bytes are consumed only by successful reads: a read that fails leaves
//!   the cursor where it was before that read started.
//! - Once an error is recorded it is never cleared or replaced.
//! - A failed read returns the zero value of its type (`0`, `Date::MIN`,
//!   empty string).

use super::{DecodeError, ReadOp, DATE_ENCODED_LEN, I64_ENCODED_LEN};
use crate::model::date::Date;

/// Cursor over an immutable byte buffer.
///
/// Callers run a whole decode pass and check `finish()` once at the end;
/// loops that must stop early can poll `is_failed()`.
#[derive(Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    error: Option<DecodeError>,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, error: None }
    }

    /// Bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// First recorded failure, if any.
    pub fn error(&self) -> Option<&DecodeError> {
        self.error.as_ref()
    }

    /// Ends the decode pass.
    ///
    /// Returns the number of unread trailing bytes, or the first error.
    pub fn finish(self) -> Result<usize, DecodeError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.bytes.len()),
        }
    }

    pub fn read_i64(&mut self) -> i64 {
        match self.take::<I64_ENCODED_LEN>(ReadOp::I64) {
            Some(raw) => i64::from_le_bytes(raw),
            None => 0,
        }
    }

    pub fn read_date(&mut self) -> Date {
        let start = self.bytes;
        let Some(raw) = self.take::<DATE_ENCODED_LEN>(ReadOp::Date) else {
            return Date::MIN;
        };
        let year = i16::from_le_bytes([raw[0], raw[1]]);
        let month = raw[2] as i8;
        let day = raw[3] as i8;
        match Date::new(year, month, day) {
            Ok(date) => date,
            Err(_) => {
                self.bytes = start;
                self.fail(DecodeError::InvalidDate { year, month, day });
                Date::MIN
            }
        }
    }

    pub fn read_string(&mut self) -> String {
        let start = self.bytes;
        match self.read_string_payload() {
            Some(text) => text,
            None => {
                self.bytes = start;
                String::new()
            }
        }
    }

    fn read_string_payload(&mut self) -> Option<String> {
        if self.is_failed() {
            return None;
        }
        let len = self.read_i64();
        if self.is_failed() {
            return None;
        }
        if len < 0 {
            self.fail(DecodeError::NegativeLength(len));
            return None;
        }
        // Lengths beyond usize can never fit in the buffer.
        let Ok(len_usize) = usize::try_from(len) else {
            self.fail(DecodeError::NotEnoughBytes {
                op: ReadOp::String,
                needed: len as u64,
                remaining: self.bytes.len(),
            });
            return None;
        };
        let payload = self.take_slice(len_usize, ReadOp::String)?;
        match std::str::from_utf8(payload) {
            Ok(text) => Some(text.to_owned()),
            Err(_) => {
                self.fail(DecodeError::InvalidUtf8);
                None
            }
        }
    }

    /// Records `err` unless an earlier error is already held.
    pub(crate) fn fail(&mut self, err: DecodeError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn take<const N: usize>(&mut self, op: ReadOp) -> Option<[u8; N]> {
        let slice = self.take_slice(N, op)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Some(out)
    }

    fn take_slice(&mut self, len: usize, op: ReadOp) -> Option<&'a [u8]> {
        if self.is_failed() {
            return None;
        }
        if len > self.bytes.len() {
            self.fail(DecodeError::NotEnoughBytes {
                op,
                needed: len as u64,
                remaining: self.bytes.len(),
            });
            return None;
        }
        let bytes: &'a [u8] = self.bytes;
        let (head, tail) = bytes.split_at(len);
        self.bytes = tail;
        Some(head)
    }
}

#[cfg(test)]
mod tests {
    use super::ByteReader;
    use crate::codec::{DecodeError, ReadOp};
    use crate::model::date::Date;

    #[test]
    fn short_buffer_sets_operation_specific_error() {
        let bytes = [1u8, 2, 3];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_i64(), 0);
        assert_eq!(
            reader.error(),
            Some(&DecodeError::NotEnoughBytes {
                op: ReadOp::I64,
                needed: 8,
                remaining: 3,
            })
        );
        // Failed reads consume nothing.
        assert_eq!(reader.remaining(), 3);
    }

    #[test]
    fn first_error_is_sticky_and_later_reads_return_zero_values() {
        let bytes = [0xE8u8, 0x07];
        let mut reader = ByteReader::new(&bytes);

        assert_eq!(reader.read_date(), Date::MIN);
        assert_eq!(reader.read_i64(), 0);
        assert_eq!(reader.read_string(), "");

        let err = reader.finish().unwrap_err();
        assert!(err.to_string().starts_with("read_date: not enough bytes"));
    }

    #[test]
    fn string_longer_than_buffer_reports_read_string() {
        let mut bytes = 10i64.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"abc");
        let mut reader = ByteReader::new(&bytes);

        assert_eq!(reader.read_string(), "");
        let err = reader.finish().unwrap_err();
        assert_eq!(
            err,
            DecodeError::NotEnoughBytes {
                op: ReadOp::String,
                needed: 10,
                remaining: 3,
            }
        );
    }

    #[test]
    fn negative_string_length_is_rejected() {
        let bytes = (-1i64).to_le_bytes();
        let mut reader = ByteReader::new(&bytes);
        reader.read_string();
        assert_eq!(reader.finish(), Err(DecodeError::NegativeLength(-1)));
    }

    #[test]
    fn invalid_date_fields_are_rejected() {
        let mut bytes = 2023i16.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[2, 30]);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_date(), Date::MIN);
        assert_eq!(
            reader.finish(),
            Err(DecodeError::InvalidDate {
                year: 2023,
                month: 2,
                day: 30,
            })
        );
    }

    #[test]
    fn invalid_utf8_payload_is_rejected() {
        let mut bytes = 2i64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0xFF, 0xFE]);
        let mut reader = ByteReader::new(&bytes);
        reader.read_string();
        assert_eq!(reader.finish(), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn rejected_date_leaves_its_bytes_unread() {
        let mut bytes = 2023i16.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[2, 30]);
        bytes.extend_from_slice(&7i64.to_le_bytes());
        let mut reader = ByteReader::new(&bytes);

        reader.read_date();
        assert!(reader.is_failed());
        assert_eq!(reader.remaining(), 12);
    }

    #[test]
    fn rejected_string_leaves_length_prefix_unread() {
        let mut negative = (-3i64).to_le_bytes().to_vec();
        negative.push(b'x');
        let mut reader = ByteReader::new(&negative);
        reader.read_string();
        assert_eq!(reader.remaining(), 9);

        let mut not_utf8 = 2i64.to_le_bytes().to_vec();
        not_utf8.extend_from_slice(&[0xFF, 0xFE]);
        let mut reader = ByteReader::new(&not_utf8);
        reader.read_string();
        assert_eq!(reader.remaining(), 10);

        let mut short = 10i64.to_le_bytes().to_vec();
        short.extend_from_slice(b"abc");
        let mut reader = ByteReader::new(&short);
        reader.read_string();
        assert_eq!(reader.remaining(), 11);
    }

    #[test]
    fn finish_reports_trailing_bytes() {
        let mut bytes = 5i64.to_le_bytes().to_vec();
        bytes.push(0);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_i64(), 5);
        assert_eq!(reader.finish(), Ok(1));
    }
}
