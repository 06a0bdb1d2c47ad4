//! Append-only encoder matching `ByteReader`.

use crate::model::date::Date;

/// Growable output buffer in the snapshot layout.
#[derive(Debug, Default)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_i64(&mut self, value: i64) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_date(&mut self, date: Date) {
        self.bytes.extend_from_slice(&date.year().to_le_bytes());
        self.bytes.push(date.month() as u8);
        self.bytes.push(date.day() as u8);
    }

    /// Writes `text` as an `i64` byte length followed by its UTF-8 bytes.
    pub fn write_str(&mut self, text: &str) {
        self.write_len(text.len());
        self.bytes.extend_from_slice(text.as_bytes());
    }

    /// Writes a collection length as `i64`.
    pub fn write_len(&mut self, len: usize) {
        // In-memory collections never exceed i64::MAX elements.
        self.write_i64(len as i64);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
