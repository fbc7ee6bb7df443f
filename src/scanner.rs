//! Byte-level row access to flat text files.
//!
//! Every input this crate touches is a small flat file of delimiter-separated
//! cells, one record per line. A [`RowScanner`] reads a file once up front
//! and hands its lines out as byte slices (with any trailing `'\r'` removed);
//! [`DelimIter`] then splits a line into cells on a single-byte delimiter.
//!
//! Lines that start with the delimiter or repeat it will iterate over empty
//! cells; callers decide what those mean for their format.

use std::fs;
use std::path::Path;

use bstr::ByteSlice;

use crate::errors::{PrepError, Result};

/// An iterator over byte slices separated by a delimiter.
/// The iterated-over slices won't contain the delimiter, but may be empty.
#[derive(Clone)]
pub struct DelimIter<'a> {
    bytes: &'a [u8],
    pos: usize,
    delim: u8,
}

impl<'a> DelimIter<'a> {
    pub fn new<'b>(bytes: &'b [u8], delim: u8) -> DelimIter<'b> {
        DelimIter {
            bytes,
            pos: 0,
            delim,
        }
    }
}

impl<'a> Iterator for DelimIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.pos == self.bytes.len() {
            None
        } else {
            let start = self.pos;
            let bytes = &self.bytes[start..];
            let (end, new_pos) = match bytes.find_byte(self.delim) {
                None => (bytes.len(), bytes.len()),
                Some(next) => (next, next + 1),
            };
            self.pos = start + new_pos;
            Some(&bytes[..end])
        }
    }
}

/// Trims whitespace off both ends of a cell.
pub fn trim(cell: &[u8]) -> &[u8] {
    cell.trim()
}

/// Owns one file's bytes and iterates over its lines.
#[derive(Debug)]
pub struct RowScanner {
    bytes: Vec<u8>,
}

impl RowScanner {
    /// Reads the whole file up front. These inputs are one-pass batch files,
    /// small enough that buffering the lot beats line-at-a-time reads.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| PrepError::io(path, source))?;
        Ok(RowScanner { bytes })
    }

    /// Lines in file order, stripped of any trailing `'\r'`. A terminating
    /// newline does not produce a phantom empty line, but blank lines in the
    /// middle of the file do come through as empty slices.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        DelimIter::new(&self.bytes, b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
    }
}
