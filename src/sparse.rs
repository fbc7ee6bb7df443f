//! The feature converter: raw whitespace-token feature files in, sparse
//! `label index:value` records out.
//!
//! Input rows look like
//!
//! `<id> <id> <value> <value> ... <label>`
//!
//! where the first two tokens identify the row, the trailing token is its
//! class label, and everything between is an order-significant feature
//! vector. Output rows move the label to the front and index the values
//! from zero:
//!
//! `<label> 0:<value> 1:<value> ...`
//!
//! Values pass through as the bytes they arrived as; nothing is parsed as a
//! number. Tokens split on runs of whitespace, so indentation and doubled
//! spaces are harmless, but a row needs at least three tokens (the id pair
//! and a label) or the run aborts.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use bstr::ByteSlice;
use itertools::Itertools;

use crate::errors::{PrepError, Result};
use crate::scanner::RowScanner;

/// Fewer tokens than this leaves no room for an id pair and a label.
const MIN_TOKENS: usize = 3;

/// Converts every file directly under `dir`, in whatever order the
/// filesystem lists them, writing one sparse record per input row to `out`.
///
/// Non-recursive, and every directory entry is attempted: an entry that
/// cannot be read as a file (a subdirectory, say) fails the whole run.
///
/// The caller owns `out` and chooses its mode; the `convert` binary opens it
/// append+create, so successive runs accumulate into one training file.
pub fn convert_dir<W: Write>(dir: &Path, out: &mut W) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|source| PrepError::io(dir, source))?;
    for entry in entries {
        let entry = entry.map_err(|source| PrepError::io(dir, source))?;
        convert_file(&entry.path(), out)?;
    }
    Ok(())
}

/// Converts a single raw feature file into `out`.
pub fn convert_file<W: Write>(path: &Path, out: &mut W) -> Result<()> {
    let scanner = RowScanner::open(path)?;
    for (lineno, line) in scanner.lines().enumerate() {
        let tokens: Vec<&[u8]> = line.fields().collect();
        if tokens.len() < MIN_TOKENS {
            return Err(PrepError::BadRowWidth {
                path: path.to_owned(),
                line: lineno + 1,
                expected: MIN_TOKENS,
                got: tokens.len(),
            });
        }
        let label = tokens[tokens.len() - 1];
        let values = &tokens[2..tokens.len() - 1];
        write_sparse(label, values, out)?;
    }
    Ok(())
}

/// One output record: the label, then each value as a zero-based
/// `index:value` pair. Single spaces throughout, no trailing separator;
/// a row with no values emits the bare label.
fn write_sparse<W: Write>(label: &[u8], values: &[&[u8]], out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{}{}",
        label.as_bstr(),
        values.iter().enumerate().format_with("", |(i, v), f| {
            f(&format_args!(" {}:{}", i, v.as_bstr()))
        })
    )
}
