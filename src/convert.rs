//! Command-line front end for the feature converter.
//!
//! Reformats every file directly under a directory of raw feature files
//! (rows of `<id> <id> <value>... <label>` whitespace tokens) into sparse
//! `<label> 0:<value> 1:<value>...` records.
//!
//! The output file is opened append+create, so successive runs over
//! different directories pile their records into one training file. The
//! first unreadable or malformed file aborts the run; records written
//! before that point stay in the output.

use std::error::Error;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use structopt::StructOpt;

use classprep::sparse;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "convert",
    about = "Reformat raw feature files into sparse label index:value records."
)]
struct Opt {
    /// Directory whose files (non-recursive) are converted.
    input_directory: PathBuf,

    /// File the sparse records are appended to (created if absent).
    output_filename: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&opt.output_filename)?;
    let mut out = BufWriter::new(file);

    sparse::convert_dir(&opt.input_directory, &mut out)?;
    out.flush()?;
    Ok(())
}
