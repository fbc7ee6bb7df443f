//! Command-line front end for the ontology remapper.
//!
//! Loads a `name<TAB>id` word list and a tab-separated ontology table whose
//! third column is a root-to-leaf chain of ids (`1->27->304`), builds the
//! leaf -> ancestor-at-depth parent-class map, prints the map to stdout,
//! then rewrites the last (label) column of a comma-separated feature file
//! through it.
//!
//! The rewritten rows land in `newfeatures` in the working directory,
//! truncated fresh on every run.

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use bstr::ByteSlice;
use structopt::StructOpt;

use classprep::ontology::{self, DuplicateIds};

const OUTPUT: &str = "newfeatures";

#[derive(Debug, StructOpt)]
#[structopt(
    name = "remap",
    about = "Collapse feature-file class labels to ontology ancestors."
)]
struct Opt {
    /// Tab-separated ontology table; column 3 is the id ancestor chain.
    ontology_file: PathBuf,

    /// Tab-separated name/id word list.
    wordlist_file: PathBuf,

    /// Comma-separated feature file whose last column is the class label.
    features_file: PathBuf,

    /// Ancestor-chain position (0-based from the root) to collapse to.
    depth: usize,

    /// Abort if the word list repeats an id instead of keeping the last row.
    #[structopt(long)]
    strict: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();

    let dup = if opt.strict {
        DuplicateIds::Reject
    } else {
        DuplicateIds::LastWins
    };
    let words = ontology::load_word_map(&opt.wordlist_file, dup)?;
    let parents = ontology::parent_class_map(&opt.ontology_file, opt.depth, &words)?;

    println!("parent class map: {} entries", parents.len());
    for (leaf, ancestor) in &parents {
        println!("{} -> {}", leaf.as_bstr(), ancestor.as_bstr());
    }

    let file = File::create(OUTPUT)?;
    let mut out = BufWriter::new(file);
    ontology::remap_features(&opt.features_file, &parents, &mut out)?;
    out.flush()?;
    Ok(())
}
