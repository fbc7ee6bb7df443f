//! `classprep` is a pair of one-off batch tools for preparing
//! text-classification datasets:
//!
//! * `convert` reformats a directory of raw feature files into sparse
//!   `label index:value` records, accumulated into one training file;
//! * `remap` collapses the class labels of a feature file to an ancestor
//!   class at a chosen depth of an ontology hierarchy.
//!
//! Both are single-pass, single-threaded transforms over small flat text
//! files. The library half holds the transforms, each writing into a handle
//! its caller opened; the binaries do the argument parsing and decide the
//! output mode (append for `convert`, truncate for `remap`).

pub mod errors;
pub mod ontology;
pub mod scanner;
pub mod sparse;
