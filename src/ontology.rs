//! The ontology remapper: collapses feature-file class labels to an
//! ancestor class at a fixed depth of an ontology hierarchy.
//!
//! Three inputs cooperate:
//!
//! * a word list, `name<TAB>id` per row, inverted into an id -> name map;
//! * an ontology table whose third tab-separated column is a root-to-leaf
//!   ancestor chain of ids, `1->27->304`, where tokens may carry cosmetic
//!   underscores that are removed before lookup;
//! * a comma-separated feature file whose last cell is a class label.
//!
//! Each ontology row gives one leaf class its full lineage. Truncating the
//! chain at a depth and translating both ends through the word map yields
//! the parent-class map (leaf name -> ancestor name), which then rewrites
//! the feature file's label column. Chains too short to have an ancestor at
//! the requested depth contribute nothing, so with a deep enough cut the map
//! is empty and the feature file passes through unchanged.

use std::io::Write;
use std::path::Path;

use bstr::ByteSlice;
use hashbrown::HashMap;
use itertools::Itertools;

use crate::errors::{PrepError, Result};
use crate::scanner::{trim, DelimIter, RowScanner};

/// id -> name crosswalk built from a two-column word list.
pub type WordMap = HashMap<Vec<u8>, Vec<u8>>;

/// leaf class name -> ancestor class name at the requested depth.
pub type ParentClassMap = HashMap<Vec<u8>, Vec<u8>>;

/// What to do when two word-list rows carry the same id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplicateIds {
    /// The later row silently replaces the earlier one.
    LastWins,
    /// The second occurrence aborts the run.
    Reject,
}

/// Loads `name<TAB>id` rows and inverts them into an id -> name map.
///
/// Every row must have exactly two cells (trimmed after the tab split).
/// A repeated name keeps its last id. A repeated id is governed by `dup`:
/// the original tooling quietly let the later name win, which stays the
/// default, but `Reject` turns the collision into an error.
pub fn load_word_map(path: &Path, dup: DuplicateIds) -> Result<WordMap> {
    let scanner = RowScanner::open(path)?;
    let mut by_name: HashMap<Vec<u8>, Vec<u8>> = HashMap::new();
    for (lineno, line) in scanner.lines().enumerate() {
        let cells: Vec<&[u8]> = DelimIter::new(line, b'\t').map(trim).collect();
        if cells.len() != 2 {
            return Err(PrepError::BadRowWidth {
                path: path.to_owned(),
                line: lineno + 1,
                expected: 2,
                got: cells.len(),
            });
        }
        by_name.insert(cells[0].to_vec(), cells[1].to_vec());
    }

    let mut by_id = WordMap::with_capacity(by_name.len());
    for (name, id) in by_name {
        if by_id.insert(id.clone(), name).is_some() && dup == DuplicateIds::Reject {
            return Err(PrepError::DuplicateId {
                id: String::from_utf8_lossy(&id).into_owned(),
            });
        }
    }
    Ok(by_id)
}

/// Builds the parent-class map from the ontology table.
///
/// Rows with a single cell don't describe a node and are skipped. Rows with
/// exactly two cells claim to but are missing their chain column, which is
/// an error. Chains of length <= `depth` have no ancestor at that level and
/// contribute nothing; a leaf seen twice keeps its last row's ancestor.
pub fn parent_class_map(path: &Path, depth: usize, words: &WordMap) -> Result<ParentClassMap> {
    let scanner = RowScanner::open(path)?;
    let mut parents = ParentClassMap::new();
    for (lineno, line) in scanner.lines().enumerate() {
        let cells: Vec<&[u8]> = DelimIter::new(line, b'\t').map(trim).collect();
        if cells.len() < 2 {
            continue;
        }
        if cells.len() == 2 {
            return Err(PrepError::BadRowWidth {
                path: path.to_owned(),
                line: lineno + 1,
                expected: 3,
                got: cells.len(),
            });
        }
        let chain: Vec<&[u8]> = cells[2].split_str("->").collect();
        if chain.len() <= depth {
            continue;
        }
        let leaf = translate(chain[chain.len() - 1], words)?;
        let ancestor = translate(chain[depth], words)?;
        parents.insert(leaf, ancestor);
    }
    Ok(parents)
}

/// Removes every underscore from a chain token and looks the result up in
/// the word map. A miss is fatal; no placeholder is substituted.
fn translate(token: &[u8], words: &WordMap) -> Result<Vec<u8>> {
    let id: Vec<u8> = token.iter().copied().filter(|&b| b != b'_').collect();
    match words.get(&id) {
        Some(name) => Ok(name.clone()),
        None => Err(PrepError::UnknownId {
            id: String::from_utf8_lossy(&id).into_owned(),
        }),
    }
}

/// Rewrites the label column of a comma-separated feature file into `out`.
///
/// Cells are whitespace-trimmed after the comma split. A row whose trimmed
/// last cell is a parent-class key gets that cell replaced by the mapped
/// ancestor; every other cell (and rows with unknown labels) passes through
/// untouched. Rows are re-joined with bare commas, one line out per line in.
///
/// The split here keeps a trailing empty cell (a row ending in a bare comma
/// has an empty label), so the column count always survives the round trip.
pub fn remap_features<W: Write>(
    path: &Path,
    parents: &ParentClassMap,
    out: &mut W,
) -> Result<()> {
    let scanner = RowScanner::open(path)?;
    for line in scanner.lines() {
        let mut cells: Vec<&[u8]> = line.split_str(",").map(trim).collect();
        if let Some(last) = cells.last_mut() {
            if let Some(ancestor) = parents.get(*last) {
                *last = ancestor;
            }
        }
        writeln!(out, "{}", cells.iter().map(|c| c.as_bstr()).format(","))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::path::PathBuf;

    fn write_fixture(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents).unwrap();
        path
    }

    fn abc_words(dir: &Path) -> WordMap {
        let path = write_fixture(dir, "words", b"A\t1\nB\t2\nC\t3\n");
        load_word_map(&path, DuplicateIds::LastWins).unwrap()
    }

    #[test]
    fn word_map_inverts_name_id_rows() {
        let dir = tempfile::tempdir().unwrap();
        let words = abc_words(dir.path());
        assert_eq!(words.get(&b"2"[..].to_vec()), Some(&b"B"[..].to_vec()));
        assert_eq!(words.len(), 3);
    }

    #[test]
    fn word_map_duplicate_id_last_wins_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "words", b"A\t1\nB\t1\n");
        let words = load_word_map(&path, DuplicateIds::LastWins).unwrap();
        assert_eq!(words.len(), 1);
        assert!(words.contains_key(&b"1"[..].to_vec()));
    }

    #[test]
    fn word_map_duplicate_id_rejected_under_strict_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "words", b"A\t1\nB\t1\n");
        let err = load_word_map(&path, DuplicateIds::Reject).unwrap_err();
        match err {
            PrepError::DuplicateId { id } => assert_eq!(id, "1"),
            other => panic!("expected DuplicateId, got {:?}", other),
        }
    }

    #[test]
    fn word_map_wrong_cell_count_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "words", b"A\t1\nB\t2\textra\n");
        let err = load_word_map(&path, DuplicateIds::LastWins).unwrap_err();
        match err {
            PrepError::BadRowWidth { line, got, .. } => {
                assert_eq!(line, 2);
                assert_eq!(got, 3);
            }
            other => panic!("expected BadRowWidth, got {:?}", other),
        }
    }

    #[test]
    fn chain_truncates_to_ancestor_at_depth() {
        let dir = tempfile::tempdir().unwrap();
        let words = abc_words(dir.path());
        let path = write_fixture(dir.path(), "onto", b"x\ty\t1->2->3\n");
        let parents = parent_class_map(&path, 1, &words).unwrap();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents.get(&b"C"[..].to_vec()), Some(&b"B"[..].to_vec()));
    }

    #[test]
    fn short_chains_are_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let words = abc_words(dir.path());
        let path = write_fixture(dir.path(), "onto", b"x\ty\t1->2->3\n");
        let parents = parent_class_map(&path, 3, &words).unwrap();
        assert!(parents.is_empty());
    }

    #[test]
    fn underscores_are_stripped_before_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "words", b"Root\t1\nLeaf\t13\n");
        let words = load_word_map(&path, DuplicateIds::LastWins).unwrap();
        // `1_3` sheds its underscore and resolves as id 13.
        let onto = write_fixture(dir.path(), "onto", b"x\ty\t1->1_3\n");
        let parents = parent_class_map(&onto, 0, &words).unwrap();
        assert_eq!(
            parents.get(&b"Leaf"[..].to_vec()),
            Some(&b"Root"[..].to_vec())
        );
    }

    #[test]
    fn word_list_ids_keep_their_underscores() {
        // Only chain tokens shed underscores, so an underscored id in the
        // word list is unreachable from any chain.
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "words", b"Leaf\t2_0\n");
        let words = load_word_map(&path, DuplicateIds::LastWins).unwrap();
        let onto = write_fixture(dir.path(), "onto", b"x\ty\t2_0\n");
        let err = parent_class_map(&onto, 0, &words).unwrap_err();
        match err {
            PrepError::UnknownId { id } => assert_eq!(id, "20"),
            other => panic!("expected UnknownId, got {:?}", other),
        }
    }

    #[test]
    fn unknown_chain_token_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let words = abc_words(dir.path());
        let path = write_fixture(dir.path(), "onto", b"x\ty\t1->9->3\n");
        let err = parent_class_map(&path, 1, &words).unwrap_err();
        match err {
            PrepError::UnknownId { id } => assert_eq!(id, "9"),
            other => panic!("expected UnknownId, got {:?}", other),
        }
    }

    #[test]
    fn one_cell_rows_skip_but_two_cell_rows_fail() {
        let dir = tempfile::tempdir().unwrap();
        let words = abc_words(dir.path());

        let skipped = write_fixture(dir.path(), "onto1", b"comment row\nx\ty\t1->2\n");
        let parents = parent_class_map(&skipped, 0, &words).unwrap();
        assert_eq!(parents.get(&b"B"[..].to_vec()), Some(&b"A"[..].to_vec()));

        let broken = write_fixture(dir.path(), "onto2", b"x\ty\n");
        let err = parent_class_map(&broken, 0, &words).unwrap_err();
        match err {
            PrepError::BadRowWidth { line, expected, .. } => {
                assert_eq!(line, 1);
                assert_eq!(expected, 3);
            }
            other => panic!("expected BadRowWidth, got {:?}", other),
        }
    }

    #[test]
    fn repeated_leaf_keeps_last_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let words = abc_words(dir.path());
        let path = write_fixture(dir.path(), "onto", b"x\ty\t1->3\nx\ty\t2->3\n");
        let parents = parent_class_map(&path, 0, &words).unwrap();
        assert_eq!(parents.get(&b"C"[..].to_vec()), Some(&b"B"[..].to_vec()));
    }

    fn remap_to_string(path: &Path, parents: &ParentClassMap) -> String {
        let mut out = Vec::new();
        remap_features(path, parents, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn label_column_is_substituted() {
        let dir = tempfile::tempdir().unwrap();
        let mut parents = ParentClassMap::new();
        parents.insert(b"C".to_vec(), b"B".to_vec());
        let path = write_fixture(dir.path(), "feat", b"f1,f2,C\nf1,f2,D\n");
        assert_eq!(remap_to_string(&path, &parents), "f1,f2,B\nf1,f2,D\n");
    }

    #[test]
    fn cells_are_trimmed_after_the_split() {
        let dir = tempfile::tempdir().unwrap();
        let mut parents = ParentClassMap::new();
        parents.insert(b"C".to_vec(), b"B".to_vec());
        let path = write_fixture(dir.path(), "feat", b" f1 , f2 , C \n");
        assert_eq!(remap_to_string(&path, &parents), "f1,f2,B\n");
    }

    #[test]
    fn trailing_comma_keeps_its_empty_cell() {
        let dir = tempfile::tempdir().unwrap();
        let parents = ParentClassMap::new();
        let path = write_fixture(dir.path(), "feat", b"f1,f2,\n");
        assert_eq!(remap_to_string(&path, &parents), "f1,f2,\n");
    }

    #[test]
    fn empty_map_passes_rows_through() {
        let dir = tempfile::tempdir().unwrap();
        let parents = ParentClassMap::new();
        let path = write_fixture(dir.path(), "feat", b"f1,f2,C\n\nf3,f4,D\n");
        assert_eq!(remap_to_string(&path, &parents), "f1,f2,C\n\nf3,f4,D\n");
    }

    #[test]
    fn output_row_count_matches_input() {
        let dir = tempfile::tempdir().unwrap();
        let parents = ParentClassMap::new();
        let path = write_fixture(dir.path(), "feat", b"a,1\nb,2\nc,3\n");
        let text = remap_to_string(&path, &parents);
        assert_eq!(text.lines().count(), 3);
    }
}
