//! Rooted tree reconstruction from the flat parent-pointer record list.
//!
//! The builder never fails on structurally odd data. Dangling parent
//! references orphan their subtree, a missing root falls back to the first
//! record, and repeated ids keep their first occurrence. All of these are
//! reported through [`BuildDiagnostics`] so callers that care about data
//! integrity can flag the result as suspect.

use std::collections::{HashMap, HashSet};

use tracing::warn;
use vanshavali_types::{PersonId, PersonRecord};

use crate::error::{LineageError, Result};

// ── Tree node ────────────────────────────────────────────────────────

/// A record plus its owned children, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub record: PersonRecord,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn id(&self) -> PersonId {
        self.record.id
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }

    /// Pre-order walk over this subtree.
    pub fn walk(&self) -> Vec<&TreeNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

// ── Diagnostics ──────────────────────────────────────────────────────

/// Recovered data defects found while building the tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildDiagnostics {
    /// No record was parentless; the first record was used as root.
    pub root_fallback: bool,
    /// Parentless records that lost the root slot to a later one.
    pub detached_roots: Vec<PersonId>,
    /// Records whose parent id names no record in the set.
    pub dangling: Vec<PersonId>,
    /// Ids seen more than once; only the first record was kept.
    pub duplicate_ids: Vec<PersonId>,
    /// Records without an id (id 0).
    pub missing_ids: usize,
    /// Records that ended up outside the rooted tree for any reason.
    pub unreachable: usize,
    /// Children whose edge would close a parent cycle; the edge was skipped.
    pub cycle_edges: Vec<PersonId>,
}

impl BuildDiagnostics {
    /// True when the tree may not reflect the intended structure.
    pub fn is_suspect(&self) -> bool {
        self.root_fallback
            || !self.detached_roots.is_empty()
            || !self.dangling.is_empty()
            || !self.duplicate_ids.is_empty()
            || self.missing_ids > 0
            || self.unreachable > 0
            || !self.cycle_edges.is_empty()
    }
}

/// Output of [`build_tree`].
#[derive(Debug, Clone)]
pub struct TreeBuild {
    pub root: TreeNode,
    pub diagnostics: BuildDiagnostics,
}

// ── Builder ──────────────────────────────────────────────────────────

/// Build a rooted tree from records in input order.
///
/// The last parentless record becomes the root. With none, the first
/// record is used instead. Children keep input order.
pub fn build_tree(records: &[PersonRecord]) -> Result<TreeBuild> {
    let mut diagnostics = BuildDiagnostics::default();

    // Pass 1: id → position of the record that owns it
    let mut by_id: HashMap<PersonId, usize> = HashMap::new();
    let mut kept: Vec<usize> = Vec::new();
    for (pos, rec) in records.iter().enumerate() {
        if rec.id == 0 {
            diagnostics.missing_ids += 1;
            continue;
        }
        if by_id.contains_key(&rec.id) {
            diagnostics.duplicate_ids.push(rec.id);
            continue;
        }
        by_id.insert(rec.id, pos);
        kept.push(pos);
    }

    let Some(&first) = kept.first() else {
        return Err(LineageError::EmptyInput);
    };

    // Pass 2: attach each record under its parent
    let mut children_of: HashMap<PersonId, Vec<usize>> = HashMap::new();
    let mut root: Option<usize> = None;
    for &pos in &kept {
        let rec = &records[pos];
        match rec.parent_id {
            None => {
                if let Some(prev) = root.replace(pos) {
                    diagnostics.detached_roots.push(records[prev].id);
                }
            }
            Some(parent) if by_id.contains_key(&parent) => {
                children_of.entry(parent).or_default().push(pos);
            }
            Some(_) => diagnostics.dangling.push(rec.id),
        }
    }

    let root = root.unwrap_or_else(|| {
        diagnostics.root_fallback = true;
        first
    });

    let mut placed: HashSet<PersonId> = HashSet::new();
    let root = assemble(
        root,
        records,
        &children_of,
        &mut placed,
        &mut diagnostics.cycle_edges,
    );
    diagnostics.unreachable = kept.len() - placed.len();

    if diagnostics.is_suspect() {
        warn!(
            root_fallback = diagnostics.root_fallback,
            dangling = diagnostics.dangling.len(),
            duplicates = diagnostics.duplicate_ids.len(),
            missing_ids = diagnostics.missing_ids,
            unreachable = diagnostics.unreachable,
            cycle_edges = diagnostics.cycle_edges.len(),
            "family records have structural defects; tree built best-effort"
        );
    }

    Ok(TreeBuild { root, diagnostics })
}

/// Recursively clone a record and its children. A record already placed
/// (possible only through a parent cycle under the fallback root) is not
/// placed again; its id goes to `cycle_edges`.
fn assemble(
    pos: usize,
    records: &[PersonRecord],
    children_of: &HashMap<PersonId, Vec<usize>>,
    placed: &mut HashSet<PersonId>,
    cycle_edges: &mut Vec<PersonId>,
) -> TreeNode {
    let record = records[pos].clone();
    placed.insert(record.id);

    let mut children = Vec::new();
    if let Some(kids) = children_of.get(&record.id) {
        for &kid in kids {
            if placed.contains(&records[kid].id) {
                cycle_edges.push(records[kid].id);
                continue;
            }
            children.push(assemble(kid, records, children_of, placed, cycle_edges));
        }
    }

    TreeNode { record, children }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{pandey_records, record};

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(build_tree(&[]), Err(LineageError::EmptyInput)));
    }

    #[test]
    fn test_only_idless_records_is_empty_input() {
        let recs = vec![record(0, "बेनाम", None, None, 1, None)];
        assert!(matches!(build_tree(&recs), Err(LineageError::EmptyInput)));
    }

    #[test]
    fn test_root_matches_parentless_record_and_every_record_appears_once() {
        let recs = pandey_records();
        let built = build_tree(&recs).unwrap();
        assert_eq!(built.root.id(), 1);
        assert_eq!(built.root.size(), recs.len());

        let mut ids: Vec<PersonId> = built.root.walk().iter().map(|n| n.id()).collect();
        ids.sort();
        let mut expected: Vec<PersonId> = recs.iter().map(|r| r.id).collect();
        expected.sort();
        assert_eq!(ids, expected);
        assert!(!built.diagnostics.is_suspect());
    }

    #[test]
    fn test_children_keep_input_order() {
        let recs = vec![
            record(1, "क", None, None, 1, None),
            record(3, "ग", None, None, 2, Some(1)),
            record(2, "ख", None, None, 2, Some(1)),
        ];
        let built = build_tree(&recs).unwrap();
        let kids: Vec<PersonId> = built.root.children.iter().map(TreeNode::id).collect();
        assert_eq!(kids, vec![3, 2]);
    }

    #[test]
    fn test_child_listed_before_parent_is_still_attached() {
        let recs = vec![
            record(3, "ग", None, None, 3, Some(2)),
            record(1, "क", None, None, 1, None),
            record(2, "ख", None, None, 2, Some(1)),
        ];
        let built = build_tree(&recs).unwrap();
        assert_eq!(built.root.id(), 1);
        assert_eq!(built.root.children[0].children[0].id(), 3);
    }

    #[test]
    fn test_dangling_parent_orphans_subtree() {
        let recs = vec![
            record(1, "क", None, None, 1, None),
            record(2, "ख", None, None, 2, Some(1)),
            record(5, "च", None, None, 3, Some(99)),
            record(6, "छ", None, None, 4, Some(5)),
        ];
        let built = build_tree(&recs).unwrap();
        assert_eq!(built.root.size(), 2);
        assert_eq!(built.diagnostics.dangling, vec![5]);
        assert_eq!(built.diagnostics.unreachable, 2);
        assert!(built.diagnostics.is_suspect());
    }

    #[test]
    fn test_no_root_falls_back_to_first_record() {
        let recs = vec![
            record(2, "ख", None, None, 2, Some(1)),
            record(3, "ग", None, None, 3, Some(2)),
        ];
        let built = build_tree(&recs).unwrap();
        assert_eq!(built.root.id(), 2);
        assert_eq!(built.root.children[0].id(), 3);
        assert!(built.diagnostics.root_fallback);
    }

    #[test]
    fn test_parent_cycle_under_fallback_root_terminates() {
        let recs = vec![
            record(1, "क", None, None, 1, Some(2)),
            record(2, "ख", None, None, 2, Some(1)),
        ];
        let built = build_tree(&recs).unwrap();
        assert_eq!(built.root.id(), 1);
        assert_eq!(built.root.size(), 2);
        assert!(built.root.children[0].children.is_empty());
        // 2 → 1 closes the loop back to the root
        assert_eq!(built.diagnostics.cycle_edges, vec![1]);
        assert_eq!(built.diagnostics.unreachable, 0);
        assert!(built.diagnostics.is_suspect());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let recs = vec![
            record(1, "क", None, None, 1, None),
            record(2, "पहला", None, None, 2, Some(1)),
            record(2, "दूसरा", None, None, 2, Some(1)),
        ];
        let built = build_tree(&recs).unwrap();
        assert_eq!(built.root.children.len(), 1);
        assert_eq!(built.root.children[0].record.name, "पहला");
        assert_eq!(built.diagnostics.duplicate_ids, vec![2]);
    }

    #[test]
    fn test_last_parentless_record_wins_root() {
        let recs = vec![
            record(1, "क", None, None, 1, None),
            record(2, "ख", None, None, 1, None),
        ];
        let built = build_tree(&recs).unwrap();
        assert_eq!(built.root.id(), 2);
        assert_eq!(built.diagnostics.detached_roots, vec![1]);
        assert_eq!(built.diagnostics.unreachable, 1);
    }
}
