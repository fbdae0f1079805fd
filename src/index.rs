//! Flat, navigable index over a built family tree.
//!
//! Persons live in an arena keyed by id. The parent link is stored as the
//! parent's id and resolved through the index on demand, so there is no
//! ownership cycle between parents and children.

use std::collections::{BTreeMap, HashMap, HashSet};

use vanshavali_types::{PersonId, PersonRecord};

use crate::tree::TreeNode;

// ── Indexed person ───────────────────────────────────────────────────

/// A person enriched with parent and child links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedPerson {
    pub id: PersonId,
    pub name: String,
    pub name_en: Option<String>,
    pub birth_year: Option<i32>,
    pub generation: u32,
    /// Back-reference into the owning index. `None` only for the root.
    pub parent: Option<PersonId>,
    /// Children in input order.
    pub children: Vec<PersonId>,
}

impl IndexedPerson {
    fn from_node(node: &TreeNode, parent: Option<PersonId>) -> Self {
        let rec = &node.record;
        IndexedPerson {
            id: rec.id,
            name: rec.name.clone(),
            name_en: rec.name_en.clone(),
            birth_year: rec.birth_year,
            generation: rec.generation,
            parent,
            children: node.children.iter().map(TreeNode::id).collect(),
        }
    }

    pub fn name_en_or_empty(&self) -> &str {
        self.name_en.as_deref().unwrap_or("")
    }

    /// The flat record this person was indexed from.
    pub fn to_record(&self) -> PersonRecord {
        PersonRecord {
            id: self.id,
            name: self.name.clone(),
            name_en: self.name_en.clone(),
            birth_year: self.birth_year,
            generation: self.generation,
            parent_id: self.parent,
        }
    }
}

// ── Person index ─────────────────────────────────────────────────────

/// Id → person mapping with aggregate counters and generation buckets.
///
/// Built once per record set and never patched; see
/// [`crate::store::FamilyTree::rebuild`].
#[derive(Debug, Default, Clone)]
pub struct PersonIndex {
    persons: HashMap<PersonId, IndexedPerson>,
    /// All ids, ascending. The iteration order for every scan.
    ids: Vec<PersonId>,
    root: Option<PersonId>,
    total: usize,
    max_generation: u32,
    generations: BTreeMap<u32, Vec<PersonId>>,
}

impl PersonIndex {
    /// Index every node reachable from `root` in one depth-first pass.
    pub fn from_tree(root: &TreeNode) -> Self {
        let mut index = PersonIndex::default();
        index.visit(root, None);
        index.ids.sort_unstable();
        index
    }

    fn visit(&mut self, node: &TreeNode, parent: Option<PersonId>) {
        if node.id() == 0 {
            return;
        }
        let person = IndexedPerson::from_node(node, parent);
        if parent.is_none() {
            self.root = Some(person.id);
        }

        self.total += 1;
        if person.generation > self.max_generation {
            self.max_generation = person.generation;
        }
        self.generations
            .entry(person.generation)
            .or_default()
            .push(person.id);
        self.ids.push(person.id);
        self.persons.insert(person.id, person);

        for child in &node.children {
            self.visit(child, Some(node.id()));
        }
    }

    // ── Counters ────────────────────────────────────────────────────

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn max_generation(&self) -> u32 {
        self.max_generation
    }

    pub fn root(&self) -> Option<&IndexedPerson> {
        self.root.and_then(|id| self.get(id))
    }

    // ── Lookup ──────────────────────────────────────────────────────

    pub fn get(&self, id: PersonId) -> Option<&IndexedPerson> {
        self.persons.get(&id)
    }

    /// Every indexed person in ascending id order.
    pub fn persons(&self) -> impl Iterator<Item = &IndexedPerson> + '_ {
        self.ids.iter().filter_map(|id| self.persons.get(id))
    }

    /// Persons of one generation, in traversal order.
    pub fn generation(&self, generation: u32) -> Vec<&IndexedPerson> {
        self.generations
            .get(&generation)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    /// Generation number → head count, ascending.
    pub fn generation_sizes(&self) -> Vec<(u32, usize)> {
        self.generations
            .iter()
            .map(|(g, ids)| (*g, ids.len()))
            .collect()
    }

    /// Exact match on the native or romanized name.
    pub fn find_by_name(&self, name: &str) -> Option<&IndexedPerson> {
        let name = name.trim();
        self.persons()
            .find(|p| p.name == name || p.name_en.as_deref() == Some(name))
    }

    // ── Navigation ──────────────────────────────────────────────────

    pub fn parent(&self, person: &IndexedPerson) -> Option<&IndexedPerson> {
        person.parent.and_then(|id| self.get(id))
    }

    pub fn children(&self, person: &IndexedPerson) -> Vec<&IndexedPerson> {
        person
            .children
            .iter()
            .filter_map(|id| self.get(*id))
            .collect()
    }

    /// Other children of the same parent. Empty for the root.
    pub fn siblings(&self, person: &IndexedPerson) -> Vec<&IndexedPerson> {
        match self.parent(person) {
            Some(parent) => self
                .children(parent)
                .into_iter()
                .filter(|c| c.id != person.id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// `[self, parent, grandparent, …, root]`.
    pub fn ancestor_path<'a>(&'a self, person: &'a IndexedPerson) -> Vec<&'a IndexedPerson> {
        let mut path = vec![person];
        let mut seen: HashSet<PersonId> = HashSet::from([person.id]);
        let mut current = person;
        while let Some(parent) = self.parent(current) {
            if !seen.insert(parent.id) {
                break;
            }
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Ancestors from the root down to the parent, excluding `person`.
    pub fn ancestors<'a>(&'a self, person: &'a IndexedPerson) -> Vec<&'a IndexedPerson> {
        let mut path = self.ancestor_path(person);
        path.remove(0);
        path.reverse();
        path
    }

    /// All descendants, pre-order: each child followed by its own line.
    pub fn descendants(&self, person: &IndexedPerson) -> Vec<&IndexedPerson> {
        let mut out = Vec::new();
        for child in self.children(person) {
            out.push(child);
            out.extend(self.descendants(child));
        }
        out
    }

    /// Ids visible in a person's extended lineage: the person, every direct
    /// ancestor, the siblings of the person and of each ancestor, and every
    /// descendant. Order of first appearance is kept.
    pub fn extended_lineage(&self, id: PersonId) -> Vec<PersonId> {
        let Some(person) = self.get(id) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut push = |id: PersonId| {
            if seen.insert(id) {
                out.push(id);
            }
        };

        let path = self.ancestor_path(person);
        for anc in &path {
            push(anc.id);
        }
        for anc in &path {
            if let Some(parent) = self.parent(anc) {
                for sib in &parent.children {
                    push(*sib);
                }
            }
        }
        push(person.id);
        for d in self.descendants(person) {
            push(d.id);
        }
        out
    }

    /// Inverse of tree building: one record per indexed person, sorted by
    /// id, parent ids restored from the back-references.
    pub fn flatten(&self) -> Vec<PersonRecord> {
        self.persons().map(IndexedPerson::to_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{pandey_index, pandey_records, record};
    use crate::tree::build_tree;

    fn names<'a>(people: &[&'a IndexedPerson]) -> Vec<&'a str> {
        people.iter().map(|p| p.name_en_or_empty()).collect()
    }

    #[test]
    fn test_counters_and_buckets() {
        let idx = pandey_index();
        assert_eq!(idx.total(), 12);
        assert_eq!(idx.max_generation(), 5);
        assert_eq!(
            idx.generation_sizes(),
            vec![(1, 1), (2, 3), (3, 3), (4, 3), (5, 2)]
        );
        assert_eq!(
            names(&idx.generation(2)),
            vec!["Ramdatt Pandey", "Krishnachandra Pandey", "Tara Pandey"]
        );
        assert!(idx.generation(9).is_empty());
    }

    #[test]
    fn test_parent_back_references_match_records() {
        let idx = pandey_index();
        for rec in pandey_records() {
            let p = idx.get(rec.id).unwrap();
            assert_eq!(p.parent, rec.parent_id);
            if let Some(parent_id) = rec.parent_id {
                assert_eq!(idx.parent(p).unwrap().id, parent_id);
            }
        }
        assert_eq!(idx.root().unwrap().id, 1);
    }

    #[test]
    fn test_unreachable_records_are_not_indexed() {
        let recs = vec![
            record(1, "क", None, None, 1, None),
            record(2, "ख", None, None, 2, Some(1)),
            record(3, "ग", None, None, 2, Some(42)),
        ];
        let built = build_tree(&recs).unwrap();
        let idx = PersonIndex::from_tree(&built.root);
        assert_eq!(idx.total(), built.root.size());
        assert!(idx.get(3).is_none());
    }

    #[test]
    fn test_unknown_id_is_none() {
        assert!(pandey_index().get(404).is_none());
    }

    #[test]
    fn test_siblings_and_children() {
        let idx = pandey_index();
        let rahul = idx.get(5).unwrap();
        assert_eq!(names(&idx.siblings(rahul)), vec!["Siddharth Pandey"]);
        assert_eq!(
            names(&idx.children(rahul)),
            vec!["Anvesha Pandey", "Vinod Pandey"]
        );
        assert!(idx.siblings(idx.root().unwrap()).is_empty());
    }

    #[test]
    fn test_ancestor_path_and_ancestors() {
        let idx = pandey_index();
        let mahi = idx.get(11).unwrap();
        let path: Vec<PersonId> = idx.ancestor_path(mahi).iter().map(|p| p.id).collect();
        assert_eq!(path, vec![11, 9, 5, 2, 1]);
        let anc: Vec<PersonId> = idx.ancestors(mahi).iter().map(|p| p.id).collect();
        assert_eq!(anc, vec![1, 2, 5, 9]);
    }

    #[test]
    fn test_descendants_pre_order() {
        let idx = pandey_index();
        let ramdatt = idx.get(2).unwrap();
        let ids: Vec<PersonId> = idx.descendants(ramdatt).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 8, 9, 11, 6]);
        assert!(idx.descendants(idx.get(12).unwrap()).is_empty());
    }

    #[test]
    fn test_find_by_name_either_script() {
        let idx = pandey_index();
        assert_eq!(idx.find_by_name("तारा पाण्डेय").unwrap().id, 4);
        assert_eq!(idx.find_by_name("Tara Pandey").unwrap().id, 4);
        assert!(idx.find_by_name("Tara").is_none());
    }

    #[test]
    fn test_extended_lineage() {
        let idx = pandey_index();
        let ids = idx.extended_lineage(9);
        // self + ancestors, then sibling sets, then descendants
        assert_eq!(ids, vec![9, 5, 2, 1, 8, 6, 3, 4, 11]);
        assert!(idx.extended_lineage(404).is_empty());
    }

    #[test]
    fn test_flatten_round_trip_keeps_structure() {
        let idx = pandey_index();
        let flat = idx.flatten();
        let ids: Vec<PersonId> = flat.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());

        let rebuilt = PersonIndex::from_tree(&build_tree(&flat).unwrap().root);
        for p in idx.persons() {
            let q = rebuilt.get(p.id).unwrap();
            assert_eq!(p.parent, q.parent);
            assert_eq!(p.children, q.children);
        }
        assert_eq!(rebuilt.flatten(), flat);
    }
}
