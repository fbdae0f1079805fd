//! Owner of the record list and the index built from it.
//!
//! The index is never patched in place. Every change to the records
//! triggers a full rebuild, and a failed rebuild leaves the store without
//! an index so queries refuse instead of answering from stale data.

use tracing::{info, warn};
use vanshavali_types::{PersonId, PersonRecord};

use crate::error::{LineageError, Result};
use crate::fuzzy::find_best_match;
use crate::index::{IndexedPerson, PersonIndex};
use crate::tree::{BuildDiagnostics, build_tree};

/// Input for appending a member under an existing parent.
#[derive(Debug, Clone, Default)]
pub struct NewMember {
    pub parent: PersonId,
    pub name: String,
    pub name_en: Option<String>,
    pub birth_year: Option<i32>,
}

#[derive(Debug, Default)]
pub struct FamilyTree {
    records: Vec<PersonRecord>,
    index: Option<PersonIndex>,
    diagnostics: BuildDiagnostics,
}

impl FamilyTree {
    /// Build a store from records. An empty list yields a store whose
    /// queries fail with [`LineageError::NotIndexed`].
    pub fn from_records(records: Vec<PersonRecord>) -> Self {
        let mut tree = FamilyTree::default();
        if let Err(e) = tree.rebuild(records) {
            warn!(error = %e, "family tree left unindexed");
        }
        tree
    }

    /// Replace the records and rebuild the index from scratch.
    pub fn rebuild(&mut self, records: Vec<PersonRecord>) -> Result<()> {
        self.records = records;
        match build_tree(&self.records) {
            Ok(build) => {
                let index = PersonIndex::from_tree(&build.root);
                info!(
                    members = index.total(),
                    generations = index.max_generation(),
                    "family tree indexed"
                );
                self.index = Some(index);
                self.diagnostics = build.diagnostics;
                Ok(())
            }
            Err(e) => {
                self.index = None;
                self.diagnostics = BuildDiagnostics::default();
                Err(e)
            }
        }
    }

    pub fn index(&self) -> Result<&PersonIndex> {
        self.index.as_ref().ok_or(LineageError::NotIndexed)
    }

    pub fn diagnostics(&self) -> &BuildDiagnostics {
        &self.diagnostics
    }

    /// The flat list as loaded or edited, for saving and export.
    pub fn records(&self) -> &[PersonRecord] {
        &self.records
    }

    /// One past the highest id among all records, indexed or not.
    pub fn next_id(&self) -> PersonId {
        self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    /// Append a child of `member.parent` and rebuild. Returns the new id
    /// from [`FamilyTree::next_id`].
    pub fn add_member(&mut self, member: NewMember) -> Result<PersonId> {
        let name = member.name.trim();
        if name.is_empty() {
            return Err(LineageError::InvalidMember(
                "native name is required".to_string(),
            ));
        }
        let parent = self.index()?.get(member.parent).ok_or_else(|| {
            LineageError::InvalidMember(format!("parent {} does not exist", member.parent))
        })?;

        let id = self.next_id();
        let record = PersonRecord {
            id,
            name: name.to_string(),
            name_en: member
                .name_en
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            birth_year: member.birth_year,
            generation: parent.generation + 1,
            parent_id: Some(parent.id),
        };
        info!(id, name = %record.name, parent = parent.id, "adding family member");

        let mut records = std::mem::take(&mut self.records);
        records.push(record);
        self.rebuild(records)?;
        Ok(id)
    }

    /// Resolve a user-supplied reference: numeric id, then exact native or
    /// romanized name, then the fuzzy matcher.
    pub fn lookup(&self, query: &str) -> Result<&IndexedPerson> {
        let index = self.index()?;
        let query = query.trim();
        query
            .parse::<PersonId>()
            .ok()
            .and_then(|id| index.get(id))
            .or_else(|| index.find_by_name(query))
            .or_else(|| find_best_match(index, query))
            .ok_or_else(|| LineageError::UnknownPerson(query.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{pandey_records, record};

    fn member(parent: PersonId, name: &str) -> NewMember {
        NewMember {
            parent,
            name: name.to_string(),
            ..NewMember::default()
        }
    }

    #[test]
    fn test_from_records_indexes() {
        let tree = FamilyTree::from_records(pandey_records());
        assert_eq!(tree.index().unwrap().total(), 12);
        assert!(!tree.diagnostics().is_suspect());
        assert_eq!(tree.records().len(), 12);
    }

    #[test]
    fn test_empty_input_refuses_queries() {
        let tree = FamilyTree::from_records(Vec::new());
        assert!(matches!(tree.index(), Err(LineageError::NotIndexed)));

        let mut tree = FamilyTree::from_records(pandey_records());
        assert!(matches!(
            tree.rebuild(Vec::new()),
            Err(LineageError::EmptyInput)
        ));
        assert!(matches!(tree.index(), Err(LineageError::NotIndexed)));
        assert!(matches!(
            tree.lookup("rahul"),
            Err(LineageError::NotIndexed)
        ));
    }

    #[test]
    fn test_add_member_assigns_next_id_and_generation() {
        let mut tree = FamilyTree::from_records(pandey_records());
        let id = tree
            .add_member(NewMember {
                parent: 12,
                name: " आरव पाण्डेय ".to_string(),
                name_en: Some("Aarav Pandey".to_string()),
                birth_year: Some(2010),
            })
            .unwrap();
        assert_eq!(id, 13);

        let idx = tree.index().unwrap();
        let added = idx.get(13).unwrap();
        assert_eq!(added.name, "आरव पाण्डेय");
        assert_eq!(added.generation, 6);
        assert_eq!(idx.parent(added).unwrap().id, 12);
        assert_eq!(idx.total(), 13);
        assert_eq!(idx.max_generation(), 6);
        assert_eq!(tree.records().last().unwrap().parent_id, Some(12));
    }

    #[test]
    fn test_add_member_counts_unreachable_ids() {
        let mut recs = pandey_records();
        recs.push(record(40, "भटका", None, None, 3, Some(99)));
        let mut tree = FamilyTree::from_records(recs);
        assert!(tree.diagnostics().is_suspect());
        assert_eq!(tree.add_member(member(1, "नया")).unwrap(), 41);
    }

    #[test]
    fn test_next_id_skips_ids_held_by_unreachable_records() {
        let mut recs = pandey_records();
        recs.push(record(13, "भटका", None, None, 3, Some(99)));
        let mut tree = FamilyTree::from_records(recs);
        assert!(tree.index().unwrap().get(13).is_none());
        assert_eq!(tree.next_id(), 14);

        let id = tree.add_member(member(5, "नया")).unwrap();
        assert_eq!(id, 14);
        assert!(tree.diagnostics().duplicate_ids.is_empty());
        assert_eq!(tree.index().unwrap().get(14).unwrap().name, "नया");
    }

    #[test]
    fn test_add_member_validation() {
        let mut tree = FamilyTree::from_records(pandey_records());
        assert!(matches!(
            tree.add_member(member(1, "   ")),
            Err(LineageError::InvalidMember(_))
        ));
        assert!(matches!(
            tree.add_member(member(404, "नया")),
            Err(LineageError::InvalidMember(_))
        ));
        assert_eq!(tree.records().len(), 12);
    }

    #[test]
    fn test_blank_romanized_name_is_dropped() {
        let mut tree = FamilyTree::from_records(pandey_records());
        let id = tree
            .add_member(NewMember {
                name_en: Some("  ".to_string()),
                ..member(5, "नया")
            })
            .unwrap();
        assert_eq!(tree.index().unwrap().get(id).unwrap().name_en, None);
    }

    #[test]
    fn test_lookup_order() {
        let tree = FamilyTree::from_records(pandey_records());
        assert_eq!(tree.lookup("7").unwrap().id, 7);
        assert_eq!(tree.lookup("Tara Pandey").unwrap().id, 4);
        assert_eq!(tree.lookup("सुरेश पाण्डेय").unwrap().id, 10);
        assert_eq!(tree.lookup("siddarth").unwrap().id, 6);
        assert!(matches!(
            tree.lookup("zzzz"),
            Err(LineageError::UnknownPerson(_))
        ));
    }
}
