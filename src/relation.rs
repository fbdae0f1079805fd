//! Kinship between two indexed persons.
//!
//! Both ancestor paths are walked from the root until they diverge; the
//! last shared node is the lowest common ancestor (LCA). The distances of
//! each person from the LCA, the gender of the second person and (for
//! paternal uncles) relative birth years pick the kinship term.

use vanshavali_types::PersonId;

use crate::gender::{Gender, GenderClassifier};
use crate::index::{IndexedPerson, PersonIndex};
use crate::phrases::{Language, Phrasebook};

// ── Kinship terms ────────────────────────────────────────────────────

/// Age of a paternal uncle relative to the father on the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UncleAge {
    /// Born before the father (ताऊ).
    Elder,
    /// Born after the father (चाचा).
    Younger,
    /// A birth year is missing or equal.
    Unknown,
}

/// What person B is to person A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kinship {
    Child(Gender),
    Grandchild(Gender),
    GreatGrandchild(Gender),
    Descendant,
    Parent(Gender),
    Grandparent(Gender),
    GreatGrandparent(Gender),
    Ancestor,
    Sibling(Gender),
    Cousin(Gender),
    /// Father's sister. Not split by age.
    Aunt,
    Uncle(UncleAge),
    NieceNephew(Gender),
    /// Two generations up on a collateral line.
    GrandparentByRelation(Gender),
    /// Two generations down on a collateral line.
    GrandchildByRelation(Gender),
    DistantRelative,
}

impl Kinship {
    pub fn label(self, language: Language) -> &'static str {
        use Gender::{Female as F, Male as M};
        use Kinship::*;
        match language {
            Language::Hindi => match self {
                Child(M) => "बेटा",
                Child(F) => "बेटी",
                Grandchild(M) => "पोता",
                Grandchild(F) => "पोती",
                GreatGrandchild(M) => "परपोता",
                GreatGrandchild(F) => "परपोती",
                Descendant => "वंशज",
                Parent(M) => "पिता",
                Parent(F) => "माता",
                Grandparent(M) => "दादा",
                Grandparent(F) => "दादी",
                GreatGrandparent(M) => "परदादा",
                GreatGrandparent(F) => "परदादी",
                Ancestor => "पूर्वज",
                Sibling(M) => "भाई",
                Sibling(F) => "बहन",
                Cousin(M) => "चचेरा भाई",
                Cousin(F) => "चचेरी बहन",
                Aunt => "बुआ",
                Uncle(UncleAge::Elder) => "ताऊ",
                Uncle(UncleAge::Younger) => "चाचा",
                Uncle(UncleAge::Unknown) => "चाचा / ताऊ",
                NieceNephew(M) => "भतीजा",
                NieceNephew(F) => "भतीजी",
                GrandparentByRelation(M) => "दादा (रिश्ते में)",
                GrandparentByRelation(F) => "दादी (रिश्ते में)",
                GrandchildByRelation(M) => "पोता (रिश्ते में)",
                GrandchildByRelation(F) => "पोती (रिश्ते में)",
                DistantRelative => "दूर के रिश्तेदार",
            },
            Language::English => match self {
                Child(M) => "son",
                Child(F) => "daughter",
                Grandchild(M) => "grandson",
                Grandchild(F) => "granddaughter",
                GreatGrandchild(M) => "great-grandson",
                GreatGrandchild(F) => "great-granddaughter",
                Descendant => "descendant",
                Parent(M) => "father",
                Parent(F) => "mother",
                Grandparent(M) => "grandfather",
                Grandparent(F) => "grandmother",
                GreatGrandparent(M) => "great-grandfather",
                GreatGrandparent(F) => "great-grandmother",
                Ancestor => "ancestor",
                Sibling(M) => "brother",
                Sibling(F) => "sister",
                Cousin(M) => "cousin brother",
                Cousin(F) => "cousin sister",
                Aunt => "paternal aunt",
                Uncle(UncleAge::Elder) => "elder paternal uncle",
                Uncle(UncleAge::Younger) => "younger paternal uncle",
                Uncle(UncleAge::Unknown) => "paternal uncle",
                NieceNephew(M) => "nephew",
                NieceNephew(F) => "niece",
                GrandparentByRelation(M) => "grandfather (by relation)",
                GrandparentByRelation(F) => "grandmother (by relation)",
                GrandchildByRelation(M) => "grandson (by relation)",
                GrandchildByRelation(F) => "granddaughter (by relation)",
                DistantRelative => "distant relative",
            },
        }
    }
}

// ── Result ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipResult {
    SamePerson,
    /// The two ancestor paths share no root.
    NoRelation,
    Related {
        lca: PersonId,
        /// Steps from A up to the LCA (0 when A is the LCA).
        dist_a: usize,
        /// Steps from B up to the LCA.
        dist_b: usize,
        kinship: Kinship,
        /// `B.generation - A.generation`, as recorded.
        generation_gap: i64,
    },
}

// ── Engine ───────────────────────────────────────────────────────────

/// Last shared id of two `[self, …, root]` paths, walking from the root.
pub fn lowest_common_ancestor(path_a: &[PersonId], path_b: &[PersonId]) -> Option<PersonId> {
    path_a
        .iter()
        .rev()
        .zip(path_b.iter().rev())
        .take_while(|(a, b)| a == b)
        .last()
        .map(|(a, _)| *a)
}

/// Relate two persons by id. `None` when either id is not indexed.
pub fn relate_ids(
    index: &PersonIndex,
    classifier: &dyn GenderClassifier,
    a: PersonId,
    b: PersonId,
) -> Option<RelationshipResult> {
    let a = index.get(a)?;
    let b = index.get(b)?;
    Some(relate(index, classifier, a, b))
}

/// What `b` is to `a`.
pub fn relate(
    index: &PersonIndex,
    classifier: &dyn GenderClassifier,
    a: &IndexedPerson,
    b: &IndexedPerson,
) -> RelationshipResult {
    if a.id == b.id {
        return RelationshipResult::SamePerson;
    }

    let path_a = index.ancestor_path(a);
    let path_b = index.ancestor_path(b);
    let ids_a: Vec<PersonId> = path_a.iter().map(|p| p.id).collect();
    let ids_b: Vec<PersonId> = path_b.iter().map(|p| p.id).collect();

    let Some(lca) = lowest_common_ancestor(&ids_a, &ids_b) else {
        return RelationshipResult::NoRelation;
    };
    let dist_a = ids_a.iter().position(|id| *id == lca).unwrap_or(0);
    let dist_b = ids_b.iter().position(|id| *id == lca).unwrap_or(0);

    // A's ancestor one step below the LCA: the father on the path when B
    // is an uncle.
    let a_side_elder = dist_a.checked_sub(1).map(|i| path_a[i]);
    let kinship = classify(dist_a, dist_b, classifier.classify(b), b, a_side_elder);

    RelationshipResult::Related {
        lca,
        dist_a,
        dist_b,
        kinship,
        generation_gap: i64::from(b.generation) - i64::from(a.generation),
    }
}

fn classify(
    dist_a: usize,
    dist_b: usize,
    gender_b: Gender,
    b: &IndexedPerson,
    a_side_elder: Option<&IndexedPerson>,
) -> Kinship {
    if dist_a == 0 {
        return match dist_b {
            1 => Kinship::Child(gender_b),
            2 => Kinship::Grandchild(gender_b),
            3 => Kinship::GreatGrandchild(gender_b),
            _ => Kinship::Descendant,
        };
    }
    if dist_b == 0 {
        return match dist_a {
            1 => Kinship::Parent(gender_b),
            2 => Kinship::Grandparent(gender_b),
            3 => Kinship::GreatGrandparent(gender_b),
            _ => Kinship::Ancestor,
        };
    }

    let gap = dist_b as i64 - dist_a as i64;
    match gap {
        0 if dist_a == 1 => Kinship::Sibling(gender_b),
        0 => Kinship::Cousin(gender_b),
        -1 if gender_b.is_female() => Kinship::Aunt,
        -1 => Kinship::Uncle(uncle_age(b, a_side_elder)),
        1 => Kinship::NieceNephew(gender_b),
        -2 => Kinship::GrandparentByRelation(gender_b),
        2 => Kinship::GrandchildByRelation(gender_b),
        _ => Kinship::DistantRelative,
    }
}

fn uncle_age(uncle: &IndexedPerson, father: Option<&IndexedPerson>) -> UncleAge {
    match (uncle.birth_year, father.and_then(|f| f.birth_year)) {
        (Some(u), Some(f)) if u < f => UncleAge::Elder,
        (Some(u), Some(f)) if u > f => UncleAge::Younger,
        _ => UncleAge::Unknown,
    }
}

// ── Presentation ─────────────────────────────────────────────────────

/// "B is A's <label>" plus a line naming the common ancestor and the
/// generation gap.
pub fn describe_relation(
    index: &PersonIndex,
    phrases: &Phrasebook,
    a: &IndexedPerson,
    b: &IndexedPerson,
    result: &RelationshipResult,
) -> String {
    match *result {
        RelationshipResult::SamePerson => phrases.same_person(),
        RelationshipResult::NoRelation => phrases.no_relation(),
        RelationshipResult::Related {
            lca,
            kinship,
            generation_gap,
            ..
        } => {
            let sentence = phrases.relation(
                phrases.name_of(a),
                phrases.name_of(b),
                kinship.label(phrases.language),
            );
            let lca_name = index.get(lca).map_or("", |p| phrases.name_of(p));
            format!("{sentence}\n{}", phrases.relation_path(lca_name, generation_gap))
        }
    }
}
