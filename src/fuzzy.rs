//! Typo-tolerant name matching over the person index.
//!
//! [`find_best_match`] backs the query resolver: it picks one person out
//! of free text. [`search`] and [`autocomplete`] rank or list candidates
//! for interactive lookups. All lengths are counted in `char`s so
//! Devanagari and Latin names score alike.

use std::str::FromStr;

use crate::index::{IndexedPerson, PersonIndex};

/// Minimum token length considered for partial and edit-distance matching.
const MIN_TOKEN_CHARS: usize = 3;
/// Edit-distance similarity must exceed this to count at all.
const TYPO_SIMILARITY: f64 = 0.7;
/// The best candidate is returned only above this score.
const ACCEPT_SCORE: f64 = 0.5;

pub const AUTOCOMPLETE_LIMIT: usize = 10;

// ── Edit distance ────────────────────────────────────────────────────

/// Minimum single-character inserts, deletes and substitutions turning
/// `a` into `b`.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `1 - distance / longer length`, in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

// ── Best match for free text ─────────────────────────────────────────

/// A query word without surrounding punctuation or an English possessive
/// (`mahi's?` → `mahi`).
pub(crate) fn bare_token(token: &str) -> &str {
    let token = token.trim_matches(|c: char| c.is_ascii_punctuation() || matches!(c, '।' | '॥'));
    token
        .strip_suffix("'s")
        .or_else(|| token.strip_suffix("’s"))
        .unwrap_or(token)
}

/// Pick the person the text most likely names.
///
/// A person whose full native or romanized name occurs in the text is
/// returned at once. Otherwise every person is scored by partial token
/// containment and by per-token edit distance against each name part, and
/// the best one is returned if it scores above 0.5. Ties go to the lower id.
pub fn find_best_match<'a>(index: &'a PersonIndex, text: &str) -> Option<&'a IndexedPerson> {
    let text = text.to_lowercase();
    let tokens: Vec<&str> = text
        .split_whitespace()
        .map(bare_token)
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .collect();

    let mut best: Option<&IndexedPerson> = None;
    let mut highest = 0.0_f64;

    for person in index.persons() {
        let native = person.name.to_lowercase();
        let roman = person.name_en_or_empty().to_lowercase();

        if (!native.is_empty() && text.contains(&native))
            || (!roman.is_empty() && text.contains(&roman))
        {
            return Some(person);
        }

        let name_len = native.chars().count().max(roman.chars().count());
        let parts: Vec<&str> = native
            .split_whitespace()
            .chain(roman.split_whitespace())
            .filter(|p| p.chars().count() >= MIN_TOKEN_CHARS)
            .collect();

        for token in &tokens {
            if native.contains(token) || roman.contains(token) {
                let score = token.chars().count() as f64 / name_len as f64;
                if score > highest {
                    highest = score;
                    best = Some(person);
                }
            }

            for part in &parts {
                let sim = similarity(token, part);
                if sim > TYPO_SIMILARITY && sim > highest {
                    highest = sim;
                    best = Some(person);
                }
            }
        }
    }

    if highest > ACCEPT_SCORE { best } else { None }
}

// ── Ranked search ────────────────────────────────────────────────────

/// Which fields a ranked search looks at besides the person's own name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchFilter {
    #[default]
    All,
    Name,
    Father,
    Year,
}

impl FromStr for SearchFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "name" => Ok(Self::Name),
            "father" => Ok(Self::Father),
            "year" => Ok(Self::Year),
            other => Err(format!(
                "unknown filter '{other}' (expected all, name, father or year)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub person: &'a IndexedPerson,
    pub score: u32,
}

/// Score every person against `query` and return the positive hits, best
/// first.
///
/// Own name: exact 100, prefix 50, substring 25. Father's name (filters
/// `All`/`Father`): exact 80, substring 20. Birth year digits (filters
/// `All`/`Year`): exact 90, substring 30.
pub fn search<'a>(index: &'a PersonIndex, query: &str, filter: SearchFilter) -> Vec<SearchHit<'a>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let digits: String = query.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut hits: Vec<SearchHit<'a>> = index
        .persons()
        .filter_map(|person| {
            let score = score_person(index, person, &query, &digits, filter);
            (score > 0).then_some(SearchHit { person, score })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}

fn score_person(
    index: &PersonIndex,
    person: &IndexedPerson,
    query: &str,
    digits: &str,
    filter: SearchFilter,
) -> u32 {
    let mut score = 0;

    let names = [person.name.to_lowercase(), person.name_en_or_empty().to_lowercase()];
    let names = names.iter().filter(|n| !n.is_empty());
    if names.clone().any(|n| n == query) {
        score += 100;
    } else if names.clone().any(|n| n.starts_with(query)) {
        score += 50;
    } else if names.clone().any(|n| n.contains(query)) {
        score += 25;
    }

    if matches!(filter, SearchFilter::All | SearchFilter::Father)
        && let Some(parent) = index.parent(person)
    {
        let parent_name = parent.name.to_lowercase();
        if parent_name == query {
            score += 80;
        } else if parent_name.contains(query) {
            score += 20;
        }
    }

    if matches!(filter, SearchFilter::All | SearchFilter::Year)
        && !digits.is_empty()
        && let Some(year) = person.birth_year
    {
        let year = year.to_string();
        if year == digits {
            score += 90;
        } else if year.contains(digits) {
            score += 30;
        }
    }

    score
}

// ── Autocomplete ─────────────────────────────────────────────────────

/// Persons whose own or father's name (either script) contains `input`,
/// in id order, at most `limit`.
pub fn autocomplete<'a>(index: &'a PersonIndex, input: &str, limit: usize) -> Vec<&'a IndexedPerson> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return Vec::new();
    }
    let hit = |p: &IndexedPerson| {
        p.name.to_lowercase().contains(&input) || p.name_en_or_empty().to_lowercase().contains(&input)
    };

    index
        .persons()
        .filter(|&p| hit(p) || index.parent(p).is_some_and(hit))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{pandey_index, record};
    use crate::tree::build_tree;

    fn best(idx: &PersonIndex, text: &str) -> Option<u32> {
        find_best_match(idx, text).map(|p| p.id)
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("rahul", "rahul"), 0);
        assert_eq!(levenshtein("राहुल", "राहल"), 1);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert!((similarity("vinod", "vinot") - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_full_name_short_circuits() {
        let idx = pandey_index();
        assert_eq!(best(&idx, "rahul pandey ke pita kaun hain"), Some(5));
        assert_eq!(best(&idx, "सिद्धार्थ पाण्डेय को दिखाओ"), Some(6));
    }

    #[test]
    fn test_full_name_wins_over_closer_looking_candidate() {
        // "mohan" is a perfect token for persons 1 and 2, but person 3's
        // full name appears verbatim and must win.
        let recs = vec![
            record(1, "मूल", Some("Mohan Lal"), None, 1, None),
            record(2, "अ", Some("Mohan Sharma"), None, 2, Some(1)),
            record(3, "ब", Some("Moh"), None, 2, Some(1)),
        ];
        let idx = PersonIndex::from_tree(&build_tree(&recs).unwrap().root);
        assert_eq!(best(&idx, "where is mohan"), Some(3));
    }

    #[test]
    fn test_first_name_token_matches_exactly() {
        let idx = pandey_index();
        assert_eq!(best(&idx, "vinod ke bachche"), Some(9));
        assert_eq!(best(&idx, "राहुल के पिता कौन हैं"), Some(5));
    }

    #[test]
    fn test_single_typo_still_resolves() {
        let idx = pandey_index();
        assert_eq!(best(&idx, "who is siddarth"), Some(6));
        assert_eq!(best(&idx, "show suresj"), Some(10));
        assert_eq!(best(&idx, "anvesa"), Some(8));
    }

    #[test]
    fn test_possessive_and_punctuation_are_stripped() {
        assert_eq!(bare_token("mahi's"), "mahi");
        assert_eq!(bare_token("tara’s"), "tara");
        assert_eq!(bare_token("siblings?"), "siblings");
        assert_eq!(bare_token("राहुल।"), "राहुल");
        let idx = pandey_index();
        assert_eq!(best(&idx, "who are mahi's grandfather's siblings?"), Some(11));
        assert_eq!(best(&idx, "who is tara's father"), Some(4));
        assert_eq!(best(&idx, "vinod?"), Some(9));
    }

    #[test]
    fn test_unrelated_text_matches_nobody() {
        let idx = pandey_index();
        assert_eq!(best(&idx, "what is the weather"), None);
        assert_eq!(best(&idx, "hi"), None);
    }

    #[test]
    fn test_search_scoring() {
        let idx = pandey_index();
        let hits = search(&idx, "Tara Pandey", SearchFilter::All);
        assert_eq!(hits[0].person.id, 4);
        assert_eq!(hits[0].score, 100);

        let hits = search(&idx, "राहुल", SearchFilter::All);
        let ids: Vec<(u32, u32)> = hits.iter().map(|h| (h.person.id, h.score)).collect();
        // Rahul himself by prefix, then his children through their father
        assert_eq!(ids, vec![(5, 50), (8, 20), (9, 20)]);

        let hits = search(&idx, "राहुल", SearchFilter::Name);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_search_by_year() {
        let idx = pandey_index();
        let hits = search(&idx, "1950", SearchFilter::Year);
        assert_eq!(hits.len(), 1);
        assert_eq!((hits[0].person.id, hits[0].score), (8, 90));

        let hits = search(&idx, "195", SearchFilter::Year);
        let ids: Vec<u32> = hits.iter().map(|h| h.person.id).collect();
        assert_eq!(ids, vec![8, 9]);
        assert!(search(&idx, "   ", SearchFilter::All).is_empty());
    }

    #[test]
    fn test_autocomplete_includes_fathers_name() {
        let idx = pandey_index();
        let ids: Vec<u32> = autocomplete(&idx, "vinod", AUTOCOMPLETE_LIMIT)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![9, 11]);
        assert_eq!(autocomplete(&idx, "pandey", 3).len(), 3);
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("Father".parse::<SearchFilter>(), Ok(SearchFilter::Father));
        assert!("mother".parse::<SearchFilter>().is_err());
    }
}
