//! Free-text question answering over the person index.
//!
//! A question goes through three ordered rule tables, first match wins:
//!
//! 1. general rules that need no person (birth-year listing, member and
//!    generation counts, oldest member);
//! 2. person rules, once a target person is known, either named in the
//!    text (fuzzy match) or carried over from the previous turn through a
//!    pronoun;
//! 3. fallback rules when no person could be resolved.
//!
//! Matching is keyword based over Devanagari, English and romanized Hindi.
//! The resolver never fails: unmatched text gets a fallback answer.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use vanshavali_types::PersonId;

use crate::fuzzy::{bare_token, find_best_match};
use crate::gender::GenderClassifier;
use crate::index::{IndexedPerson, PersonIndex};
use crate::phrases::{Language, Phrasebook, join_names};

// ── Collaborators and session state ──────────────────────────────────

/// Display hook for "show X" questions. Without one, the answer is text only.
pub trait Spotlight {
    fn show(&self, id: PersonId);
}

/// Conversation state carried between turns: the last person resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    pub person: Option<PersonId>,
}

// ── Keyword tables ───────────────────────────────────────────────────

const BIRTH_WORDS: &[&str] = &[
    "जन्म", "पैदा", "साल", "वर्ष", "born", "birth", "paida", "janm", "janam", "saal", "varsh",
];
const TOTAL_WORDS: &[&str] = &[
    "कुल सदस्य", "कितने लोग", "कितने सदस्य", "total members", "how many members",
];
const GENERATION_WORDS: &[&str] = &[
    "पीढ़ियां", "पीढ़ी", "how many generations", "max generation",
];
const OLDEST_WORDS: &[&str] = &["सबसे बुजुर्ग", "सबसे पुराने", "oldest"];

const PRONOUNS: &[&str] = &[
    "उनके", "उनका", "उनकी", "उनको", "उसका", "उसकी", "उसे", "वह", "वे", "his", "her", "he", "she",
    "him", "they", "their", "them", "unke", "unka", "unki", "uska", "uski", "woh",
];

const SHOW_WORDS: &[&str] = &["दिखाओ", "कहाँ है", "show", "find", "locate", "where is", "dikhao"];
const DESCENDANT_WORDS: &[&str] = &[
    "वंशज", "सभी बच्चे", "आगे की पीढ़ी", "descendants", "vanshaj",
];
const GRANDFATHER_WORDS: &[&str] = &["दादा", "grandfather", "dada"];
const SIBLING_WORDS: &[&str] = &["भाई", "कौन हैं", "sibling", "brother", "bhai"];
const CHILDREN_WORDS: &[&str] = &["बच्चे", "संतान", "children", "bachche", "bacche", "santan"];
const FATHER_WORDS: &[&str] = &["पिता", "father", "parents", "pita"];
const BIRTH_YEAR_WORDS: &[&str] = &["जन्म", "पैदा", "born", "year", "janm", "paida"];
const BIOGRAPHY_WORDS: &[&str] = &["कौन", "के बारे में", "who", "about", "kaun"];
const HELP_WORDS: &[&str] = &["महत्व", "सहायता", "क्या कर सकते", "help"];

/// A 19xx/20xx number standing on its own.
static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9A-Za-z_])((?:19|20)[0-9]{2})(?:$|[^0-9A-Za-z_])").expect("year regex")
});

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn extract_year(text: &str) -> Option<i32> {
    RE_YEAR
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn uses_pronoun(text: &str) -> bool {
    text.split_whitespace()
        .map(bare_token)
        .any(|t| PRONOUNS.contains(&t))
}

// ── Rule tables ──────────────────────────────────────────────────────

struct Rule<H> {
    name: &'static str,
    applies: fn(&str) -> bool,
    answer: H,
}

type GeneralHandler = fn(&Resolver<'_>, &str, &mut Context) -> String;
type PersonHandler = fn(&Resolver<'_>, &str, &IndexedPerson) -> String;
type FallbackHandler = fn(&Resolver<'_>, &str) -> String;

const GENERAL_RULES: &[Rule<GeneralHandler>] = &[
    Rule {
        name: "birth_year_listing",
        applies: |t| extract_year(t).is_some() && contains_any(t, BIRTH_WORDS),
        answer: answer_born_in_year,
    },
    Rule {
        name: "total_members",
        applies: |t| contains_any(t, TOTAL_WORDS),
        answer: |r, _, _| r.phrases.total_members(r.index.total()),
    },
    Rule {
        name: "generation_count",
        applies: |t| contains_any(t, GENERATION_WORDS),
        answer: |r, _, _| r.phrases.generations(r.index.max_generation()),
    },
    Rule {
        name: "oldest_member",
        applies: |t| contains_any(t, OLDEST_WORDS),
        answer: answer_oldest,
    },
];

const PERSON_RULES: &[Rule<PersonHandler>] = &[
    Rule {
        name: "show",
        applies: |t| contains_any(t, SHOW_WORDS),
        answer: answer_show,
    },
    Rule {
        name: "descendants",
        applies: |t| contains_any(t, DESCENDANT_WORDS),
        answer: answer_descendants,
    },
    Rule {
        name: "grandfather",
        applies: |t| contains_any(t, GRANDFATHER_WORDS),
        answer: answer_grandfather,
    },
    Rule {
        name: "children",
        applies: |t| contains_any(t, CHILDREN_WORDS),
        answer: answer_children,
    },
    Rule {
        name: "father",
        applies: |t| contains_any(t, FATHER_WORDS),
        answer: answer_father,
    },
    Rule {
        name: "birth_year",
        applies: |t| contains_any(t, BIRTH_YEAR_WORDS),
        answer: |r, _, p| r.phrases.birth_year(&r.display_name(p), p.birth_year),
    },
    Rule {
        name: "biography",
        applies: |t| contains_any(t, BIOGRAPHY_WORDS),
        answer: answer_biography,
    },
    Rule {
        name: "what_about",
        applies: |_| true,
        answer: |r, _, p| r.phrases.what_about(&r.display_name(p)),
    },
];

const FALLBACK_RULES: &[Rule<FallbackHandler>] = &[
    Rule {
        name: "help",
        applies: |t| contains_any(t, HELP_WORDS),
        answer: |r, _| r.phrases.help(),
    },
    Rule {
        name: "too_short",
        applies: |t| t.chars().count() < 3,
        answer: |r, _| r.phrases.elaborate(),
    },
    Rule {
        name: "unknown",
        applies: |_| true,
        answer: |r, _| r.phrases.dont_know(),
    },
];

fn first_match<'r, H>(rules: &'r [Rule<H>], text: &str) -> Option<&'r Rule<H>> {
    rules.iter().find(|rule| (rule.applies)(text))
}

// ── Resolver ─────────────────────────────────────────────────────────

pub struct Resolver<'a> {
    index: &'a PersonIndex,
    phrases: Phrasebook,
    classifier: &'a dyn GenderClassifier,
    spotlight: Option<&'a dyn Spotlight>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        index: &'a PersonIndex,
        language: Language,
        classifier: &'a dyn GenderClassifier,
    ) -> Self {
        Resolver {
            index,
            phrases: Phrasebook::new(language),
            classifier,
            spotlight: None,
        }
    }

    pub fn with_spotlight(mut self, spotlight: &'a dyn Spotlight) -> Self {
        self.spotlight = Some(spotlight);
        self
    }

    /// Answer one utterance. Returns the answer and the context for the
    /// next turn: whoever the utterance named, else the carried-over person.
    pub fn resolve(&self, utterance: &str, context: Context) -> (String, Context) {
        let text = utterance.trim().to_lowercase();
        let mut context = context;

        if let Some(rule) = first_match(GENERAL_RULES, &text) {
            debug!(intent = rule.name, "general question");
            return ((rule.answer)(self, &text, &mut context), context);
        }

        let target = match find_best_match(self.index, &text) {
            Some(person) => {
                context.person = Some(person.id);
                Some(person)
            }
            None if uses_pronoun(&text) => context.person.and_then(|id| self.index.get(id)),
            None => None,
        };

        let answer = match target {
            Some(person) => first_match(PERSON_RULES, &text).map(|rule| {
                debug!(intent = rule.name, person = person.id, "person question");
                (rule.answer)(self, &text, person)
            }),
            None => first_match(FALLBACK_RULES, &text).map(|rule| {
                debug!(intent = rule.name, "no person resolved");
                (rule.answer)(self, &text)
            }),
        };

        (answer.unwrap_or_else(|| self.phrases.dont_know()), context)
    }

    fn display_name(&self, person: &IndexedPerson) -> String {
        self.phrases.name_of(person).to_string()
    }

    fn names_of(&self, people: &[&IndexedPerson]) -> String {
        let names: Vec<String> = people.iter().map(|p| self.display_name(p)).collect();
        join_names(names.iter().map(String::as_str))
    }
}

// ── Handlers ─────────────────────────────────────────────────────────

fn answer_born_in_year(r: &Resolver<'_>, text: &str, _: &mut Context) -> String {
    let Some(year) = extract_year(text) else {
        return r.phrases.dont_know();
    };
    let born: Vec<&IndexedPerson> = r
        .index
        .persons()
        .filter(|p| p.birth_year == Some(year))
        .collect();
    if born.is_empty() {
        r.phrases.nobody_born_in_year(year)
    } else {
        r.phrases.born_in_year(year, &r.names_of(&born))
    }
}

fn answer_oldest(r: &Resolver<'_>, _: &str, context: &mut Context) -> String {
    let oldest = r
        .index
        .persons()
        .filter_map(|p| p.birth_year.map(|y| (p, y)))
        .min_by_key(|(_, y)| *y);
    match oldest {
        Some((person, year)) => {
            context.person = Some(person.id);
            r.phrases.oldest(&r.display_name(person), year)
        }
        None => r.phrases.no_birth_data(),
    }
}

fn answer_show(r: &Resolver<'_>, _: &str, person: &IndexedPerson) -> String {
    let name = r.display_name(person);
    match r.spotlight {
        Some(spotlight) => {
            spotlight.show(person.id);
            r.phrases.showing(&name)
        }
        None => r.phrases.cannot_show(&name, person.generation),
    }
}

fn answer_descendants(r: &Resolver<'_>, _: &str, person: &IndexedPerson) -> String {
    let name = r.display_name(person);
    let all = r.index.descendants(person);
    if all.is_empty() {
        return r.phrases.no_descendants(&name);
    }
    r.phrases.descendants(&name, all.len(), &r.names_of(&all))
}

fn answer_grandfather(r: &Resolver<'_>, text: &str, person: &IndexedPerson) -> String {
    let name = r.display_name(person);
    let grandfather = r.index.parent(person).and_then(|father| r.index.parent(father));
    let Some(grandfather) = grandfather else {
        return r.phrases.grandfather_unknown(&name);
    };
    let gf_name = r.display_name(grandfather);

    if !contains_any(text, SIBLING_WORDS) {
        return r.phrases.grandfather(&name, &gf_name);
    }
    let siblings = r.index.siblings(grandfather);
    if siblings.is_empty() {
        r.phrases.grandfather_no_siblings(&name, &gf_name)
    } else {
        r.phrases
            .grandfather_siblings(&name, &gf_name, &r.names_of(&siblings))
    }
}

fn answer_children(r: &Resolver<'_>, _: &str, person: &IndexedPerson) -> String {
    let name = r.display_name(person);
    let children = r.index.children(person);
    if children.is_empty() {
        return r.phrases.no_children(&name);
    }
    r.phrases.children(&name, children.len(), &r.names_of(&children))
}

fn answer_father(r: &Resolver<'_>, _: &str, person: &IndexedPerson) -> String {
    let name = r.display_name(person);
    match r.index.parent(person) {
        Some(father) => r.phrases.father(&name, &r.display_name(father)),
        None => r.phrases.founding_ancestor(&name),
    }
}

fn answer_biography(r: &Resolver<'_>, _: &str, person: &IndexedPerson) -> String {
    let parent = r.index.parent(person).map(|p| r.display_name(p));
    r.phrases.biography(
        &r.display_name(person),
        person.generation,
        parent.as_deref(),
        r.classifier.classify(person),
        person.children.len(),
    )
}
