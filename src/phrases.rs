//! Answer templates in the configured output language.
//!
//! Every user-facing sentence the engine produces comes from here so the
//! resolver and relationship code stay language-neutral.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::gender::Gender;
use crate::index::IndexedPerson;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Hindi,
    English,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hindi" | "hi" | "हिंदी" => Ok(Language::Hindi),
            "english" | "en" => Ok(Language::English),
            other => Err(format!("unknown language '{other}' (expected hindi or english)")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Hindi => f.write_str("hindi"),
            Language::English => f.write_str("english"),
        }
    }
}

/// Sentence builder for one language.
#[derive(Debug, Clone, Copy, Default)]
pub struct Phrasebook {
    pub language: Language,
}

impl Phrasebook {
    pub fn new(language: Language) -> Self {
        Phrasebook { language }
    }

    /// Native name in Hindi answers, romanized name (when known) in English.
    pub fn name_of<'p>(&self, person: &'p IndexedPerson) -> &'p str {
        match (self.language, person.name_en.as_deref()) {
            (Language::English, Some(en)) if !en.trim().is_empty() => en,
            _ => &person.name,
        }
    }

    fn pick(&self, hindi: String, english: String) -> String {
        match self.language {
            Language::Hindi => hindi,
            Language::English => english,
        }
    }

    // ── Aggregate answers ───────────────────────────────────────────

    pub fn born_in_year(&self, year: i32, names: &str) -> String {
        self.pick(
            format!("वर्ष {year} में इन सदस्यों का जन्म हुआ था: {names}।"),
            format!("These members were born in {year}: {names}."),
        )
    }

    pub fn nobody_born_in_year(&self, year: i32) -> String {
        self.pick(
            format!("क्षमा करें, वर्ष {year} में जन्म लेने वाला कोई भी सदस्य हमारे रिकॉर्ड में नहीं है।"),
            format!("Sorry, no member in our records was born in {year}."),
        )
    }

    pub fn total_members(&self, total: usize) -> String {
        self.pick(
            format!("हमारे परिवार वृक्ष में कुल {total} सदस्य दर्ज हैं।"),
            format!("Our family tree records {total} members in total."),
        )
    }

    pub fn generations(&self, max: u32) -> String {
        self.pick(
            format!("इस परिवार के इतिहास में अब तक कुल {max} पीढ़ियां दर्ज की गई हैं।"),
            format!("{max} generations have been recorded in this family's history so far."),
        )
    }

    pub fn oldest(&self, name: &str, year: i32) -> String {
        self.pick(
            format!("सबसे बुजुर्ग सदस्य {name} हैं, जिनका जन्म वर्ष {year} है।"),
            format!("The oldest member is {name}, born in {year}."),
        )
    }

    pub fn no_birth_data(&self) -> String {
        self.pick(
            "क्षमा करें, मुझे जन्म तिथि का सही डेटा नहीं मिला।".to_string(),
            "Sorry, I could not find reliable birth year data.".to_string(),
        )
    }

    // ── Person answers ──────────────────────────────────────────────

    pub fn showing(&self, name: &str) -> String {
        self.pick(
            format!("बिल्कुल, मैं आपको {name} के पास ले चलता हूँ।"),
            format!("Sure, taking you to {name}."),
        )
    }

    pub fn cannot_show(&self, name: &str, generation: u32) -> String {
        self.pick(
            format!(
                "क्षमा करें, मैं अभी आपको स्क्रीन पर नहीं दिखा पा रहा हूँ, लेकिन {name} पीढ़ी {generation} में हैं।"
            ),
            format!(
                "Sorry, I can't show that on screen right now, but {name} is in generation {generation}."
            ),
        )
    }

    pub fn no_descendants(&self, name: &str) -> String {
        self.pick(
            format!("{name} के कोई वंशज दर्ज नहीं हैं।"),
            format!("No descendants of {name} are recorded."),
        )
    }

    pub fn descendants(&self, name: &str, count: usize, names: &str) -> String {
        self.pick(
            format!("{name} के कुल {count} वंशज हैं: {names}।"),
            format!("{name} has {count} descendants: {names}."),
        )
    }

    pub fn grandfather(&self, name: &str, grandfather: &str) -> String {
        self.pick(
            format!("{name} के दादाजी {grandfather} हैं।"),
            format!("{name}'s grandfather is {grandfather}."),
        )
    }

    pub fn grandfather_siblings(&self, name: &str, grandfather: &str, siblings: &str) -> String {
        self.pick(
            format!("{name} के दादाजी {grandfather} हैं, और उनके भाई ये हैं: {siblings}।"),
            format!("{name}'s grandfather is {grandfather}, and his siblings are: {siblings}."),
        )
    }

    pub fn grandfather_no_siblings(&self, name: &str, grandfather: &str) -> String {
        self.pick(
            format!("{name} के दादाजी ({grandfather}) का कोई भाई दर्ज नहीं है।"),
            format!("No siblings of {name}'s grandfather ({grandfather}) are recorded."),
        )
    }

    pub fn grandfather_unknown(&self, name: &str) -> String {
        self.pick(
            format!("{name} के दादाजी का डेटा उपलब्ध नहीं है।"),
            format!("There is no record of {name}'s grandfather."),
        )
    }

    pub fn no_children(&self, name: &str) -> String {
        self.pick(
            format!("{name} की कोई संतान दर्ज नहीं है।"),
            format!("No children of {name} are recorded."),
        )
    }

    pub fn children(&self, name: &str, count: usize, names: &str) -> String {
        self.pick(
            format!("{name} के {count} बच्चे हैं: {names}।"),
            format!("{name} has {count} children: {names}."),
        )
    }

    pub fn father(&self, name: &str, father: &str) -> String {
        self.pick(
            format!("{name} के पिता {father} हैं।"),
            format!("{name}'s father is {father}."),
        )
    }

    pub fn founding_ancestor(&self, name: &str) -> String {
        self.pick(
            format!("{name} हमारे मूल पूर्वज हैं।"),
            format!("{name} is our founding ancestor."),
        )
    }

    pub fn birth_year(&self, name: &str, year: Option<i32>) -> String {
        match year {
            Some(y) => self.pick(
                format!("{name} का जन्म वर्ष {y} है।"),
                format!("{name} was born in {y}."),
            ),
            None => self.pick(
                format!("{name} का जन्म वर्ष अज्ञात है।"),
                format!("{name}'s birth year is unknown."),
            ),
        }
    }

    /// Short biography: generation, parent (as son/daughter of), child count.
    pub fn biography(
        &self,
        name: &str,
        generation: u32,
        parent: Option<&str>,
        gender: Gender,
        child_count: usize,
    ) -> String {
        let mut parts = Vec::new();
        parts.push(self.pick(
            format!("{name} पीढ़ी {generation} के सदस्य हैं।"),
            format!("{name} is a member of generation {generation}."),
        ));
        if let Some(parent) = parent {
            parts.push(match (self.language, gender) {
                (Language::Hindi, Gender::Male) => format!("वे {parent} के पुत्र हैं।"),
                (Language::Hindi, Gender::Female) => format!("वे {parent} की पुत्री हैं।"),
                (Language::English, Gender::Male) => format!("He is the son of {parent}."),
                (Language::English, Gender::Female) => format!("She is the daughter of {parent}."),
            });
        }
        if child_count > 0 {
            parts.push(self.pick(
                format!("उनके {child_count} बच्चे हैं।"),
                format!("They have {child_count} children."),
            ));
        }
        parts.join(" ")
    }

    pub fn what_about(&self, name: &str) -> String {
        self.pick(
            format!("{name} के बारे में क्या जानना चाहते हैं? (दिखाओ, वंशज, दादाजी, जन्म वर्ष, आदि)"),
            format!(
                "What would you like to know about {name}? (show, descendants, grandfather, birth year, etc.)"
            ),
        )
    }

    // ── Fallbacks ───────────────────────────────────────────────────

    pub fn help(&self) -> String {
        self.pick(
            "मैं बहुत कुछ कर सकता हूँ! जैसे: 'राहुल को दिखाओ', '1950 में कौन पैदा हुआ?', '[नाम] के दादाजी के भाई कौन हैं?', या '[नाम] के सभी वंशज बताओ'।".to_string(),
            "I can do quite a lot! For example: 'show Rahul', 'who was born in 1950?', 'who are [name]'s grandfather's siblings?', or 'list all descendants of [name]'.".to_string(),
        )
    }

    pub fn elaborate(&self) -> String {
        self.pick(
            "कृपया अपना प्रश्न थोड़ा विस्तार से लिखें।".to_string(),
            "Please describe your question in a little more detail.".to_string(),
        )
    }

    pub fn dont_know(&self) -> String {
        self.pick(
            "क्षमा करें, मुझे इसका उत्तर नहीं पता। आप 'सिद्धार्थ को दिखाओ' या किसी सदस्य के वंशजों के बारे में पूछ सकते हैं।".to_string(),
            "Sorry, I don't know the answer to that. You can ask 'show Siddharth' or about a member's descendants.".to_string(),
        )
    }

    // ── Relationship answers ────────────────────────────────────────

    pub fn same_person(&self) -> String {
        self.pick(
            "यह एक ही व्यक्ति है।".to_string(),
            "This is the same person.".to_string(),
        )
    }

    pub fn no_relation(&self) -> String {
        self.pick(
            "कोई संबंध नहीं मिला। ये शायद अलग-अलग परिवारों से हैं।".to_string(),
            "No relation found. They may be from different families.".to_string(),
        )
    }

    /// "B is A's <label>".
    pub fn relation(&self, a: &str, b: &str, label: &str) -> String {
        self.pick(
            format!("{b}, {a} के {label} हैं।"),
            format!("{b} is {a}'s {label}."),
        )
    }

    pub fn relation_path(&self, common_ancestor: &str, generation_gap: i64) -> String {
        self.pick(
            format!("साझा पूर्वज: {common_ancestor} | पीढ़ी अंतर: {generation_gap}"),
            format!("Common ancestor: {common_ancestor} | generation gap: {generation_gap}"),
        )
    }
}

/// Join display names the way every list answer does.
pub fn join_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names.into_iter().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str() {
        assert_eq!("Hindi".parse::<Language>(), Ok(Language::Hindi));
        assert_eq!("en".parse::<Language>(), Ok(Language::English));
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_biography_gendered_parent_clause() {
        let hi = Phrasebook::new(Language::Hindi);
        assert_eq!(
            hi.biography("तारा", 2, Some("गद्दर"), Gender::Female, 0),
            "तारा पीढ़ी 2 के सदस्य हैं। वे गद्दर की पुत्री हैं।"
        );
        let en = Phrasebook::new(Language::English);
        assert_eq!(
            en.biography("Rahul", 3, Some("Ramdatt"), Gender::Male, 2),
            "Rahul is a member of generation 3. He is the son of Ramdatt. They have 2 children."
        );
    }

    #[test]
    fn test_root_biography_has_no_parent_clause() {
        let hi = Phrasebook::new(Language::Hindi);
        assert_eq!(
            hi.biography("गद्दर", 1, None, Gender::Male, 3),
            "गद्दर पीढ़ी 1 के सदस्य हैं। उनके 3 बच्चे हैं।"
        );
    }

    #[test]
    fn test_join_names() {
        assert_eq!(join_names(["क", "ख"]), "क, ख");
        assert_eq!(join_names(Vec::<&str>::new()), "");
    }
}
