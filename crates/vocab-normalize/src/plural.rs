//! English pluralization for glosses split off a `(pl.)` row.
//!
//! Lookup order: uncountables and words that are already plural, then the
//! irregular table, then ordered suffix rules, then a plain `-s`.

use std::collections::{HashMap, HashSet};

const UNCOUNTABLE: &[&str] = &[
    "advice",
    "bread",
    "butter",
    "cattle",
    "clothing",
    "coffee",
    "deer",
    "equipment",
    "fish",
    "furniture",
    "homework",
    "information",
    "jewelry",
    "luggage",
    "meat",
    "milk",
    "money",
    "music",
    "news",
    "police",
    "rice",
    "salt",
    "series",
    "sheep",
    "species",
    "sugar",
    "tea",
    "traffic",
    "water",
    "weather",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("analysis", "analyses"),
    ("businessman", "businessmen"),
    ("cactus", "cacti"),
    ("calf", "calves"),
    ("chairman", "chairmen"),
    ("child", "children"),
    ("crisis", "crises"),
    ("criterion", "criteria"),
    ("echo", "echoes"),
    ("elf", "elves"),
    ("foot", "feet"),
    ("fireman", "firemen"),
    ("fisherman", "fishermen"),
    ("fungus", "fungi"),
    ("gentleman", "gentlemen"),
    ("goose", "geese"),
    ("half", "halves"),
    ("hero", "heroes"),
    ("leaf", "leaves"),
    ("loaf", "loaves"),
    ("louse", "lice"),
    ("man", "men"),
    ("mosquito", "mosquitoes"),
    ("mouse", "mice"),
    ("nucleus", "nuclei"),
    ("ox", "oxen"),
    ("person", "people"),
    ("phenomenon", "phenomena"),
    ("policeman", "policemen"),
    ("policewoman", "policewomen"),
    ("postman", "postmen"),
    ("potato", "potatoes"),
    ("quiz", "quizzes"),
    ("salesman", "salesmen"),
    ("self", "selves"),
    ("shelf", "shelves"),
    ("thief", "thieves"),
    ("tomato", "tomatoes"),
    ("tooth", "teeth"),
    ("torpedo", "torpedoes"),
    ("veto", "vetoes"),
    ("wolf", "wolves"),
    ("woman", "women"),
];

const PLURAL_ONLY: &[&str] = &[
    "belongings",
    "binoculars",
    "clothes",
    "congratulations",
    "glasses",
    "goggles",
    "headphones",
    "jeans",
    "pajamas",
    "pants",
    "pliers",
    "scissors",
    "shorts",
    "stairs",
    "surroundings",
    "thanks",
    "tongs",
    "trousers",
    "tweezers",
];

// Singular nouns ending in a lone `s`.
const SINGULAR_S: &[&str] = &["atlas", "bias", "canvas", "gas", "lens", "pancreas"];

// First match wins, so longer suffixes sit ahead of their tails.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ay", "ays"),
    ("ey", "eys"),
    ("oy", "oys"),
    ("uy", "uys"),
    ("y", "ies"),
    ("sis", "ses"),
    ("ss", "sses"),
    ("s", "ses"),
    ("ch", "ches"),
    ("sh", "shes"),
    ("x", "xes"),
    ("z", "zes"),
    ("ife", "ives"),
];

/// Rule-aware English pluralizer.
#[derive(Clone, Debug)]
pub struct Pluralizer {
    uncountable: HashSet<String>,
    irregular: HashMap<String, String>,
    irregular_plurals: HashSet<String>,
}

impl Default for Pluralizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pluralizer {
    pub fn new() -> Self {
        let mut pluralizer = Self {
            uncountable: UNCOUNTABLE.iter().map(|w| w.to_string()).collect(),
            irregular: HashMap::new(),
            irregular_plurals: HashSet::new(),
        };
        for (singular, plural) in IRREGULAR {
            pluralizer.add_irregular(singular, plural);
        }
        pluralizer
    }

    /// Register an extra singular/plural pair. Both sides are matched
    /// case-insensitively.
    pub fn add_irregular(&mut self, singular: &str, plural: &str) {
        let plural = plural.to_lowercase();
        self.irregular_plurals.insert(plural.clone());
        self.irregular.insert(singular.to_lowercase(), plural);
    }

    pub fn add_uncountable(&mut self, word: &str) {
        self.uncountable.insert(word.to_lowercase());
    }

    /// Pluralize the last word of `text`, keeping everything before it and
    /// the casing style of the original word.
    pub fn pluralize(&self, text: &str) -> String {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        let word = trimmed
            .rsplit_once(char::is_whitespace)
            .map_or(trimmed, |(_, last)| last);
        let prefix = &trimmed[..trimmed.len() - word.len()];
        let plural = self.pluralize_word(&word.to_lowercase());
        format!("{prefix}{}", restore_case(word, &plural))
    }

    fn pluralize_word(&self, word: &str) -> String {
        if self.uncountable.contains(word)
            || self.irregular_plurals.contains(word)
            || PLURAL_ONLY.contains(&word)
        {
            return word.to_string();
        }
        if let Some(plural) = self.irregular.get(word) {
            return plural.clone();
        }
        if looks_plural(word) {
            return word.to_string();
        }
        for (suffix, replacement) in SUFFIX_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                return format!("{stem}{replacement}");
            }
        }
        format!("{word}s")
    }
}

/// A trailing `s` marks a plural unless it closes `-ss`, `-us`, `-is` or a
/// known singular.
fn looks_plural(word: &str) -> bool {
    word.len() > 2
        && word.ends_with('s')
        && !["ss", "us", "is"].iter().any(|tail| word.ends_with(tail))
        && !SINGULAR_S.contains(&word)
}

fn restore_case(original: &str, plural: &str) -> String {
    let has_letters = original.chars().any(char::is_alphabetic);
    if has_letters && original.chars().count() > 1 && original == original.to_uppercase() {
        return plural.to_uppercase();
    }
    let mut chars = original.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let mut out = String::with_capacity(plural.len());
            let mut rest = plural.chars();
            if let Some(head) = rest.next() {
                out.extend(head.to_uppercase());
            }
            out.extend(rest);
            out
        }
        _ => plural.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_suffix_rules() {
        let p = Pluralizer::new();
        assert_eq!(p.pluralize("cat"), "cats");
        assert_eq!(p.pluralize("box"), "boxes");
        assert_eq!(p.pluralize("church"), "churches");
        assert_eq!(p.pluralize("dish"), "dishes");
        assert_eq!(p.pluralize("bus"), "buses");
        assert_eq!(p.pluralize("glass"), "glasses");
        assert_eq!(p.pluralize("city"), "cities");
        assert_eq!(p.pluralize("day"), "days");
        assert_eq!(p.pluralize("knife"), "knives");
        assert_eq!(p.pluralize("policeman"), "policemen");
        assert_eq!(p.pluralize("woman"), "women");
        assert_eq!(p.pluralize("shaman"), "shamans");
        assert_eq!(p.pluralize("gas"), "gases");
        assert_eq!(p.pluralize("crisis"), "crises");
    }

    #[test]
    fn leaves_plurals_alone() {
        let p = Pluralizer::new();
        assert_eq!(p.pluralize("clothes"), "clothes");
        assert_eq!(p.pluralize("glasses"), "glasses");
        assert_eq!(p.pluralize("scissors"), "scissors");
        assert_eq!(p.pluralize("trousers"), "trousers");
        assert_eq!(p.pluralize("cats"), "cats");
        assert_eq!(p.pluralize("churches"), "churches");
        assert_eq!(p.pluralize("cities"), "cities");
        assert_eq!(p.pluralize("women"), "women");
        assert_eq!(p.pluralize("sun glasses"), "sun glasses");
    }

    #[test]
    fn uses_irregulars_and_uncountables() {
        let p = Pluralizer::new();
        assert_eq!(p.pluralize("child"), "children");
        assert_eq!(p.pluralize("tooth"), "teeth");
        assert_eq!(p.pluralize("human"), "humans");
        assert_eq!(p.pluralize("sheep"), "sheep");
        assert_eq!(p.pluralize("children"), "children");
    }

    #[test]
    fn pluralizes_last_word_and_keeps_case() {
        let p = Pluralizer::new();
        assert_eq!(p.pluralize("ice cream"), "ice creams");
        assert_eq!(p.pluralize("Box"), "Boxes");
        assert_eq!(p.pluralize("BOX"), "BOXES");
        assert_eq!(p.pluralize("post office"), "post offices");
        assert_eq!(p.pluralize("  "), "");
    }

    #[test]
    fn accepts_custom_irregulars() {
        let mut p = Pluralizer::new();
        p.add_irregular("cactus", "cactuses");
        p.add_uncountable("sand");
        assert_eq!(p.pluralize("cactus"), "cactuses");
        assert_eq!(p.pluralize("sand"), "sand");
    }
}
