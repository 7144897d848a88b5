//! Normalization of scraped vocabulary table rows.
//!
//! A source row carries an English gloss plus script and transliteration
//! cells for a standard and a colloquial variety. Any of those cells may be
//! empty, annotated with parentheticals, or hold a singular and a plural form
//! separated by a marker. [`Normalizer`] turns one such row into zero, one or
//! two [`CanonicalEntry`] values.
//!
//! # How it works
//! 1. Clean the gloss: drop parentheticals, keep the first comma alternate.
//! 2. Drop rows that are cross-references or fragments (see [`Exclusion`]).
//! 3. If either transliteration carries `(pl.)`, split every cell on its
//!    marker (`(ج)` for script, `(pl.)` for transliteration) and build a
//!    singular and a plural entry.
//! 4. Fill each field from its own variety, falling back to the other one
//!    ([`resolve`]).
//! 5. Emit only entries whose gloss is non-empty and not a stray `"s"`.
//!
//! # Example
//! ```rust
//! use vocab_normalize::{Normalizer, NormalizerConfig};
//! use vocab_types::RawRow;
//!
//! let normalizer = Normalizer::new(NormalizerConfig::default());
//! let row = RawRow::from_cells(&["book(s)", "كتاب (ج) كتب", "kitaab (pl.) kutub"]);
//! let entries = normalizer.normalize(&row);
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[0].english, "book");
//! assert_eq!(entries[1].english, "books");
//! assert_eq!(entries[1].colloquial_transliteration, "kutub");
//! ```

mod plural;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use vocab_types::{CanonicalEntry, RawRow, Variety, VocabEntry};

pub use plural::Pluralizer;

/// Separates singular and plural in script cells.
pub const SCRIPT_PLURAL_MARKER: &str = "(ج)";
/// Separates singular and plural in transliteration cells.
pub const TRANSLITERATION_PLURAL_MARKER: &str = "(pl.)";

// The source site writes a pair of single quotes into cells it has no value for.
const EMPTY_PLACEHOLDER: &str = "''";

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)").expect("parenthetical pattern compiles"));

/// How the plural gloss is derived from the singular one.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PluralStyle {
    /// Rule-aware pluralization via [`Pluralizer`].
    #[default]
    Morphological,
    /// Append a bare `s`.
    Suffix,
}

/// Why a row produced no entries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Exclusion {
    /// `(a)` in the standard transliteration: an adjective-form cross-reference.
    AdjectiveReference,
    /// A hyphen in the standard transliteration: an incomplete phrase.
    PhraseFragment,
    /// `s.t.` ("something") in the standard transliteration: a verb pattern.
    VerbPattern,
    /// Nothing left of the English gloss.
    MissingGloss,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Exclusion::AdjectiveReference => "adjective cross-reference",
            Exclusion::PhraseFragment => "phrase fragment",
            Exclusion::VerbPattern => "verb pattern placeholder",
            Exclusion::MissingGloss => "missing english gloss",
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NormalizerConfig {
    /// Variety whose cells win in single-dialect output.
    pub preference: Variety,
    pub plural_style: PluralStyle,
    /// Keep only the text before the first comma of the gloss.
    pub first_alternate_only: bool,
    pub lowercase_english: bool,
    /// Drop cross-reference and fragment rows (see [`Exclusion`]).
    pub apply_exclusions: bool,
    /// Split `(pl.)` rows into a singular and a plural entry.
    pub split_plurals: bool,
}

impl NormalizerConfig {
    /// Verb tables keep every row whole: their `s.t.` patterns and hyphens
    /// are content, and plural markers do not occur.
    pub fn verb_table() -> Self {
        Self {
            apply_exclusions: false,
            split_plurals: false,
            ..Self::default()
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            preference: Variety::Colloquial,
            plural_style: PluralStyle::Morphological,
            first_alternate_only: true,
            lowercase_english: false,
            apply_exclusions: true,
            split_plurals: true,
        }
    }
}

/// Entries produced from a whole table, with bookkeeping for logging.
#[derive(Clone, Debug, Default)]
pub struct NormalizedTable {
    pub entries: Vec<CanonicalEntry>,
    pub rows: usize,
    /// `(row index, reason)` for every dropped row.
    pub excluded: Vec<(usize, Exclusion)>,
    /// Entries dropped after construction because their gloss was empty or `"s"`.
    pub suppressed: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
    pluralizer: Pluralizer,
}

#[derive(Clone, Copy)]
struct Cells<'a> {
    script: &'a str,
    transliteration: &'a str,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            pluralizer: Pluralizer::new(),
        }
    }

    pub fn with_pluralizer(mut self, pluralizer: Pluralizer) -> Self {
        self.pluralizer = pluralizer;
        self
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Clean a raw English cell the way every emitted entry sees it.
    pub fn clean_english(&self, raw: &str) -> String {
        let stripped = strip_parens(raw);
        let gloss = if self.config.first_alternate_only {
            stripped.split(',').next().unwrap_or_default()
        } else {
            stripped.as_str()
        };
        let gloss = gloss.trim();
        if self.config.lowercase_english {
            gloss.to_lowercase()
        } else {
            gloss.to_string()
        }
    }

    pub fn plural_english(&self, singular: &str) -> String {
        match self.config.plural_style {
            PluralStyle::Morphological => self.pluralizer.pluralize(singular),
            PluralStyle::Suffix => format!("{singular}s"),
        }
    }

    /// Normalize one row into 0, 1 or 2 entries carrying both varieties.
    pub fn normalize(&self, row: &RawRow) -> Vec<CanonicalEntry> {
        self.normalize_row(row).unwrap_or_default()
    }

    /// Normalize one row and narrow the result to `variety`, whose cells win
    /// over the other variety's.
    pub fn normalize_for(&self, row: &RawRow, variety: Variety) -> Vec<VocabEntry> {
        self.normalize(row)
            .iter()
            .map(|entry| entry.project(variety))
            .collect()
    }

    /// [`normalize_for`](Self::normalize_for) with the configured preference.
    pub fn normalize_preferred(&self, row: &RawRow) -> Vec<VocabEntry> {
        self.normalize_for(row, self.config.preference)
    }

    pub fn normalize_table<'a, I>(&self, rows: I) -> NormalizedTable
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        let mut table = NormalizedTable::default();
        for (idx, row) in rows.into_iter().enumerate() {
            table.rows += 1;
            match self.normalize_row(row) {
                Ok(entries) => {
                    let expected = if self.splits(row) { 2 } else { 1 };
                    table.suppressed += expected - entries.len();
                    table.entries.extend(entries);
                }
                Err(reason) => table.excluded.push((idx, reason)),
            }
        }
        table
    }

    fn normalize_row(&self, row: &RawRow) -> Result<Vec<CanonicalEntry>, Exclusion> {
        let english = self.clean_english(&row.english);
        if self.config.apply_exclusions {
            if let Some(reason) = exclusion(row, &english) {
                return Err(reason);
            }
        }

        let mut out = Vec::with_capacity(2);
        if self.splits(row) {
            let (std_script, std_script_pl) = split_plural(&row.standard_script, SCRIPT_PLURAL_MARKER);
            let (std_tr, std_tr_pl) =
                split_plural(&row.standard_transliteration, TRANSLITERATION_PLURAL_MARKER);
            let (col_script, col_script_pl) =
                split_plural(&row.colloquial_script, SCRIPT_PLURAL_MARKER);
            let (col_tr, col_tr_pl) =
                split_plural(&row.colloquial_transliteration, TRANSLITERATION_PLURAL_MARKER);

            let plural = self.plural_english(&english);
            push_visible(
                &mut out,
                build_entry(
                    english,
                    Cells { script: std_script, transliteration: std_tr },
                    Cells { script: col_script, transliteration: col_tr },
                ),
            );
            push_visible(
                &mut out,
                build_entry(
                    plural,
                    Cells { script: std_script_pl, transliteration: std_tr_pl },
                    Cells { script: col_script_pl, transliteration: col_tr_pl },
                ),
            );
        } else {
            push_visible(
                &mut out,
                build_entry(
                    english,
                    Cells {
                        script: &row.standard_script,
                        transliteration: &row.standard_transliteration,
                    },
                    Cells {
                        script: &row.colloquial_script,
                        transliteration: &row.colloquial_transliteration,
                    },
                ),
            );
        }
        Ok(out)
    }

    fn splits(&self, row: &RawRow) -> bool {
        self.config.split_plurals && is_plural_row(row)
    }
}

fn build_entry(english: String, standard: Cells<'_>, colloquial: Cells<'_>) -> CanonicalEntry {
    CanonicalEntry {
        english,
        standard_script: resolve(standard.script, colloquial.script),
        standard_transliteration: resolve(standard.transliteration, colloquial.transliteration),
        colloquial_script: resolve(colloquial.script, standard.script),
        colloquial_transliteration: resolve(colloquial.transliteration, standard.transliteration),
        audio_url: None,
        source: None,
    }
}

fn push_visible(out: &mut Vec<CanonicalEntry>, entry: CanonicalEntry) {
    if is_visible_english(&entry.english) {
        out.push(entry);
    }
}

/// `"s"` is what naive pluralization of an empty gloss leaves behind.
pub fn is_visible_english(english: &str) -> bool {
    !english.is_empty() && english != "s"
}

/// Return the reason a row must be dropped, if any. `english` is the cleaned
/// gloss. Rows without a standard transliteration are never excluded here.
pub fn exclusion(row: &RawRow, english: &str) -> Option<Exclusion> {
    let transliteration = row.standard_transliteration.as_str();
    if transliteration.trim().is_empty() {
        return None;
    }
    if transliteration.contains("(a)") {
        Some(Exclusion::AdjectiveReference)
    } else if transliteration.contains('-') {
        Some(Exclusion::PhraseFragment)
    } else if english.is_empty() {
        Some(Exclusion::MissingGloss)
    } else if transliteration.contains("s.t.") {
        Some(Exclusion::VerbPattern)
    } else {
        None
    }
}

/// Whether either transliteration carries a `(pl.)` marker.
pub fn is_plural_row(row: &RawRow) -> bool {
    row.standard_transliteration
        .contains(TRANSLITERATION_PLURAL_MARKER)
        || row
            .colloquial_transliteration
            .contains(TRANSLITERATION_PLURAL_MARKER)
}

/// Singular and plural segments of a cell. A cell without the marker yields
/// itself and an empty plural; segments past the second are ignored.
pub fn split_plural<'a>(cell: &'a str, marker: &str) -> (&'a str, &'a str) {
    let mut parts = cell.split(marker);
    (
        parts.next().unwrap_or_default(),
        parts.next().unwrap_or_default(),
    )
}

/// Pick the first non-empty of `preferred` and `fallback`, trimmed and with
/// parentheticals removed; `""` when both are empty.
pub fn resolve(preferred: &str, fallback: &str) -> String {
    [preferred, fallback]
        .into_iter()
        .find(|cell| !is_blank(cell))
        .map(|cell| strip_parens(cell.trim()))
        .unwrap_or_default()
}

/// Remove every non-nested `(...)` and trim what is left.
pub fn strip_parens(text: &str) -> String {
    PARENTHETICAL.replace_all(text, "").trim().to_string()
}

pub fn is_blank(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || trimmed == EMPTY_PLACEHOLDER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_first_non_empty() {
        assert_eq!(resolve("", ""), "");
        assert_eq!(resolve("x(note)", ""), "x");
        assert_eq!(resolve("", "y"), "y");
        assert_eq!(resolve("  ''  ", " y (m) "), "y");
        assert_eq!(resolve("a", "b"), "a");
    }

    #[test]
    fn strip_parens_is_single_pass() {
        assert_eq!(strip_parens("kalb (m) (coll.)"), "kalb");
        assert_eq!(strip_parens("a (b (c) d) e"), "a (b  d) e");
        assert_eq!(strip_parens("(only)"), "");
    }

    #[test]
    fn exclusion_reasons() {
        let row = |tr: &str| RawRow::from_cells(&["word", "", tr]);
        assert_eq!(exclusion(&row("kabiir (a)"), "word"), Some(Exclusion::AdjectiveReference));
        assert_eq!(exclusion(&row("al-"), "word"), Some(Exclusion::PhraseFragment));
        assert_eq!(exclusion(&row("akhadh s.t."), "word"), Some(Exclusion::VerbPattern));
        assert_eq!(exclusion(&row("kalb"), ""), Some(Exclusion::MissingGloss));
        assert_eq!(exclusion(&row("kalb"), "dog"), None);
        assert_eq!(exclusion(&row(""), ""), None);
    }

    #[test]
    fn split_keeps_two_segments() {
        assert_eq!(split_plural("kalb (pl.) kilaab", "(pl.)"), ("kalb ", " kilaab"));
        assert_eq!(split_plural("kalb", "(pl.)"), ("kalb", ""));
        assert_eq!(split_plural("a (pl.) b (pl.) c", "(pl.)"), ("a ", " b "));
        assert_eq!(split_plural("", "(pl.)"), ("", ""));
    }

    #[test]
    fn english_cleaning_options() {
        let default = Normalizer::default();
        assert_eq!(default.clean_english("Dog (animal), hound"), "Dog");

        let lower = Normalizer::new(NormalizerConfig {
            lowercase_english: true,
            first_alternate_only: false,
            ..NormalizerConfig::default()
        });
        assert_eq!(lower.clean_english("Dog, Hound"), "dog, hound");
    }

    #[test]
    fn table_counts_exclusions_and_suppressions() {
        let rows = vec![
            RawRow::from_cells(&["cow", "بقرة", "baqara"]),
            RawRow::from_cells(&["big", "كبير", "kabiir (a)"]),
            RawRow::from_cells(&["s", "", "x"]),
        ];
        let table = Normalizer::default().normalize_table(&rows);
        assert_eq!(table.rows, 3);
        assert_eq!(table.entries.len(), 1);
        assert_eq!(table.excluded, vec![(1, Exclusion::AdjectiveReference)]);
        assert_eq!(table.suppressed, 1);
    }
}
