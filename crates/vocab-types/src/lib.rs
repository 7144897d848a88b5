//! Shared types for the Arabic vocabulary corpus.
//!
//! A scraped table row enters as a [`RawRow`] (five free-text cells), is
//! normalized into one or two [`CanonicalEntry`] values carrying both the
//! standard and the colloquial rendering, and is finally projected into a
//! per-dialect [`VocabEntry`] which is what section files, merged corpora and
//! the HTTP API deal in.
//!
//! ```rust
//! use vocab_types::{Dialect, Variety};
//!
//! let dialect = Dialect::from_slug("msa").unwrap();
//! assert_eq!(dialect, Dialect::ModernStandard);
//! assert_eq!(dialect.slug(), "modern-standard-arabic");
//! assert_eq!(dialect.variety(), Variety::Standard);
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Arabic variety a dialect belongs to.
///
/// Source tables carry one standard and one colloquial column pair, so the
/// variety decides which pair a dialect's entries are built from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variety {
    Standard,
    Colloquial,
}

impl Variety {
    /// The other variety, used as the fallback source for empty cells.
    pub fn other(self) -> Self {
        match self {
            Variety::Standard => Variety::Colloquial,
            Variety::Colloquial => Variety::Standard,
        }
    }
}

impl fmt::Display for Variety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variety::Standard => "standard",
            Variety::Colloquial => "colloquial",
        })
    }
}

/// Supported Arabic dialects.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dialect {
    Egyptian,
    Levantine,
    Darija,
    ModernStandard,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Egyptian,
        Dialect::Levantine,
        Dialect::Darija,
        Dialect::ModernStandard,
    ];

    /// Directory and URL name of the dialect.
    pub fn slug(self) -> &'static str {
        match self {
            Dialect::Egyptian => "egyptian",
            Dialect::Levantine => "levantine",
            Dialect::Darija => "darija",
            Dialect::ModernStandard => "modern-standard-arabic",
        }
    }

    /// Parse a slug, accepting the common aliases `msa` and `maghrebi`.
    pub fn from_slug(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "egyptian" => Some(Dialect::Egyptian),
            "levantine" => Some(Dialect::Levantine),
            "darija" | "maghrebi" => Some(Dialect::Darija),
            "modern-standard-arabic" | "msa" => Some(Dialect::ModernStandard),
            _ => None,
        }
    }

    pub fn variety(self) -> Variety {
        match self {
            Dialect::ModernStandard => Variety::Standard,
            Dialect::Egyptian | Dialect::Levantine | Dialect::Darija => Variety::Colloquial,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl TryFrom<String> for Dialect {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Dialect::from_slug(&value).ok_or_else(|| format!("unknown dialect `{value}`"))
    }
}

impl From<Dialect> for String {
    fn from(value: Dialect) -> Self {
        value.slug().to_string()
    }
}

/// One source-table row as extracted from HTML, before any cleaning.
///
/// Column order follows the source tables: English gloss, standard script,
/// standard transliteration, colloquial script, colloquial transliteration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawRow {
    pub english: String,
    pub standard_script: String,
    pub standard_transliteration: String,
    pub colloquial_script: String,
    pub colloquial_transliteration: String,
}

impl RawRow {
    /// Build a row from positional cells. Missing cells become empty and
    /// anything past the fifth cell is ignored.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Self {
        let cell = |idx: usize| {
            cells
                .get(idx)
                .map(|c| c.as_ref().to_string())
                .unwrap_or_default()
        };
        Self {
            english: cell(0),
            standard_script: cell(1),
            standard_transliteration: cell(2),
            colloquial_script: cell(3),
            colloquial_transliteration: cell(4),
        }
    }

    pub fn script(&self, variety: Variety) -> &str {
        match variety {
            Variety::Standard => &self.standard_script,
            Variety::Colloquial => &self.colloquial_script,
        }
    }

    pub fn transliteration(&self, variety: Variety) -> &str {
        match variety {
            Variety::Standard => &self.standard_transliteration,
            Variety::Colloquial => &self.colloquial_transliteration,
        }
    }
}

/// Normalized row carrying both varieties. Every field is populated; a cell
/// that was empty in the source holds the other variety's value or `""`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEntry {
    pub english: String,
    pub standard_script: String,
    pub standard_transliteration: String,
    pub colloquial_script: String,
    pub colloquial_transliteration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl CanonicalEntry {
    pub fn script(&self, variety: Variety) -> &str {
        match variety {
            Variety::Standard => &self.standard_script,
            Variety::Colloquial => &self.colloquial_script,
        }
    }

    pub fn transliteration(&self, variety: Variety) -> &str {
        match variety {
            Variety::Standard => &self.standard_transliteration,
            Variety::Colloquial => &self.colloquial_transliteration,
        }
    }

    /// Narrow the entry to the fields of one variety.
    pub fn project(&self, variety: Variety) -> VocabEntry {
        VocabEntry {
            english: self.english.clone(),
            transliteration: self.transliteration(variety).to_string(),
            arabic: self.script(variety).to_string(),
            audio_url: self.audio_url.clone(),
            source: self.source.clone(),
        }
    }
}

/// Per-dialect vocabulary record as persisted in section files and served.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct VocabEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub english: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transliteration: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arabic: String,
    #[serde(
        rename = "audioUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Text fields written by older scrapers may be `null`; read them as `""`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// `(english, transliteration, arabic)` identity used for deduplication.
pub type DedupKey = (String, String, String);

impl VocabEntry {
    pub fn new(
        english: impl Into<String>,
        transliteration: impl Into<String>,
        arabic: impl Into<String>,
    ) -> Self {
        Self {
            english: english.into(),
            transliteration: transliteration.into(),
            arabic: arabic.into(),
            audio_url: None,
            source: None,
        }
    }

    pub fn with_audio(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn dedup_key(&self) -> DedupKey {
        (
            self.english.clone(),
            self.transliteration.clone(),
            self.arabic.clone(),
        )
    }
}
