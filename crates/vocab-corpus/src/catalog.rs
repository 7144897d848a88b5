//! Which dialects and sections exist, and where they are scraped from.
//!
//! Loaded from a TOML file shared by the merger, the scraper and the HTTP
//! server so the three never disagree on section lists:
//!
//! ```toml
//! [[dialect]]
//! name = "darija"
//! sections = ["numbers_6", "verbs_5"]   # omit to use every file on disk
//!
//! [[source]]
//! name = "lingualism-darija"
//! kind = "lingualism"
//! dialect = "darija"
//! base_url = "https://resources.lingualism.com/"
//! pages = ["maghrebi-arabic/numbers-6/"]
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use vocab_types::Dialect;

use crate::layout::{COMBINED_SECTION, is_valid_section_name};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, rename = "dialect")]
    pub dialects: Vec<DialectSections>,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceConfig>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DialectSections {
    pub name: Dialect,
    /// Explicit merge order; empty means "discover from disk".
    #[serde(default)]
    pub sections: Vec<String>,
}

/// Table layout of a scraping source.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Five-column tables (gloss, standard script/transliteration,
    /// colloquial script/transliteration) feeding two dialects at once.
    DesertSky,
    /// The same tables holding verbs: rows are kept whole, never excluded
    /// or split, and the section is named after the page file.
    DesertSkyVerbs,
    /// Proverb listings (Arabic, transcription, English), colloquial only.
    DesertSkyProverbs,
    /// Four-column per-dialect tables with an audio button.
    Lingualism,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub kind: SourceKind,
    pub base_url: String,
    /// Target dialect. Desert-sky sources write this dialect plus Modern
    /// Standard and default to Egyptian.
    #[serde(default)]
    pub dialect: Option<Dialect>,
    #[serde(default)]
    pub pages: Vec<String>,
}

impl SourceConfig {
    pub fn page_url(&self, page: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), page.trim_start_matches('/'))
    }

    /// The colloquial dialect this source writes.
    pub fn target_dialect(&self) -> Dialect {
        self.dialect.unwrap_or(Dialect::Egyptian)
    }
}

impl Catalog {
    /// All four dialects with sections discovered from disk and no sources.
    pub fn builtin() -> Self {
        Self {
            dialects: Dialect::ALL
                .iter()
                .map(|&name| DialectSections {
                    name,
                    sections: Vec::new(),
                })
                .collect(),
            sources: Vec::new(),
        }
    }

    /// Load a catalog file. A missing file falls back to [`Catalog::builtin`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("no catalog at {}, using built-in defaults", path.display());
                return Ok(Self::builtin());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let catalog: Catalog = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in &self.dialects {
            if !seen.insert(entry.name) {
                return Err(ConfigError::Invalid(format!(
                    "dialect `{}` listed twice",
                    entry.name
                )));
            }
            for section in &entry.sections {
                if !is_valid_section_name(section) || section == COMBINED_SECTION {
                    return Err(ConfigError::Invalid(format!(
                        "bad section name `{section}` for {}",
                        entry.name
                    )));
                }
            }
        }

        let mut names = HashSet::new();
        for source in &self.sources {
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "source `{}` listed twice",
                    source.name
                )));
            }
            if source.kind == SourceKind::Lingualism && source.dialect.is_none() {
                return Err(ConfigError::Invalid(format!(
                    "lingualism source `{}` needs a dialect",
                    source.name
                )));
            }
            if source.dialect == Some(Dialect::ModernStandard) {
                return Err(ConfigError::Invalid(format!(
                    "source `{}` must target a colloquial dialect",
                    source.name
                )));
            }
        }
        Ok(())
    }

    /// Dialects in configured order, or all of them when none are listed.
    pub fn dialects(&self) -> Vec<Dialect> {
        if self.dialects.is_empty() {
            return Dialect::ALL.to_vec();
        }
        self.dialects.iter().map(|d| d.name).collect()
    }

    pub fn contains(&self, dialect: Dialect) -> bool {
        self.dialects().contains(&dialect)
    }

    /// Explicitly configured sections, `None` when they should be discovered.
    pub fn sections_for(&self, dialect: Dialect) -> Option<&[String]> {
        self.dialects
            .iter()
            .find(|d| d.name == dialect)
            .map(|d| d.sections.as_slice())
            .filter(|s| !s.is_empty())
    }

    pub fn source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dialects_and_sources() {
        let catalog = Catalog::from_toml_str(
            r#"
            [[dialect]]
            name = "darija"
            sections = ["numbers_6", "verbs_5"]

            [[dialect]]
            name = "msa"

            [[source]]
            name = "desert-sky"
            kind = "desert-sky"
            base_url = "https://arabic.desert-sky.net/"
            pages = ["animals.html"]
            "#,
        )
        .unwrap();
        assert_eq!(
            catalog.dialects(),
            vec![Dialect::Darija, Dialect::ModernStandard]
        );
        assert_eq!(
            catalog.sections_for(Dialect::Darija).unwrap(),
            ["numbers_6".to_string(), "verbs_5".to_string()]
        );
        assert!(catalog.sections_for(Dialect::ModernStandard).is_none());
        let source = catalog.source("desert-sky").unwrap();
        assert_eq!(source.kind, SourceKind::DesertSky);
        assert_eq!(source.target_dialect(), Dialect::Egyptian);
        assert_eq!(
            source.page_url("animals.html"),
            "https://arabic.desert-sky.net/animals.html"
        );
    }

    #[test]
    fn rejects_bad_catalogs() {
        let dup = "[[dialect]]\nname = \"egyptian\"\n[[dialect]]\nname = \"egyptian\"\n";
        assert!(matches!(
            Catalog::from_toml_str(dup),
            Err(ConfigError::Invalid(_))
        ));

        let bad_section = "[[dialect]]\nname = \"egyptian\"\nsections = [\"../x\"]\n";
        assert!(Catalog::from_toml_str(bad_section).is_err());

        let all_section = "[[dialect]]\nname = \"egyptian\"\nsections = [\"all\"]\n";
        assert!(Catalog::from_toml_str(all_section).is_err());

        let no_dialect = "[[source]]\nname = \"x\"\nkind = \"lingualism\"\nbase_url = \"http://x\"\n";
        assert!(Catalog::from_toml_str(no_dialect).is_err());

        let unknown = "[[dialect]]\nname = \"klingon\"\n";
        assert!(matches!(
            Catalog::from_toml_str(unknown),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn empty_catalog_means_every_dialect() {
        let catalog = Catalog::from_toml_str("").unwrap();
        assert_eq!(catalog.dialects(), Dialect::ALL.to_vec());
        assert_eq!(Catalog::builtin().dialects(), Dialect::ALL.to_vec());
    }

    #[test]
    fn shipped_catalog_is_valid() {
        let catalog = Catalog::from_toml_str(include_str!("../../../vocab.toml")).unwrap();
        assert_eq!(catalog.dialects().len(), 4);
        assert!(catalog.source("desert-sky").is_some());
        assert!(catalog.source("lingualism-darija").is_some());
        assert_eq!(
            catalog.source("desert-sky-verbs").map(|s| s.kind),
            Some(SourceKind::DesertSkyVerbs)
        );
        assert_eq!(
            catalog.source("desert-sky-proverbs").map(|s| s.kind),
            Some(SourceKind::DesertSkyProverbs)
        );
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let catalog = Catalog::load("/definitely/not/here/vocab.toml").unwrap();
        assert_eq!(catalog, Catalog::builtin());
    }
}
