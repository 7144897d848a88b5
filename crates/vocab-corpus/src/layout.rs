//! Directory layout of persisted vocabulary files.
//!
//! ```text
//! <root>/<dialect>/json/<section>.json
//! <root>/<dialect>/csv/<section>.csv
//! <root>/<dialect>/json/all.json      merged corpus
//! <root>/json/<section>.json          legacy flat namespace
//! <root>/csv/<section>.csv
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use vocab_types::Dialect;

use crate::error::CorpusError;

/// Section name of a dialect's merged corpus.
pub const COMBINED_SECTION: &str = "all";

const MAX_SECTION_LEN: usize = 128;

#[derive(Clone, Debug)]
pub struct DataRoot {
    root: PathBuf,
}

impl DataRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn dialect_dir(&self, dialect: Dialect) -> PathBuf {
        self.root.join(dialect.slug())
    }

    pub fn json_dir(&self, dialect: Dialect) -> PathBuf {
        self.dialect_dir(dialect).join("json")
    }

    pub fn csv_dir(&self, dialect: Dialect) -> PathBuf {
        self.dialect_dir(dialect).join("csv")
    }

    pub fn section_json(&self, dialect: Dialect, section: &str) -> PathBuf {
        self.json_dir(dialect).join(format!("{section}.json"))
    }

    pub fn section_csv(&self, dialect: Dialect, section: &str) -> PathBuf {
        self.csv_dir(dialect).join(format!("{section}.csv"))
    }

    pub fn legacy_json(&self, section: &str) -> PathBuf {
        self.root.join("json").join(format!("{section}.json"))
    }

    pub fn legacy_csv(&self, section: &str) -> PathBuf {
        self.root.join("csv").join(format!("{section}.csv"))
    }

    /// Section names present in a dialect's json directory, sorted, without
    /// the merged corpus itself.
    pub fn discover_sections(&self, dialect: Dialect) -> Result<Vec<String>, CorpusError> {
        let dir = self.json_dir(dialect);
        let reader = fs::read_dir(&dir).map_err(|e| CorpusError::io(&dir, e))?;
        let mut sections = Vec::new();
        for item in reader {
            let item = item.map_err(|e| CorpusError::io(&dir, e))?;
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem != COMBINED_SECTION && is_valid_section_name(stem) {
                sections.push(stem.to_string());
            }
        }
        sections.sort();
        Ok(sections)
    }
}

/// Section names double as file stems and URL segments, so only ASCII
/// alphanumerics, `_` and `-` are allowed.
pub fn is_valid_section_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_SECTION_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_dialect_layout() {
        let root = DataRoot::new("/data");
        assert_eq!(
            root.section_json(Dialect::Darija, "animals"),
            PathBuf::from("/data/darija/json/animals.json")
        );
        assert_eq!(
            root.section_csv(Dialect::ModernStandard, "all"),
            PathBuf::from("/data/modern-standard-arabic/csv/all.csv")
        );
        assert_eq!(
            root.legacy_json("food"),
            PathBuf::from("/data/json/food.json")
        );
        assert_eq!(root.legacy_csv("food"), PathBuf::from("/data/csv/food.csv"));
    }

    #[test]
    fn section_names_reject_traversal() {
        assert!(is_valid_section_name("food_and_drink-2"));
        assert!(!is_valid_section_name(""));
        assert!(!is_valid_section_name("../secret"));
        assert!(!is_valid_section_name("a/b"));
        assert!(!is_valid_section_name("a.json"));
    }
}
