//! Merge per-section files into one deduplicated corpus per dialect.
//!
//! Sections are absorbed in order; every entry is tagged with its section
//! name and kept only if no earlier entry shares its
//! `(english, transliteration, arabic)` triple. Entries with an empty gloss
//! never make it in. A section that cannot be read is skipped, a dialect
//! without a json directory is skipped, and nothing stops the run.

use std::collections::HashSet;
use std::fmt;

use tracing::{error, info, warn};
use vocab_types::{DedupKey, Dialect, VocabEntry};

use crate::catalog::Catalog;
use crate::csv_file::CsvLayout;
use crate::error::CorpusError;
use crate::layout::{COMBINED_SECTION, DataRoot};
use crate::store::{self, SectionFiles};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SectionOutcome {
    Merged {
        section: String,
        added: usize,
        duplicates: usize,
        blank: usize,
    },
    Skipped {
        section: String,
        reason: String,
    },
}

impl SectionOutcome {
    pub fn section(&self) -> &str {
        match self {
            SectionOutcome::Merged { section, .. } | SectionOutcome::Skipped { section, .. } => {
                section
            }
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, SectionOutcome::Skipped { .. })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DialectOutcome {
    Merged {
        dialect: Dialect,
        sections: Vec<SectionOutcome>,
        total: usize,
        files: SectionFiles,
    },
    Skipped {
        dialect: Dialect,
        reason: String,
    },
}

impl DialectOutcome {
    pub fn dialect(&self) -> Dialect {
        match self {
            DialectOutcome::Merged { dialect, .. } | DialectOutcome::Skipped { dialect, .. } => {
                *dialect
            }
        }
    }
}

/// Summary of one merge run across dialects.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MergeReport {
    pub dialects: Vec<DialectOutcome>,
}

impl MergeReport {
    pub fn total_entries(&self) -> usize {
        self.dialects
            .iter()
            .map(|d| match d {
                DialectOutcome::Merged { total, .. } => *total,
                DialectOutcome::Skipped { .. } => 0,
            })
            .sum()
    }

    pub fn skipped_sections(&self) -> impl Iterator<Item = (Dialect, &SectionOutcome)> + '_ {
        self.dialects.iter().flat_map(|d| match d {
            DialectOutcome::Merged {
                dialect, sections, ..
            } => sections
                .iter()
                .filter(|s| s.is_skipped())
                .map(|s| (*dialect, s))
                .collect::<Vec<_>>(),
            DialectOutcome::Skipped { .. } => Vec::new(),
        })
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.dialects {
            match outcome {
                DialectOutcome::Merged {
                    dialect,
                    sections,
                    total,
                    ..
                } => {
                    let skipped = sections.iter().filter(|s| s.is_skipped()).count();
                    writeln!(
                        f,
                        "{dialect}: {total} entries from {} sections ({skipped} skipped)",
                        sections.len() - skipped
                    )?;
                    for section in sections {
                        if let SectionOutcome::Skipped { section, reason } = section {
                            writeln!(f, "  skipped {section}: {reason}")?;
                        }
                    }
                }
                DialectOutcome::Skipped { dialect, reason } => {
                    writeln!(f, "{dialect}: skipped ({reason})")?;
                }
            }
        }
        write!(f, "total: {} entries", self.total_entries())
    }
}

/// Deduplicated, source-tagged entries of one dialect.
#[derive(Clone, Debug)]
pub struct Corpus {
    dialect: Dialect,
    entries: Vec<VocabEntry>,
    seen: HashSet<DedupKey>,
    /// Set once any absorbed entry carried audio, kept or not.
    audio_seen: bool,
}

impl Corpus {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            entries: Vec::new(),
            seen: HashSet::new(),
            audio_seen: false,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Append one section's entries, tagging each with `section`.
    pub fn absorb<I>(&mut self, section: &str, entries: I) -> SectionOutcome
    where
        I: IntoIterator<Item = VocabEntry>,
    {
        let mut added = 0;
        let mut duplicates = 0;
        let mut blank = 0;
        for mut entry in entries {
            if entry.english.trim().is_empty() {
                blank += 1;
                continue;
            }
            entry.source = Some(section.to_string());
            entry.audio_url = entry.audio_url.filter(|url| !url.is_empty());
            self.audio_seen |= entry.audio_url.is_some();
            if self.seen.insert(entry.dedup_key()) {
                self.entries.push(entry);
                added += 1;
            } else {
                duplicates += 1;
            }
        }
        SectionOutcome::Merged {
            section: section.to_string(),
            added,
            duplicates,
            blank,
        }
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<VocabEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `audioUrl` is a column whenever an absorbed section supplied audio,
    /// even if every such entry lost deduplication.
    pub fn csv_layout(&self) -> CsvLayout {
        CsvLayout {
            audio: self.audio_seen,
            ..CsvLayout::for_corpus(&self.entries)
        }
    }

    /// Write `all.json` and `all.csv` for this corpus.
    pub fn write(&self, root: &DataRoot) -> Result<SectionFiles, CorpusError> {
        let files = SectionFiles {
            json: root.section_json(self.dialect, COMBINED_SECTION),
            csv: root.section_csv(self.dialect, COMBINED_SECTION),
        };
        store::write_json(&files.json, &self.entries)?;
        store::write_csv_file(&files.csv, &self.entries, self.csv_layout())?;
        Ok(files)
    }
}

/// Merge in-memory section collections, in iteration order.
pub fn merge_sections<I, S, E>(dialect: Dialect, sections: I) -> (Corpus, Vec<SectionOutcome>)
where
    I: IntoIterator<Item = (S, E)>,
    S: AsRef<str>,
    E: IntoIterator<Item = VocabEntry>,
{
    let mut corpus = Corpus::new(dialect);
    let outcomes = sections
        .into_iter()
        .map(|(name, entries)| corpus.absorb(name.as_ref(), entries))
        .collect();
    (corpus, outcomes)
}

/// Merge one dialect's section files from disk and write its combined files.
///
/// `sections` fixes the merge order; `None` merges every section file found,
/// sorted by name. Read failures skip the section; only failing to list the
/// directory or to write the output is an error. A dialect with no sections
/// at all is skipped and nothing is written for it.
pub fn merge_dialect(
    root: &DataRoot,
    dialect: Dialect,
    sections: Option<&[String]>,
) -> Result<DialectOutcome, CorpusError> {
    let json_dir = root.json_dir(dialect);
    if !json_dir.is_dir() {
        info!("skipping {dialect}: {} does not exist", json_dir.display());
        return Ok(DialectOutcome::Skipped {
            dialect,
            reason: format!("{} does not exist", json_dir.display()),
        });
    }

    let names = match sections {
        Some(list) => list.to_vec(),
        None => root.discover_sections(dialect)?,
    };
    if names.is_empty() {
        info!("skipping {dialect}: no section files");
        return Ok(DialectOutcome::Skipped {
            dialect,
            reason: "no section files".to_string(),
        });
    }
    info!("merging {} sections for {dialect}", names.len());

    let mut corpus = Corpus::new(dialect);
    let mut outcomes = Vec::with_capacity(names.len());
    for name in names {
        let path = root.section_json(dialect, &name);
        let outcome = match store::read_section(&path) {
            Ok(entries) => corpus.absorb(&name, entries),
            Err(err) => {
                warn!("skipping section {name} of {dialect}: {err}");
                SectionOutcome::Skipped {
                    section: name,
                    reason: if err.is_not_found() {
                        "file not found".to_string()
                    } else {
                        err.to_string()
                    },
                }
            }
        };
        outcomes.push(outcome);
    }

    let files = corpus.write(root)?;
    info!(
        "{dialect}: {} entries written to {}",
        corpus.len(),
        files.json.display()
    );
    Ok(DialectOutcome::Merged {
        dialect,
        sections: outcomes,
        total: corpus.len(),
        files,
    })
}

/// Merge every dialect in the catalog. Never fails as a whole: a dialect
/// whose merge errors is reported as skipped.
pub fn merge_all(root: &DataRoot, catalog: &Catalog) -> MergeReport {
    let dialects = catalog
        .dialects()
        .into_iter()
        .map(|dialect| {
            merge_dialect(root, dialect, catalog.sections_for(dialect)).unwrap_or_else(|err| {
                error!("merge of {dialect} failed: {err}");
                DialectOutcome::Skipped {
                    dialect,
                    reason: err.to_string(),
                }
            })
        })
        .collect();
    MergeReport { dialects }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(english: &str, tr: &str, ar: &str) -> VocabEntry {
        VocabEntry::new(english, tr, ar)
    }

    #[test]
    fn first_section_wins_duplicates() {
        let (corpus, outcomes) = merge_sections(
            Dialect::Egyptian,
            vec![
                ("animals", vec![entry("cat", "'oTTa", "قطة"), entry("dog", "kalb", "كلب")]),
                ("pets", vec![entry("cat", "'oTTa", "قطة"), entry("cat", "biss", "بس")]),
            ],
        );
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.entries()[0].source.as_deref(), Some("animals"));
        assert_eq!(corpus.entries()[2].transliteration, "biss");
        assert_eq!(
            outcomes[1],
            SectionOutcome::Merged {
                section: "pets".into(),
                added: 1,
                duplicates: 1,
                blank: 0,
            }
        );
    }

    #[test]
    fn blank_glosses_are_dropped() {
        let mut corpus = Corpus::new(Dialect::Darija);
        let outcome = corpus.absorb(
            "numbers",
            vec![entry("", "wa7ed", "واحد"), entry("  ", "", ""), entry("one", "wa7ed", "واحد")],
        );
        assert_eq!(corpus.len(), 1);
        assert!(matches!(outcome, SectionOutcome::Merged { blank: 2, added: 1, .. }));
    }

    #[test]
    fn empty_audio_is_treated_as_absent() {
        let mut corpus = Corpus::new(Dialect::Levantine);
        corpus.absorb("x", vec![entry("tea", "shay", "شاي").with_audio("")]);
        assert_eq!(corpus.entries()[0].audio_url, None);
        assert!(!corpus.csv_layout().audio);
    }

    #[test]
    fn audio_column_survives_losing_duplicates() {
        let (corpus, _) = merge_sections(
            Dialect::Levantine,
            vec![
                ("food", vec![entry("tea", "shay", "شاي")]),
                (
                    "drinks",
                    vec![entry("tea", "shay", "شاي").with_audio("http://a/tea.mp3")],
                ),
            ],
        );
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.entries()[0].audio_url, None);
        assert!(corpus.csv_layout().audio);
        assert_eq!(
            corpus.csv_layout().header(),
            vec!["english", "transliteration", "arabic", "audioUrl", "source"]
        );
    }

    #[test]
    fn report_summary_lists_skips() {
        let report = MergeReport {
            dialects: vec![DialectOutcome::Skipped {
                dialect: Dialect::Levantine,
                reason: "missing".into(),
            }],
        };
        let text = report.to_string();
        assert!(text.contains("levantine: skipped (missing)"));
        assert!(text.ends_with("total: 0 entries"));
    }
}
