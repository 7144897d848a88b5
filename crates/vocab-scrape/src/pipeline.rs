//! Page to section-file pipeline.

use std::fmt;

use tracing::{debug, info, warn};
use vocab_corpus::{
    DataRoot, SectionFiles, SourceConfig, SourceKind, write_legacy_section, write_section,
};
use vocab_normalize::{Normalizer, NormalizerConfig};
use vocab_types::{CanonicalEntry, Dialect, RawRow, Variety, VocabEntry};

use crate::error::ScrapeError;
use crate::fetch::Fetcher;
use crate::naming::{page_stem, section_name_from_path, section_name_from_title};
use crate::proverbs::{self, PROVERBS_SECTION};
use crate::{desert_sky, lingualism};

/// Entries of one section for one dialect, ready to be written.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SectionBatch {
    pub dialect: Dialect,
    pub section: String,
    pub entries: Vec<VocabEntry>,
}

/// Normalize a desert-sky page into a batch for `dialect` and one for
/// Modern Standard Arabic.
pub fn desert_sky_batches(
    page: &str,
    html: &str,
    normalizer: &Normalizer,
    dialect: Dialect,
) -> Result<Vec<SectionBatch>, ScrapeError> {
    let parsed = desert_sky::parse_page(html).ok_or_else(|| ScrapeError::NoTable(page.to_string()))?;
    let title = parsed.title.as_deref().unwrap_or_else(|| page_stem(page));
    let section = section_name_from_title(title, page)
        .ok_or_else(|| ScrapeError::NoSectionName(page.to_string()))?;
    Ok(table_batches(page, section, &parsed.rows, normalizer, dialect))
}

/// Like [`desert_sky_batches`] for a verb page: `normalizer` should keep
/// rows whole (see [`NormalizerConfig::verb_table`]) and the section is
/// named after the page file, so `verbs.html` becomes `verbs`.
pub fn verb_batches(
    page: &str,
    html: &str,
    normalizer: &Normalizer,
    dialect: Dialect,
) -> Result<Vec<SectionBatch>, ScrapeError> {
    let parsed = desert_sky::parse_page(html).ok_or_else(|| ScrapeError::NoTable(page.to_string()))?;
    let section = section_name_from_path(page_stem(page))
        .ok_or_else(|| ScrapeError::NoSectionName(page.to_string()))?;
    Ok(table_batches(page, section, &parsed.rows, normalizer, dialect))
}

fn table_batches(
    page: &str,
    section: String,
    rows: &[RawRow],
    normalizer: &Normalizer,
    dialect: Dialect,
) -> Vec<SectionBatch> {
    let table = normalizer.normalize_table(rows);
    for (idx, reason) in &table.excluded {
        debug!("{page}: row {idx} dropped ({reason})");
    }
    info!(
        "{page}: {} rows, {} entries, {} excluded",
        table.rows,
        table.entries.len(),
        table.excluded.len()
    );

    let mut targets = vec![dialect];
    if dialect != Dialect::ModernStandard {
        targets.push(Dialect::ModernStandard);
    }
    targets
        .into_iter()
        .map(|target| SectionBatch {
            dialect: target,
            section: section.clone(),
            entries: project_all(&table.entries, target.variety()),
        })
        .collect()
}

fn project_all(entries: &[CanonicalEntry], variety: Variety) -> Vec<VocabEntry> {
    entries.iter().map(|e| e.project(variety)).collect()
}

/// A lingualism page as a single batch for `dialect`.
pub fn lingualism_batch(page: &str, html: &str, dialect: Dialect) -> Result<SectionBatch, ScrapeError> {
    let entries =
        lingualism::parse_page(html).ok_or_else(|| ScrapeError::NoTable(page.to_string()))?;
    let section =
        section_name_from_path(page).ok_or_else(|| ScrapeError::NoSectionName(page.to_string()))?;
    info!("{page}: {} entries", entries.len());
    Ok(SectionBatch {
        dialect,
        section,
        entries,
    })
}

/// A proverb page as a single batch for `dialect`.
pub fn proverb_batch(page: &str, html: &str, dialect: Dialect) -> Result<SectionBatch, ScrapeError> {
    let entries = proverbs::parse_page(html).ok_or_else(|| ScrapeError::NoTable(page.to_string()))?;
    info!("{page}: {} proverbs", entries.len());
    Ok(SectionBatch {
        dialect,
        section: PROVERBS_SECTION.to_string(),
        entries,
    })
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WrittenSection {
    pub dialect: Dialect,
    pub section: String,
    pub entries: usize,
    pub files: SectionFiles,
    /// Written to the flat `<root>/json` namespace rather than the dialect's.
    pub legacy: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PageOutcome {
    Written {
        page: String,
        sections: Vec<WrittenSection>,
    },
    Failed {
        page: String,
        reason: String,
    },
}

impl PageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, PageOutcome::Failed { .. })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScrapeReport {
    pub source: String,
    pub pages: Vec<PageOutcome>,
}

impl ScrapeReport {
    pub fn failures(&self) -> usize {
        self.pages.iter().filter(|p| p.is_failed()).count()
    }
}

impl fmt::Display for ScrapeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} pages, {} failed",
            self.source,
            self.pages.len(),
            self.failures()
        )?;
        for page in &self.pages {
            match page {
                PageOutcome::Written { page, sections } => {
                    for s in sections {
                        let target = if s.legacy {
                            "legacy".to_string()
                        } else {
                            s.dialect.to_string()
                        };
                        writeln!(f, "  {page} -> {target}/{} ({} entries)", s.section, s.entries)?;
                    }
                }
                PageOutcome::Failed { page, reason } => writeln!(f, "  {page} failed: {reason}")?,
            }
        }
        Ok(())
    }
}

/// Fetches a source's pages one by one and writes their section files.
#[derive(Debug)]
pub struct Scraper {
    fetcher: Fetcher,
    normalizer: Normalizer,
    verb_normalizer: Normalizer,
    root: DataRoot,
    legacy: bool,
}

impl Scraper {
    pub fn new(fetcher: Fetcher, normalizer: Normalizer, root: DataRoot) -> Self {
        let verb_normalizer = Normalizer::new(NormalizerConfig {
            apply_exclusions: false,
            split_plurals: false,
            ..normalizer.config().clone()
        });
        Self {
            fetcher,
            normalizer,
            verb_normalizer,
            root,
            legacy: false,
        }
    }

    /// Also write each desert-sky page's colloquial batch to the flat
    /// namespace served by `/vocab/{section}`.
    pub fn with_legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    /// Turn one fetched page into section files. Empty batches are not
    /// written.
    pub fn process_page(
        &self,
        source: &SourceConfig,
        page: &str,
        html: &str,
    ) -> Result<Vec<WrittenSection>, ScrapeError> {
        let batches = match source.kind {
            SourceKind::DesertSky => {
                desert_sky_batches(page, html, &self.normalizer, source.target_dialect())?
            }
            SourceKind::DesertSkyVerbs => {
                verb_batches(page, html, &self.verb_normalizer, source.target_dialect())?
            }
            SourceKind::DesertSkyProverbs => {
                vec![proverb_batch(page, html, source.target_dialect())?]
            }
            SourceKind::Lingualism => vec![lingualism_batch(page, html, source.target_dialect())?],
        };
        let legacy = self.legacy
            && matches!(source.kind, SourceKind::DesertSky | SourceKind::DesertSkyVerbs);

        let mut written = Vec::new();
        for batch in batches {
            if batch.entries.is_empty() {
                info!("{page}: nothing to write for {}", batch.dialect);
                continue;
            }
            let files = write_section(&self.root, batch.dialect, &batch.section, &batch.entries)?;
            info!(
                "{page}: wrote {} {} entries to {}",
                batch.entries.len(),
                batch.dialect,
                files.json.display()
            );
            written.push(WrittenSection {
                dialect: batch.dialect,
                section: batch.section.clone(),
                entries: batch.entries.len(),
                files,
                legacy: false,
            });
            if legacy && batch.dialect == source.target_dialect() {
                let files = write_legacy_section(&self.root, &batch.section, &batch.entries)?;
                info!("{page}: wrote legacy copy to {}", files.json.display());
                written.push(WrittenSection {
                    dialect: batch.dialect,
                    section: batch.section,
                    entries: batch.entries.len(),
                    files,
                    legacy: true,
                });
            }
        }
        Ok(written)
    }

    /// Scrape every page of `source` in order. A failing page is logged and
    /// recorded; the remaining pages are still scraped.
    pub async fn scrape_source(&self, source: &SourceConfig) -> ScrapeReport {
        info!("scraping {} pages from {}", source.pages.len(), source.name);
        let mut pages = Vec::with_capacity(source.pages.len());
        for (idx, page) in source.pages.iter().enumerate() {
            if idx > 0 {
                self.fetcher.pause().await;
            }
            let url = source.page_url(page);
            let result = match self.fetcher.get(&url).await {
                Ok(html) => self.process_page(source, page, &html),
                Err(err) => Err(err),
            };
            pages.push(match result {
                Ok(sections) => PageOutcome::Written {
                    page: page.clone(),
                    sections,
                },
                Err(err) => {
                    warn!("{}: {page} failed: {err}", source.name);
                    PageOutcome::Failed {
                        page: page.clone(),
                        reason: err.to_string(),
                    }
                }
            });
        }
        ScrapeReport {
            source: source.name.clone(),
            pages,
        }
    }

    pub async fn scrape_all(&self, sources: &[SourceConfig]) -> Vec<ScrapeReport> {
        let mut reports = Vec::with_capacity(sources.len());
        for source in sources {
            reports.push(self.scrape_source(source).await);
        }
        reports
    }
}
