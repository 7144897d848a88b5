//! Reading and writing section files.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;
use vocab_types::{Dialect, VocabEntry};

use crate::csv_file::{self, CsvLayout};
use crate::error::CorpusError;
use crate::layout::DataRoot;

/// Paths of the two files written for one section.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SectionFiles {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Write `entries` as `<section>.json` and `<section>.csv` for `dialect`,
/// creating directories and overwriting existing files.
pub fn write_section(
    root: &DataRoot,
    dialect: Dialect,
    section: &str,
    entries: &[VocabEntry],
) -> Result<SectionFiles, CorpusError> {
    let files = SectionFiles {
        json: root.section_json(dialect, section),
        csv: root.section_csv(dialect, section),
    };
    write_json(&files.json, entries)?;
    write_csv_file(&files.csv, entries, CsvLayout::for_section(entries))?;
    Ok(files)
}

/// Write `entries` to the flat namespace, `<root>/json/<section>.json` and
/// `<root>/csv/<section>.csv`, served by the dialect-less route.
pub fn write_legacy_section(
    root: &DataRoot,
    section: &str,
    entries: &[VocabEntry],
) -> Result<SectionFiles, CorpusError> {
    let files = SectionFiles {
        json: root.legacy_json(section),
        csv: root.legacy_csv(section),
    };
    write_json(&files.json, entries)?;
    write_csv_file(&files.csv, entries, CsvLayout::for_section(entries))?;
    Ok(files)
}

/// Pretty-printed JSON array.
pub fn write_json(path: &Path, entries: &[VocabEntry]) -> Result<(), CorpusError> {
    ensure_parent(path)?;
    let body = serde_json::to_string_pretty(entries).map_err(|source| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, body).map_err(|e| CorpusError::io(path, e))
}

pub fn write_csv_file(
    path: &Path,
    entries: &[VocabEntry],
    layout: CsvLayout,
) -> Result<(), CorpusError> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| CorpusError::io(path, e))?;
    csv_file::write_csv(BufWriter::new(file), entries, layout).map_err(|source| {
        CorpusError::Csv {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Parse a section (or merged) JSON file.
///
/// Only a file that is not a JSON array is an error. An element that is not
/// an entry object comes back as a blank entry, so the merger drops it alone.
pub fn read_section(path: &Path) -> Result<Vec<VocabEntry>, CorpusError> {
    let raw = fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
    let values: Vec<Value> = serde_json::from_str(&raw).map_err(|source| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(values
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).unwrap_or_else(|err| {
                debug!("unreadable entry in {}: {err}", path.display());
                VocabEntry::default()
            })
        })
        .collect())
}

pub fn read_csv_file(path: &Path) -> Result<Vec<VocabEntry>, CorpusError> {
    let file = File::open(path).map_err(|e| CorpusError::io(path, e))?;
    csv_file::read_csv(file).map_err(|source| CorpusError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent(path: &Path) -> Result<(), CorpusError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| CorpusError::io(dir, e))
        }
        _ => Ok(()),
    }
}
