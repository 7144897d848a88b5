//! CSV rendering of vocabulary entries.
//!
//! Columns are `english,transliteration,arabic`, then `audioUrl` when any
//! entry has one, then `source`. Fields holding a comma, quote or newline are
//! quoted with inner quotes doubled.

use std::io::{Read, Write};

use vocab_types::VocabEntry;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CsvLayout {
    pub audio: bool,
    pub source: bool,
}

impl CsvLayout {
    /// Layout for a single section: optional columns only when used.
    pub fn for_section(entries: &[VocabEntry]) -> Self {
        Self {
            audio: has_audio(entries),
            source: entries.iter().any(|e| e.source.is_some()),
        }
    }

    /// Layout for a merged corpus, which always names its sources.
    pub fn for_corpus(entries: &[VocabEntry]) -> Self {
        Self {
            audio: has_audio(entries),
            source: true,
        }
    }

    pub fn header(&self) -> Vec<&'static str> {
        let mut header = vec!["english", "transliteration", "arabic"];
        if self.audio {
            header.push("audioUrl");
        }
        if self.source {
            header.push("source");
        }
        header
    }
}

fn has_audio(entries: &[VocabEntry]) -> bool {
    entries
        .iter()
        .any(|e| e.audio_url.as_deref().is_some_and(|u| !u.is_empty()))
}

pub fn write_csv<W: Write>(
    writer: W,
    entries: &[VocabEntry],
    layout: CsvLayout,
) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);
    out.write_record(layout.header())?;
    for entry in entries {
        let mut record = vec![
            entry.english.as_str(),
            entry.transliteration.as_str(),
            entry.arabic.as_str(),
        ];
        if layout.audio {
            record.push(entry.audio_url.as_deref().unwrap_or_default());
        }
        if layout.source {
            record.push(entry.source.as_deref().unwrap_or_default());
        }
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

pub fn to_csv_string(entries: &[VocabEntry], layout: CsvLayout) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_csv(&mut buf, entries, layout)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parse CSV written by [`write_csv`] (or by hand with the same header
/// names). Empty optional cells read back as `None`.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<VocabEntry>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
    rdr.deserialize::<VocabEntry>().collect()
}
