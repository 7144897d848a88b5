//! Four-column tables with an audio button:
//! gloss, transliteration, script, then a cell holding
//! `<input onclick="play_mp3('https://.../word.mp3')">`.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use vocab_types::VocabEntry;

use crate::desert_sky::element_text;

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody.row-striping").expect("body selector parses"));
static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody.row-striping tr").expect("row selector parses"));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("cell selector parses"));
static AUDIO_BUTTON: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"input[onclick*="play_mp3"]"#).expect("audio selector parses")
});
static MP3_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(http[^']+\.mp3)'").expect("mp3 pattern compiles"));

/// Entries of a lingualism page, taken as-is. `None` when the page has no
/// striped table body.
pub fn parse_page(html: &str) -> Option<Vec<VocabEntry>> {
    let doc = Html::parse_document(html);
    doc.select(&BODY).next()?;

    let entries = doc
        .select(&ROW)
        .filter_map(|tr| {
            let cells: Vec<_> = tr.select(&CELL).collect();
            if cells.len() < 4 {
                return None;
            }
            let english = element_text(cells[0]);
            if english.is_empty() {
                return None;
            }
            let mut entry = VocabEntry::new(english, element_text(cells[1]), element_text(cells[2]));
            entry.audio_url = cells[3]
                .select(&AUDIO_BUTTON)
                .next()
                .and_then(|button| button.value().attr("onclick"))
                .and_then(audio_url);
            Some(entry)
        })
        .collect();
    Some(entries)
}

/// Pull the mp3 URL out of a `play_mp3('...')` handler.
pub fn audio_url(onclick: &str) -> Option<String> {
    MP3_URL
        .captures(onclick)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
