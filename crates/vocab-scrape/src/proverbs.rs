//! Proverb listings: an Arabic `span.arabic`, its transcription in
//! parentheses, then the English rendering on the next line.
//!
//! ```html
//! <span class="arabic">القرد في عين أمه غزال.</span> (il-'ird fi 3ein ummu ġazaal.)
//! <br />In his mother's eye, the monkey is a gazelle.
//! ```
//!
//! A few transcriptions sit inside their own `<span dir="ltr">` instead of a
//! bare text node; those spans are consumed in document order as needed.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use vocab_types::VocabEntry;

use crate::desert_sky::element_text;

/// Section every proverb page is written to.
pub const PROVERBS_SECTION: &str = "proverbs";

static ARABIC: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.arabic").expect("arabic selector parses"));
static LTR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span[dir='ltr']").expect("ltr selector parses"));

/// Every proverb with an English rendering. `None` when the page has no
/// Arabic spans at all.
pub fn parse_page(html: &str) -> Option<Vec<VocabEntry>> {
    let doc = Html::parse_document(html);
    let mut spans = doc.select(&ARABIC).peekable();
    spans.peek()?;

    let mut ltr = doc.select(&LTR);
    let proverbs = spans
        .filter_map(|arabic| {
            let mut transcription = inline_transcription(arabic);
            if transcription.is_empty() {
                transcription = ltr.next().map(element_text).unwrap_or_default();
            }
            let english = english_after(arabic)?;
            Some(VocabEntry::new(
                english,
                unwrap_parens(&transcription),
                element_text(arabic),
            ))
        })
        .collect();
    Some(proverbs)
}

fn inline_transcription(arabic: ElementRef<'_>) -> String {
    arabic
        .next_sibling()
        .and_then(|node| node.value().as_text())
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

/// First non-empty text node after the span that is not the parenthesised
/// transcription. Element nodes such as `<br>` are stepped over.
fn english_after(arabic: ElementRef<'_>) -> Option<String> {
    arabic.next_siblings().find_map(|node| {
        node.value()
            .as_text()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty() && !text.starts_with('('))
            .map(str::to_string)
    })
}

fn unwrap_parens(text: &str) -> String {
    let text = text.trim();
    text.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(text)
        .trim()
        .to_string()
}
