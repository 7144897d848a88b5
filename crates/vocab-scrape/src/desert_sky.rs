//! Five-column tables: gloss, standard script, standard transliteration,
//! colloquial script, colloquial transliteration.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use vocab_types::RawRow;

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("table selector parses"));
static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tr").expect("row selector parses"));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("cell selector parses"));
static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("heading selector parses"));

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DesertSkyPage {
    pub title: Option<String>,
    pub rows: Vec<RawRow>,
}

/// Extract the title and every data row. `None` when the page has no table.
pub fn parse_page(html: &str) -> Option<DesertSkyPage> {
    let doc = Html::parse_document(html);
    doc.select(&TABLE).next()?;

    let title = doc
        .select(&HEADING)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());

    let rows = doc
        .select(&ROW)
        .filter_map(|tr| {
            let cells: Vec<String> = tr.select(&CELL).map(element_text).collect();
            (!cells.is_empty()).then(|| RawRow::from_cells(&cells))
        })
        .collect();

    Some(DesertSkyPage { title, rows })
}

pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_rows_and_title() {
        let html = r#"
            <html><body>
            <h1> Arabic Animal Vocabulary </h1>
            <table>
              <tr><th>English</th><th>MSA</th></tr>
              <tr><td>cat</td><td>قطة</td><td>qiTTa</td><td>قطة</td><td>'oTTa</td></tr>
              <tr><td> dog </td><td>كلب</td></tr>
            </table>
            </body></html>"#;
        let page = parse_page(html).unwrap();
        assert_eq!(page.title.as_deref(), Some("Arabic Animal Vocabulary"));
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].colloquial_transliteration, "'oTTa");
        assert_eq!(page.rows[1].english, "dog");
        assert_eq!(page.rows[1].colloquial_script, "");
    }

    #[test]
    fn page_without_table() {
        assert_eq!(parse_page("<html><h1>Nothing</h1></html>"), None);
    }
}
