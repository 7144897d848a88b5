//! Section names for scraped pages.

use vocab_corpus::is_valid_section_name;

/// Section name of a desert-sky page, derived from its `<h1>` title.
///
/// `"Arabic Animal Vocabulary"` on `animals.html` becomes `animal`; the
/// numbered general-vocabulary pages (`m_gen2.html`, ...) get the page number
/// appended so they do not collide with `m_gen.html`.
pub fn section_name_from_title(title: &str, page: &str) -> Option<String> {
    let cleaned = title
        .trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace(['/', '&'], "_and_")
        .replace("arabic_", "")
        .replace("_vocabulary", "");
    let mut name = sanitize(&cleaned);

    let stem = page_stem(page);
    if stem.starts_with("m_gen") && stem != "m_gen" {
        if let Some(number) = leading_number(&stem["m_gen".len()..]) {
            name = format!("{name}_{number}");
        }
    }

    is_valid_section_name(&name).then_some(name)
}

/// Section name of a lingualism page, from the last segment of its path:
/// `maghrebi-arabic/numbers-6/` becomes `numbers_6`.
pub fn section_name_from_path(path: &str) -> Option<String> {
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    let name: String = segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    is_valid_section_name(&name).then_some(name)
}

/// File stem of a page path, used when a page has no title.
pub fn page_stem(page: &str) -> &str {
    let file = page.trim_end_matches('/').rsplit('/').next().unwrap_or(page);
    file.split_once('.').map_or(file, |(stem, _)| stem)
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn leading_number(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}
