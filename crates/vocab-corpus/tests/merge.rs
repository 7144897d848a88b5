use std::fs;

use tempfile::TempDir;
use vocab_corpus::{
    Catalog, CsvLayout, DataRoot, DialectOutcome, SectionOutcome, merge_all, merge_dialect,
    read_section, store, write_legacy_section, write_section,
};
use vocab_types::{Dialect, VocabEntry};

fn data_root() -> (TempDir, DataRoot) {
    let dir = tempfile::tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    (dir, root)
}

fn entry(english: &str, tr: &str, ar: &str) -> VocabEntry {
    VocabEntry::new(english, tr, ar)
}

#[test]
fn merges_sections_into_all_files() {
    let (_dir, root) = data_root();
    write_section(
        &root,
        Dialect::Egyptian,
        "animals",
        &[entry("cat", "'oTTa", "قطة"), entry("dog", "kalb", "كلب")],
    )
    .unwrap();
    write_section(
        &root,
        Dialect::Egyptian,
        "pets",
        &[entry("cat", "'oTTa", "قطة"), entry("", "x", "y")],
    )
    .unwrap();

    let outcome = merge_dialect(&root, Dialect::Egyptian, None).unwrap();
    let DialectOutcome::Merged {
        total, sections, ..
    } = outcome
    else {
        panic!("expected a merged outcome");
    };
    assert_eq!(total, 2);
    assert_eq!(sections.len(), 2);

    let all = read_section(&root.section_json(Dialect::Egyptian, "all")).unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|e| e.source.as_deref() == Some("animals")));

    let csv = fs::read_to_string(root.section_csv(Dialect::Egyptian, "all")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("english,transliteration,arabic,source"));
    assert_eq!(lines.next(), Some("cat,'oTTa,قطة,animals"));
}

#[test]
fn audio_column_appears_only_when_used() {
    let (_dir, root) = data_root();
    write_section(
        &root,
        Dialect::Levantine,
        "food",
        &[
            entry("bread", "khubz", "خبز").with_audio("https://x/bread.mp3"),
            entry("water", "mayy", "مي"),
        ],
    )
    .unwrap();
    merge_dialect(&root, Dialect::Levantine, None).unwrap();

    let csv = fs::read_to_string(root.section_csv(Dialect::Levantine, "all")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "english,transliteration,arabic,audioUrl,source");
    assert_eq!(lines[1], "bread,khubz,خبز,https://x/bread.mp3,food");
    assert_eq!(lines[2], "water,mayy,مي,,food");

    let json = fs::read_to_string(root.section_json(Dialect::Levantine, "all")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["audioUrl"], "https://x/bread.mp3");
    assert!(parsed[1].get("audioUrl").is_none());
}

#[test]
fn malformed_section_is_skipped() {
    let (_dir, root) = data_root();
    write_section(&root, Dialect::Darija, "numbers", &[entry("one", "wa7ed", "واحد")]).unwrap();
    fs::write(root.section_json(Dialect::Darija, "broken"), "{ not json").unwrap();

    let outcome = merge_dialect(&root, Dialect::Darija, None).unwrap();
    let DialectOutcome::Merged {
        total, sections, ..
    } = outcome
    else {
        panic!("expected a merged outcome");
    };
    assert_eq!(total, 1);
    let skipped: Vec<&SectionOutcome> = sections.iter().filter(|s| s.is_skipped()).collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].section(), "broken");
}

#[test]
fn missing_dialect_directory_is_skipped() {
    let (_dir, root) = data_root();
    write_section(&root, Dialect::Egyptian, "animals", &[entry("cat", "'oTTa", "قطة")]).unwrap();

    let report = merge_all(&root, &Catalog::builtin());
    assert_eq!(report.dialects.len(), 4);
    assert!(matches!(report.dialects[0], DialectOutcome::Merged { total: 1, .. }));
    for outcome in &report.dialects[1..] {
        assert!(matches!(outcome, DialectOutcome::Skipped { .. }));
    }
    assert!(!root.json_dir(Dialect::Levantine).exists());
    assert_eq!(report.total_entries(), 1);
}

#[test]
fn rerun_ignores_previous_output() {
    let (_dir, root) = data_root();
    write_section(
        &root,
        Dialect::ModernStandard,
        "time",
        &[entry("day", "yawm", "يوم"), entry("night", "layl", "ليل")],
    )
    .unwrap();

    merge_dialect(&root, Dialect::ModernStandard, None).unwrap();
    let first = fs::read(root.section_json(Dialect::ModernStandard, "all")).unwrap();
    merge_dialect(&root, Dialect::ModernStandard, None).unwrap();
    let second = fs::read(root.section_json(Dialect::ModernStandard, "all")).unwrap();
    assert_eq!(first, second);

    let all = read_section(&root.section_json(Dialect::ModernStandard, "all")).unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn catalog_order_decides_which_source_wins() {
    let (_dir, root) = data_root();
    write_section(&root, Dialect::Darija, "a_first", &[entry("tea", "atay", "أتاي")]).unwrap();
    write_section(&root, Dialect::Darija, "b_second", &[entry("tea", "atay", "أتاي")]).unwrap();

    let catalog = Catalog::from_toml_str(
        r#"
        [[dialect]]
        name = "darija"
        sections = ["b_second", "a_first", "missing"]
        "#,
    )
    .unwrap();
    let report = merge_all(&root, &catalog);
    assert_eq!(report.dialects.len(), 1);
    let DialectOutcome::Merged { sections, .. } = &report.dialects[0] else {
        panic!("expected a merged outcome");
    };
    assert_eq!(
        sections[2],
        SectionOutcome::Skipped {
            section: "missing".into(),
            reason: "file not found".into(),
        }
    );

    let all = read_section(&root.section_json(Dialect::Darija, "all")).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].source.as_deref(), Some("b_second"));
}

#[test]
fn section_files_round_trip_through_csv() {
    let (_dir, root) = data_root();
    let entries = vec![
        entry("big, large", "kbiir", "كبير"),
        entry("he said \"no\"", "'aal la'", "قال لأ"),
        entry("line\nbreak", "x", "y"),
    ];
    let files = write_section(&root, Dialect::Egyptian, "tricky", &entries).unwrap();
    assert_eq!(store::read_csv_file(&files.csv).unwrap(), entries);
    assert_eq!(read_section(&files.json).unwrap(), entries);
}

#[test]
fn entries_without_text_fields_skip_alone() {
    let (_dir, root) = data_root();
    fs::create_dir_all(root.json_dir(Dialect::Egyptian)).unwrap();
    fs::write(
        root.section_json(Dialect::Egyptian, "b"),
        r#"[{"english":"dog","transliteration":"kalb","arabic":"كلب"},
            {"transliteration":"x","arabic":"y"},
            42]"#,
    )
    .unwrap();
    fs::write(
        root.section_json(Dialect::Egyptian, "c"),
        r#"[{"english":"tea","transliteration":null,"arabic":"شاي"}]"#,
    )
    .unwrap();

    let outcome = merge_dialect(&root, Dialect::Egyptian, None).unwrap();
    let DialectOutcome::Merged {
        total, sections, ..
    } = outcome
    else {
        panic!("expected a merged outcome");
    };
    assert_eq!(total, 2);
    assert_eq!(
        sections,
        vec![
            SectionOutcome::Merged {
                section: "b".into(),
                added: 1,
                duplicates: 0,
                blank: 2,
            },
            SectionOutcome::Merged {
                section: "c".into(),
                added: 1,
                duplicates: 0,
                blank: 0,
            },
        ]
    );

    let all = read_section(&root.section_json(Dialect::Egyptian, "all")).unwrap();
    assert_eq!(all[0].english, "dog");
    assert_eq!(all[1].english, "tea");
    assert_eq!(all[1].transliteration, "");
}

#[test]
fn merged_layout_round_trips_through_csv() {
    let (_dir, root) = data_root();
    let entries = vec![
        entry("bread", "khubz", "خبز")
            .with_audio("https://x/bread.mp3?a=1,b=2")
            .with_source("food, \"daily\"\nstaples"),
        entry("water", "mayy", "مي").with_source("plain"),
    ];
    let layout = CsvLayout::for_corpus(&entries);
    assert!(layout.audio && layout.source);

    let path = root.section_csv(Dialect::Levantine, "all");
    store::write_csv_file(&path, &entries, layout).unwrap();
    assert_eq!(store::read_csv_file(&path).unwrap(), entries);
}

#[test]
fn dialect_without_sections_writes_nothing() {
    let (_dir, root) = data_root();
    fs::create_dir_all(root.json_dir(Dialect::Darija)).unwrap();

    let outcome = merge_dialect(&root, Dialect::Darija, None).unwrap();
    assert_eq!(
        outcome,
        DialectOutcome::Skipped {
            dialect: Dialect::Darija,
            reason: "no section files".into(),
        }
    );
    assert!(!root.section_json(Dialect::Darija, "all").exists());
    assert!(!root.section_csv(Dialect::Darija, "all").exists());
}

#[test]
fn legacy_sections_land_in_flat_namespace() {
    let (_dir, root) = data_root();
    let entries = vec![entry("cat", "'oTTa", "قطة")];
    let files = write_legacy_section(&root, "animals", &entries).unwrap();
    assert_eq!(files.json, root.legacy_json("animals"));
    assert_eq!(files.csv, root.legacy_csv("animals"));
    assert_eq!(read_section(&files.json).unwrap(), entries);
    assert!(!root.json_dir(Dialect::Egyptian).exists());
}
