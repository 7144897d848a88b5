//! Persisted vocabulary corpora.
//!
//! Every dialect owns a directory under a data root holding one JSON and one
//! CSV file per section plus the merged `all` corpus. This crate knows that
//! layout ([`DataRoot`]), the dialect/source catalog ([`Catalog`]), how
//! section files are written and read ([`store`]), and how sections are
//! folded into a deduplicated corpus ([`merge`]).
//!
//! ```no_run
//! use vocab_corpus::{Catalog, DataRoot, merge_all};
//!
//! let root = DataRoot::new("data");
//! let catalog = Catalog::load("vocab.toml").unwrap();
//! let report = merge_all(&root, &catalog);
//! println!("{report}");
//! ```

pub mod catalog;
pub mod csv_file;
pub mod error;
pub mod layout;
pub mod merge;
pub mod store;

pub use catalog::{Catalog, ConfigError, DialectSections, SourceConfig, SourceKind};
pub use csv_file::CsvLayout;
pub use error::CorpusError;
pub use layout::{COMBINED_SECTION, DataRoot, is_valid_section_name};
pub use merge::{
    Corpus, DialectOutcome, MergeReport, SectionOutcome, merge_all, merge_dialect, merge_sections,
};
pub use store::{SectionFiles, read_section, write_legacy_section, write_section};
