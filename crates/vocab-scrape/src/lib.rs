//! Scraping of vocabulary tables into per-dialect section files.
//!
//! Page layouts understood:
//!
//! - desert-sky: five-column tables whose rows go through the
//!   [`Normalizer`](vocab_normalize::Normalizer) and are written once for the
//!   source's colloquial dialect and once for Modern Standard Arabic;
//! - desert-sky verbs: the same tables with every row kept whole;
//! - desert-sky proverbs: Arabic spans followed by transcription and
//!   English, written as one `proverbs` section;
//! - lingualism: four-column per-dialect tables taken as-is, with the audio
//!   URL lifted from each row's play button.
//!
//! With [`Scraper::with_legacy`] desert-sky pages are also written to the
//! flat `<root>/json` and `<root>/csv` directories.
//!
//! Pages are fetched one at a time with a fixed delay in between. A page that
//! fails to fetch or parse is reported and skipped.

pub mod desert_sky;
pub mod error;
pub mod fetch;
pub mod lingualism;
pub mod naming;
pub mod pipeline;
pub mod proverbs;

pub use error::ScrapeError;
pub use fetch::{DEFAULT_DELAY, Fetcher};
pub use pipeline::{
    PageOutcome, ScrapeReport, Scraper, SectionBatch, WrittenSection, desert_sky_batches,
    lingualism_batch, proverb_batch, verb_batches,
};
