use thiserror::Error;
use vocab_corpus::CorpusError;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("no vocabulary table on {0}")]
    NoTable(String),
    #[error("cannot derive a section name for {0}")]
    NoSectionName(String),
    #[error(transparent)]
    Corpus(#[from] CorpusError),
}
