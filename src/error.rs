use thiserror::Error;

/// Errors surfaced by the mirror run.
///
/// `Config` is fatal before any network call. `Transfer` covers any failure
/// while listing, downloading, expanding or uploading; it aborts the
/// remaining per-object loop but keeps the already-published keys.
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Transfer(String),
}

impl From<std::io::Error> for MirrorError {
    fn from(err: std::io::Error) -> Self {
        MirrorError::Transfer(err.to_string())
    }
}
