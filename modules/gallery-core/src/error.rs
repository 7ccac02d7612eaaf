use thiserror::Error;

pub type Result<T> = std::result::Result<T, GalleryError>;

#[derive(Debug, Error)]
pub enum GalleryError {
    /// The caller's filter failed validation. Rejected before any remote
    /// call is attempted; the only error `Gallery::query` returns.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// The remote search provider failed or timed out. Recovered inside the
    /// facade as an empty page, never propagated to the caller.
    #[error("Search unavailable: {0}")]
    SearchUnavailable(#[source] anyhow::Error),
}
