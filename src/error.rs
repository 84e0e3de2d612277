// THEORY:
// Every failure the engine can produce is a distinct, inspectable kind, so
// that calling code can decide whether to skip an album or abort the whole
// mosaic. There is deliberately no catch-all variant: the core has exactly
// three ways to fail, and each one carries enough context to report upstream.
//
// All errors abort the current strategy or composition call entirely. There
// is no partial-result or retry policy at this layer; retries for a flaky
// art fetch belong to the caller's `ArtSource` implementation.

use thiserror::Error;

/// All error kinds surfaced by the mosaic engine.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// The Date Strategy encountered a release date it cannot order.
    #[error("invalid release date {value:?} for album {album_id:?}")]
    InvalidDateFormat { album_id: String, value: String },

    /// A cover image could not be decoded, re-encoded, or written.
    #[error("failed to decode or encode cover art")]
    ImageDecode(#[from] image::ImageError),

    /// The paginated catalog collaborator failed while fetching a batch.
    #[error("catalog source error: {0}")]
    Catalog(String),
}
