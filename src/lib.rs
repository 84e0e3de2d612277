// THEORY:
// This file is the main entry point for the `album_mosaic` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers.
//
// The primary goal is to export the `MosaicPipeline` and its associated data
// structures (`PipelineConfig`, `SortStrategy`, `AlbumRecord`, etc.) as the
// clean, high-level interface for the entire mosaic engine. The stage
// implementations live in `core_modules` and stay reachable for callers that
// want to drive individual stages themselves.

pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use crate::core_modules::album::{AlbumRecord, AlbumSet};
pub use crate::core_modules::collector::{ArtSource, CatalogSource};
pub use crate::core_modules::sequencer::SortStrategy;
pub use crate::error::MosaicError;
pub use crate::pipeline::{MosaicPipeline, NoProgress, PipelineConfig, ProgressObserver, Stage};
