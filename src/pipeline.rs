// THEORY:
// The `pipeline` module is the top-level API for the whole mosaic engine.
// It encapsulates the stage sequence into a single, easy-to-drive interface:
// collect album metadata, download cover art, order the set with the
// configured strategy, compose the mosaic. Each method corresponds to one
// stage, so callers that already own metadata or art can skip straight to
// the stage they need.
//
// Progress is a side channel: callers hand the pipeline an observer and the
// stages report (stage, completed, total) through it. There is no
// process-wide reporting state anywhere in the engine.
//
// The pipeline owns the accumulated state between stages. The parallel-array
// invariant is carried by `AlbumSet`, so a half-initialized pipeline can
// never hand a mismatched pair to a strategy.

use crate::core_modules::album::{AlbumRecord, AlbumSet};
use crate::core_modules::collector::{self, ArtSource, CatalogSource};
use crate::core_modules::mosaic;
use crate::core_modules::sequencer::SortStrategy;
use crate::error::MosaicError;
use image::RgbImage;

/// The pipeline stages a progress observer can hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CollectingAlbums,
    DownloadingArt,
    Sorting,
    Composing,
}

/// Callback hook for progress reporting. `completed` counts finished units
/// of `total` for the given stage.
pub trait ProgressObserver {
    fn on_progress(&mut self, stage: Stage, completed: usize, total: usize);
}

/// The default observer: hears everything, says nothing.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _stage: Stage, _completed: usize, _total: usize) {}
}

/// Configuration for the `MosaicPipeline`.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Which ordering strategy `sort` dispatches to.
    pub strategy: SortStrategy,
    /// Per-tile resolution `(width, height)` of the finished mosaic.
    pub tile_resolution: (u32, u32),
    /// Page size for catalog pagination.
    pub batch_size: usize,
    /// How many unique albums to collect.
    pub target_count: usize,
    /// Seed for the color strategy's embedding; fixed seed, fixed layout.
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strategy: SortStrategy::ByDate,
            tile_resolution: (1000, 1000),
            batch_size: 25,
            target_count: 50,
            seed: 42,
        }
    }
}

/// The main, top-level struct for the mosaic engine.
pub struct MosaicPipeline {
    config: PipelineConfig,
    progress: Box<dyn ProgressObserver>,
    albums: Vec<AlbumRecord>,
    set: Option<AlbumSet>,
}

impl MosaicPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_progress(config, Box::new(NoProgress))
    }

    /// Builds a pipeline that reports stage progress to `observer`.
    pub fn with_progress(config: PipelineConfig, observer: Box<dyn ProgressObserver>) -> Self {
        Self {
            config,
            progress: observer,
            albums: Vec::new(),
            set: None,
        }
    }

    /// Stage 1: accumulate unique albums from the paginated catalog.
    pub fn collect(&mut self, source: &mut dyn CatalogSource) -> Result<(), MosaicError> {
        self.albums = collector::collect_albums(
            source,
            self.config.batch_size,
            self.config.target_count,
            self.progress.as_mut(),
        )?;
        self.set = None;
        Ok(())
    }

    /// Stage 2: download one cover per collected album.
    pub fn download_art(&mut self, source: &mut dyn ArtSource) -> Result<(), MosaicError> {
        let albums = std::mem::take(&mut self.albums);
        self.set = Some(collector::fetch_art(
            albums,
            source,
            self.progress.as_mut(),
        )?);
        Ok(())
    }

    /// Stage 3: reorder the set with the configured strategy.
    pub fn sort(&mut self) -> Result<(), MosaicError> {
        let set = self.set.take().unwrap_or_else(AlbumSet::empty);
        let total = set.len();
        let sorted = self.config.strategy.apply(set, self.config.seed)?;
        self.progress.on_progress(Stage::Sorting, total, total);
        self.set = Some(sorted);
        Ok(())
    }

    /// Stage 4: tile the ordered covers into the final mosaic.
    ///
    /// The composite is returned in memory; persisting it is the caller's
    /// business (see `core_modules::utils::image_helper` for a PNG helper).
    pub fn generate(&mut self) -> RgbImage {
        let set = self.set.take().unwrap_or_else(AlbumSet::empty);
        let (tile_w, tile_h) = self.config.tile_resolution;
        let mosaic = mosaic::compose(&set, tile_w, tile_h);
        self.progress.on_progress(Stage::Composing, set.len(), set.len());
        self.set = Some(set);
        mosaic
    }

    /// The current album set, if art has been downloaded.
    pub fn album_set(&self) -> Option<&AlbumSet> {
        self.set.as_ref()
    }

    /// Replaces the pipeline's state with an already-assembled set. Lets
    /// callers that own metadata and art skip the collection stages.
    pub fn load_set(&mut self, set: AlbumSet) {
        self.albums.clear();
        self.set = Some(set);
    }
}
