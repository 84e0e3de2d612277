pub mod album;
pub mod collector;
pub mod embedding;
pub mod features;
pub mod grid_fit;
pub mod mosaic;
pub mod normalize;
pub mod sequencer;
pub mod utils;
