// This file is an example of how to use the `album_mosaic` library.
// The main library entry point is `src/lib.rs`.

fn main() {
    println!("Album Mosaic Engine - Example Runner");
    // In a real application, you would implement `CatalogSource` and
    // `ArtSource` against your streaming service of choice, then drive the
    // pipeline stage by stage:
    //
    // let config = album_mosaic::PipelineConfig {
    //     strategy: album_mosaic::SortStrategy::ByColor,
    //     ..album_mosaic::PipelineConfig::default()
    // };
    // let mut pipeline = album_mosaic::MosaicPipeline::new(config);
    // pipeline.collect(&mut my_catalog)?;
    // pipeline.download_art(&mut my_art_client)?;
    // pipeline.sort()?;
    // let mosaic = pipeline.generate();
    // mosaic.save("mosaic.png")?;
}
