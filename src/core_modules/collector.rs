// THEORY:
// The `collector` module is the boundary to the two external collaborators:
// the paginated catalog that knows the listener's top albums, and the art
// source that turns an album's art reference into a decoded image. Both are
// traits, so the engine never speaks HTTP itself; callers plug in a real
// client (or a fixture in tests).
//
// Collection is an explicit accumulator driven by offset/limit pagination:
// fetch a batch, keep the records whose id has not been seen, advance the
// offset by the batch size, stop once the target count of unique albums is
// reached or the catalog runs dry. Duplicates are common because the
// catalog is track-oriented and many top tracks share an album.
//
// Art download walks the finished album list in order, so the resulting
// `AlbumSet` is parallel by construction. The first decode failure aborts
// the batch; a mosaic with holes is worse than no mosaic.

use crate::core_modules::album::{AlbumRecord, AlbumSet};
use crate::error::MosaicError;
use crate::pipeline::{ProgressObserver, Stage};
use image::DynamicImage;
use std::collections::HashSet;

/// A paginated source of the listener's top albums, ranked by listening
/// activity. `offset`/`limit` follow the usual catalog pagination contract.
pub trait CatalogSource {
    /// One page of album records. An empty page means the catalog is
    /// exhausted.
    fn top_albums(
        &mut self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<AlbumRecord>, MosaicError>;
}

/// Resolves an album's art reference to a decoded cover image.
pub trait ArtSource {
    fn fetch(&mut self, art_url: &str) -> Result<DynamicImage, MosaicError>;
}

/// Accumulates up to `target_count` unique albums from the catalog,
/// deduplicated by id, preserving first-seen order.
///
/// Stops early if the catalog returns an empty page, so a short catalog
/// yields fewer albums instead of looping forever.
pub fn collect_albums(
    source: &mut dyn CatalogSource,
    batch_size: usize,
    target_count: usize,
    progress: &mut dyn ProgressObserver,
) -> Result<Vec<AlbumRecord>, MosaicError> {
    assert!(batch_size > 0, "batch_size must be at least 1");

    let mut unique: Vec<AlbumRecord> = Vec::with_capacity(target_count);
    let mut seen: HashSet<String> = HashSet::with_capacity(target_count);
    let mut offset = 0;

    while unique.len() < target_count {
        let batch = source.top_albums(offset, batch_size)?;
        if batch.is_empty() {
            break;
        }

        for album in batch {
            if seen.insert(album.id.clone()) {
                unique.push(album);
                progress.on_progress(Stage::CollectingAlbums, unique.len(), target_count);
                if unique.len() == target_count {
                    break;
                }
            }
        }

        offset += batch_size;
    }

    Ok(unique)
}

/// Downloads one cover per record, in order, pairing them into an
/// `AlbumSet`. The first failed fetch aborts the whole download.
pub fn fetch_art(
    albums: Vec<AlbumRecord>,
    source: &mut dyn ArtSource,
    progress: &mut dyn ProgressObserver,
) -> Result<AlbumSet, MosaicError> {
    let total = albums.len();
    let mut art = Vec::with_capacity(total);

    for (i, album) in albums.iter().enumerate() {
        art.push(source.fetch(&album.art_url)?);
        progress.on_progress(Stage::DownloadingArt, i + 1, total);
    }

    Ok(AlbumSet::new(albums, art))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::NoProgress;
    use image::{DynamicImage, ImageError};

    fn record(id: &str) -> AlbumRecord {
        AlbumRecord {
            id: id.to_string(),
            artist: "Artist".to_string(),
            name: format!("Album {id}"),
            release_date: "2020-01-01".to_string(),
            art_url: format!("art://{id}"),
        }
    }

    /// A catalog whose pages repeat albums, like a track-oriented API does.
    struct FixtureCatalog {
        pages: Vec<Vec<AlbumRecord>>,
        calls: usize,
    }

    impl CatalogSource for FixtureCatalog {
        fn top_albums(
            &mut self,
            _offset: usize,
            _limit: usize,
        ) -> Result<Vec<AlbumRecord>, MosaicError> {
            let page = self.pages.get(self.calls).cloned().unwrap_or_default();
            self.calls += 1;
            Ok(page)
        }
    }

    struct FixtureArt {
        fail_on: Option<String>,
    }

    impl ArtSource for FixtureArt {
        fn fetch(&mut self, art_url: &str) -> Result<DynamicImage, MosaicError> {
            if self.fail_on.as_deref() == Some(art_url) {
                return Err(MosaicError::ImageDecode(ImageError::Unsupported(
                    image::error::UnsupportedError::from_format_and_kind(
                        image::error::ImageFormatHint::Unknown,
                        image::error::UnsupportedErrorKind::GenericFeature(
                            "corrupt fixture".to_string(),
                        ),
                    ),
                )));
            }
            Ok(DynamicImage::new_rgb8(4, 4))
        }
    }

    #[test]
    fn collection_dedups_across_batches_and_keeps_first_seen_order() {
        let mut catalog = FixtureCatalog {
            pages: vec![
                vec![record("a"), record("b"), record("a")],
                vec![record("b"), record("c"), record("d")],
            ],
            calls: 0,
        };

        let albums = collect_albums(&mut catalog, 3, 4, &mut NoProgress).unwrap();
        let ids: Vec<&str> = albums.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn collection_stops_when_the_catalog_is_exhausted() {
        let mut catalog = FixtureCatalog {
            pages: vec![vec![record("a")], vec![]],
            calls: 0,
        };

        let albums = collect_albums(&mut catalog, 5, 50, &mut NoProgress).unwrap();
        assert_eq!(albums.len(), 1);
    }

    #[test]
    fn collection_truncates_mid_batch_at_the_target() {
        let mut catalog = FixtureCatalog {
            pages: vec![vec![record("a"), record("b"), record("c")]],
            calls: 0,
        };

        let albums = collect_albums(&mut catalog, 3, 2, &mut NoProgress).unwrap();
        assert_eq!(albums.len(), 2);
    }

    #[test]
    fn art_download_builds_a_parallel_set() {
        let albums = vec![record("a"), record("b")];
        let mut source = FixtureArt { fail_on: None };

        let set = fetch_art(albums, &mut source, &mut NoProgress).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.albums().len(), set.art().len());
    }

    #[test]
    fn art_download_aborts_on_the_first_decode_failure() {
        let albums = vec![record("a"), record("b"), record("c")];
        let mut source = FixtureArt {
            fail_on: Some("art://b".to_string()),
        };

        let err = fetch_art(albums, &mut source, &mut NoProgress).unwrap_err();
        assert!(matches!(err, MosaicError::ImageDecode(_)));
    }
}
