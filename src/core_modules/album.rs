// THEORY:
// The `album` module defines the two data shapes everything else in the
// engine agrees on.
//
// 1.  **AlbumRecord**: the immutable metadata for one album as it arrives
//     from the catalog. The engine only ever reads it.
// 2.  **AlbumSet**: the parallel-array association between records and their
//     decoded cover art. The two vectors are kept in lock-step by index:
//     `albums[i]` and `art[i]` always describe the same logical album. Every
//     transformation in the engine is a permutation of an `AlbumSet`, never
//     a drop or a duplication, so the invariant `albums.len() == art.len()`
//     holds at every pipeline boundary. The fields are private and the only
//     way to reorder is `permute`, which checks its argument.

use image::DynamicImage;

/// Metadata for a single album, as supplied by the catalog source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRecord {
    /// Unique catalog identifier, used for deduplication.
    pub id: String,
    /// Primary artist name.
    pub artist: String,
    /// Album title.
    pub name: String,
    /// ISO-like release date (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
    /// Lexicographic order on the validated string is chronological order.
    pub release_date: String,
    /// Reference the art source resolves to a cover image.
    pub art_url: String,
}

/// Parallel arrays of album metadata and decoded cover art.
#[derive(Debug)]
pub struct AlbumSet {
    albums: Vec<AlbumRecord>,
    art: Vec<DynamicImage>,
}

impl AlbumSet {
    /// Pairs records with their covers.
    ///
    /// Panics if the two vectors disagree in length; that is a caller bug,
    /// not a recoverable condition.
    pub fn new(albums: Vec<AlbumRecord>, art: Vec<DynamicImage>) -> Self {
        assert_eq!(
            albums.len(),
            art.len(),
            "album metadata and cover art must be parallel arrays"
        );
        Self { albums, art }
    }

    /// An empty set, the identity input for every strategy.
    pub fn empty() -> Self {
        Self {
            albums: Vec::new(),
            art: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    pub fn albums(&self) -> &[AlbumRecord] {
        &self.albums
    }

    pub fn art(&self) -> &[DynamicImage] {
        &self.art
    }

    /// Consumes the set, handing both vectors back to the caller.
    pub fn into_parts(self) -> (Vec<AlbumRecord>, Vec<DynamicImage>) {
        (self.albums, self.art)
    }

    /// Reorders both arrays in lock-step: element `order[i]` of the input
    /// becomes element `i` of the output.
    ///
    /// `order` must be a permutation of `0..len`. Panics otherwise, since a
    /// non-permutation would silently drop or duplicate an album.
    pub fn permute(self, order: &[usize]) -> Self {
        assert_eq!(order.len(), self.albums.len(), "order must cover every album");
        let mut seen = vec![false; order.len()];
        for &i in order {
            assert!(!seen[i], "order must not repeat an index");
            seen[i] = true;
        }

        let mut albums: Vec<Option<AlbumRecord>> = self.albums.into_iter().map(Some).collect();
        let mut art: Vec<Option<DynamicImage>> = self.art.into_iter().map(Some).collect();

        let reordered_albums = order.iter().map(|&i| albums[i].take().unwrap()).collect();
        let reordered_art = order.iter().map(|&i| art[i].take().unwrap()).collect();

        Self {
            albums: reordered_albums,
            art: reordered_art,
        }
    }
}
