/// Photo gallery listing
///
/// The gallery is a live view of the photo folder: it is listed again every
/// time the gallery screen opens and nothing is kept between visits.
use image::imageops::FilterType;
use std::path::PathBuf;
use tokio::task;
use walkdir::WalkDir;

use crate::config::{PHOTO_EXTENSION, THUMBNAIL_SIZE};
use crate::error::Result;

/// One photo found in the folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    pub path: PathBuf,
}

impl GalleryEntry {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// Decode the photo and shrink it to fit `max_size` on its longest edge
    pub fn load_thumbnail(&self, max_size: u32) -> Result<Thumbnail> {
        let img = image::open(&self.path)?;
        let thumb = if img.width() > max_size || img.height() > max_size {
            img.resize(max_size, max_size, FilterType::Triangle)
        } else {
            img
        };
        let rgba = thumb.to_rgba8();

        Ok(Thumbnail {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }
}

/// Decoded RGBA thumbnail ready to hand to the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// One grid cell per listed photo. `thumbnail` is `None` when the file
/// could not be decoded; the cell is still shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryTile {
    pub entry: GalleryEntry,
    pub thumbnail: Option<Thumbnail>,
}

/// Numbers gallery visits so a thumbnail load can tell whether the visit
/// that started it is still on screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct GalleryVisit {
    counter: u64,
    open: bool,
}

impl GalleryVisit {
    /// Start a new visit and return its id
    pub fn begin(&mut self) -> u64 {
        self.counter += 1;
        self.open = true;
        self.counter
    }

    pub fn end(&mut self) {
        self.open = false;
    }

    /// Id of the visit on screen, if the gallery is showing
    pub fn current(&self) -> Option<u64> {
        self.open.then_some(self.counter)
    }

    pub fn is_current(&self, visit: u64) -> bool {
        self.current() == Some(visit)
    }
}

/// Lists the photos in one folder
#[derive(Debug, Clone)]
pub struct GalleryIndex {
    dir: PathBuf,
}

impl GalleryIndex {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// List every file whose name ends in `.png`, in the order the
    /// filesystem returns them.
    pub fn refresh(&self) -> Vec<GalleryEntry> {
        let suffix = format!(".{}", PHOTO_EXTENSION);
        let mut entries = Vec::new();

        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("cannot list {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().ends_with(&suffix) {
                entries.push(GalleryEntry {
                    path: entry.into_path(),
                });
            }
        }

        tracing::debug!("gallery lists {} photos in {}", entries.len(), self.dir.display());
        entries
    }
}

/// Decode thumbnails for `entries` on the blocking pool.
/// Returns one tile per entry, in order. Photos that fail to decode are
/// logged and keep a tile without a thumbnail.
pub async fn load_thumbnails(entries: Vec<GalleryEntry>) -> Vec<GalleryTile> {
    let fallback = entries.clone();
    task::spawn_blocking(move || {
        entries
            .into_iter()
            .map(|entry| {
                let thumbnail = match entry.load_thumbnail(THUMBNAIL_SIZE) {
                    Ok(thumb) => Some(thumb),
                    Err(e) => {
                        tracing::warn!("no thumbnail for {}: {}", entry.path.display(), e);
                        None
                    }
                };
                GalleryTile { entry, thumbnail }
            })
            .collect()
    })
    .await
    .unwrap_or_else(|e| {
        tracing::error!("thumbnail task failed: {}", e);
        fallback
            .into_iter()
            .map(|entry| GalleryTile {
                entry,
                thumbnail: None,
            })
            .collect()
    })
}
