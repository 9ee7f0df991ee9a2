//! Sprite sheet loading
//!
//! A sheet is a single PNG of fixed-width frames laid out left to right,
//! paired with a CSV descriptor whose rows name clips as inclusive frame
//! ranges: `name,start,end`. Loading is strict; a bad descriptor is an
//! error, never a silently empty clip.

use std::fs::File;
use std::path::{Path, PathBuf};

use image::{ImageReader, RgbaImage};
use serde::Deserialize;
use thiserror::Error;

use crate::sim::anim::ClipSet;
use crate::sim::rect::Rect;

/// What can go wrong while loading a sheet and its descriptor
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode sprite sheet: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to parse clip descriptor: {0}")]
    Descriptor(#[from] csv::Error),
    #[error("clip {name:?} wants frames {start}..={end} but the sheet has {frames}")]
    ClipOutOfRange {
        name: String,
        start: usize,
        end: usize,
        frames: usize,
    },
}

/// A decoded sprite sheet, kept in RGBA form for sampling
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    image: RgbaImage,
}

impl SpriteSheet {
    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel at sheet coordinates (origin top-left), as RGBA bytes
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }
}

impl From<RgbaImage> for SpriteSheet {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}

/// Slice a sheet into consecutive fixed-width, full-height frame rects.
///
/// Frames use sheet coordinates (origin top-left, y down). A partial
/// trailing column narrower than `frame_width` is discarded.
pub fn partition_frames(sheet_w: u32, sheet_h: u32, frame_width: f32) -> Vec<Rect> {
    let mut frames = Vec::new();
    let mut x = 0.0;
    while x + frame_width <= sheet_w as f32 {
        frames.push(Rect::new(x, 0.0, x + frame_width, sheet_h as f32));
        x += frame_width;
    }
    frames
}

/// One descriptor row: clip name plus an inclusive frame index range
#[derive(Debug, Deserialize)]
struct ClipRecord {
    name: String,
    start: usize,
    end: usize,
}

/// Parse descriptor rows into clips over the given frames.
///
/// Rows are headerless. A repeated name overwrites the earlier clip, so a
/// descriptor can shadow rows it inherited.
pub fn read_clip_table<R: std::io::Read>(
    reader: R,
    frames: &[Rect],
) -> Result<ClipSet, AssetError> {
    let mut rows = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut clips = ClipSet::new();
    for row in rows.deserialize() {
        let ClipRecord { name, start, end } = row?;
        if start > end || end >= frames.len() {
            return Err(AssetError::ClipOutOfRange {
                name,
                start,
                end,
                frames: frames.len(),
            });
        }
        clips.insert(name, frames[start..=end].to_vec());
    }
    Ok(clips)
}

/// Load a sheet image and its clip descriptor from disk
pub fn load_animation_sheet(
    sheet_path: &Path,
    descriptor_path: &Path,
    frame_width: f32,
) -> Result<(SpriteSheet, ClipSet), AssetError> {
    let reader = ImageReader::open(sheet_path).map_err(|source| AssetError::Io {
        path: sheet_path.to_path_buf(),
        source,
    })?;
    let image = reader.decode()?.to_rgba8();

    let frames = partition_frames(image.width(), image.height(), frame_width);
    let descriptor = File::open(descriptor_path).map_err(|source| AssetError::Io {
        path: descriptor_path.to_path_buf(),
        source,
    })?;
    let clips = read_clip_table(descriptor, &frames)?;

    Ok((SpriteSheet { image }, clips))
}
