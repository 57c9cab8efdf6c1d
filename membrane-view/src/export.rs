//! Saving rendered frames as PNG files.

use std::path::{Path, PathBuf};

use egui::{Color32, ColorImage};
use image::RgbaImage;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("frame of {len} bytes does not fit {width}x{height} RGBA")]
    BufferSize { width: u32, height: u32, len: usize },

    #[error("failed to create export directory {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Random id shaped like `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`.
pub fn unique_id(rng: &mut impl Rng) -> String {
    let a: u32 = rng.random();
    let b: u16 = rng.random();
    let c: u16 = rng.random();
    let d: u16 = rng.random();
    let e: u64 = rng.random::<u64>() & 0xffff_ffff_ffff;
    format!("{a:08x}-{b:04x}-{c:04x}-{d:04x}-{e:012x}")
}

pub fn render_file_name(rng: &mut impl Rng) -> String {
    format!("render{}.png", unique_id(rng))
}

/// Packs egui pixels into an 8-bit RGBA image.
///
/// ### Errors
/// [`ExportError::BufferSize`] if `pixels` does not hold exactly
/// `width * height` entries.
pub fn to_rgba(size: [usize; 2], pixels: &[Color32]) -> Result<RgbaImage, ExportError> {
    let [width, height] = size;
    let (width, height) = (width as u32, height as u32);
    let bytes: Vec<u8> = pixels.iter().flat_map(|p| p.to_array()).collect();
    let len = bytes.len();
    RgbaImage::from_raw(width, height, bytes).ok_or(ExportError::BufferSize { width, height, len })
}

/// Writes `frame` into `dir` under a freshly generated name.
///
/// ### Returns
/// The path of the written file.
pub fn save_frame(frame: &ColorImage, dir: &Path, rng: &mut impl Rng) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(render_file_name(rng));
    let img = to_rgba(frame.size, &frame.pixels)?;
    img.save(&path).map_err(|source| ExportError::Encode {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}
