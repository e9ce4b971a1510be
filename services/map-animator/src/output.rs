//! Frame file naming and persistence.

use std::fs;
use std::path::{Path, PathBuf};

use map_common::MapResult;
use renderer::RenderedMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Image file format of the saved frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    #[serde(alias = "jpeg")]
    Jpg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
        }
    }
}

/// Encoding settings applied to every saved frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveSettings {
    pub format: ImageFormat,
    pub dpi: u32,
    pub transparent: bool,
    pub jpeg_quality: u8,
}

/// `<base>.<offset + index>.<ext>`, e.g. `T500_air.100.png` for the first step.
pub fn frame_file_name(base: &str, offset: usize, index: usize, format: ImageFormat) -> String {
    format!("{}.{}.{}", base, offset + index, format.extension())
}

pub fn frame_path(
    dir: &Path,
    base: &str,
    offset: usize,
    index: usize,
    format: ImageFormat,
) -> PathBuf {
    dir.join(frame_file_name(base, offset, index, format))
}

/// Encode `map` and write it to `path`, returning the number of bytes written.
///
/// Takes the map by value: the canvas is released as soon as the file is
/// written.
pub fn save_frame(map: RenderedMap, path: &Path, settings: &SaveSettings) -> MapResult<usize> {
    let bytes = match settings.format {
        ImageFormat::Png => map.encode_png(settings.dpi, settings.transparent)?,
        ImageFormat::Jpg => {
            if settings.transparent {
                warn!("JPEG has no alpha channel, writing an opaque background");
            }
            map.encode_jpeg(settings.jpeg_quality)?
        }
    };
    drop(map);

    fs::write(path, &bytes)?;
    debug!(path = %path.display(), size = bytes.len(), "Saved frame");
    Ok(bytes.len())
}
