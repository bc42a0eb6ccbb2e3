// Image composer module
// Clamps the alpha channel of a source image and writes the derived PNG

use image::{DynamicImage, ImageError, ImageFormat, ImageResult, RgbaImage};
use log::{info, warn};
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix appended to the terminal name for generated images
pub const OUTPUT_SUFFIX: &str = "_bgimage";

/// Errors raised while composing a background image
#[derive(Error, Debug)]
pub enum ComposeError {
    /// The source image could not be read from disk
    #[error("failed to read image {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// The source bytes are not a decodable image
    #[error("failed to decode image {path}: {source}")]
    Decode { path: PathBuf, source: ImageError },

    /// The derived PNG could not be written
    #[error("failed to write image {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    /// The derived PNG could not be encoded
    #[error("failed to encode image {path}: {source}")]
    Encode { path: PathBuf, source: ImageError },
}

impl ComposeError {
    /// True when the source image itself is fine and only the output failed
    pub fn is_output_side(&self) -> bool {
        matches!(self, ComposeError::Write { .. } | ComposeError::Encode { .. })
    }
}

/// Path of the generated image for `terminal`, next to `image_path`
pub fn output_path(image_path: &Path, terminal: &str) -> PathBuf {
    let dir = image_path.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{terminal}{OUTPUT_SUFFIX}.png"))
}

/// Load `image_path`, cap every pixel's alpha at `alpha` and save the result
/// as `<dir>/<terminal>_bgimage.png`, overwriting any previous one.
pub fn compose(image_path: &Path, alpha: u8, terminal: &str) -> Result<PathBuf, ComposeError> {
    info!("Creating new background image with alpha {alpha}");

    let data = fs::read(image_path).map_err(|source| ComposeError::Read {
        path: image_path.to_path_buf(),
        source,
    })?;
    let img = load_from_bytes(&data).map_err(|source| ComposeError::Decode {
        path: image_path.to_path_buf(),
        source,
    })?;

    let mut rgba = img.to_rgba8();
    clamp_alpha(&mut rgba, alpha);

    let output = output_path(image_path, terminal);
    rgba.save_with_format(&output, ImageFormat::Png)
        .map_err(|err| match err {
            ImageError::IoError(source) => ComposeError::Write {
                path: output.clone(),
                source,
            },
            source => ComposeError::Encode {
                path: output.clone(),
                source,
            },
        })?;

    info!("Image generated: {}", output.display());
    Ok(output)
}

/// Compose, falling back to the untouched `image_path` when only the output
/// could not be produced. Source-side failures are still returned.
pub fn compose_or_original(
    image_path: &Path,
    alpha: u8,
    terminal: &str,
) -> Result<PathBuf, ComposeError> {
    match compose(image_path, alpha, terminal) {
        Ok(output) => Ok(output),
        Err(err) if err.is_output_side() => {
            warn!("{err}; using the original image instead");
            Ok(image_path.to_path_buf())
        }
        Err(err) => Err(err),
    }
}

/// Lower each pixel's alpha to at most `alpha`, keeping existing transparency
pub fn clamp_alpha(img: &mut RgbaImage, alpha: u8) {
    for pixel in img.pixels_mut() {
        pixel[3] = pixel[3].min(alpha);
    }
}

/// Load an image from raw bytes, auto-detecting the format
pub fn load_from_bytes(data: &[u8]) -> ImageResult<DynamicImage> {
    let format = image::guess_format(data)?;
    image::load(Cursor::new(data), format)
}

/// Get the image format for a supported file extension
pub fn format_from_extension(ext: &str) -> Option<ImageFormat> {
    match ext.to_lowercase().as_str() {
        "png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        _ => None,
    }
}
