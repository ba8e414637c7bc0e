//! Upload decoding
//!
//! Turns raw upload bytes into a [`RasterImage`]. The format is guessed from the
//! content, never from the client-supplied MIME type.

use crate::error::MoleculeError;
use image::{ColorType, DynamicImage, ImageFormat};

/// Color layout of a decoded upload
///
/// Palette-indexed sources never appear here: decoders expand them to
/// [`ColorMode::Rgb`], or to [`ColorMode::Rgba`] when the palette carries
/// transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Luma,
    LumaAlpha,
    Rgb,
    Rgba,
}

impl ColorMode {
    fn from_color_type(color: ColorType) -> Self {
        match (color.has_color(), color.has_alpha()) {
            (false, false) => Self::Luma,
            (false, true) => Self::LumaAlpha,
            (true, false) => Self::Rgb,
            (true, true) => Self::Rgba,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::LumaAlpha | Self::Rgba)
    }
}

/// A decoded upload together with its color metadata
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub image: DynamicImage,
    pub mode: ColorMode,
    pub format: Option<ImageFormat>,
}

impl RasterImage {
    pub fn new(image: DynamicImage, format: Option<ImageFormat>) -> Self {
        let mode = ColorMode::from_color_type(image.color());
        Self {
            image,
            mode,
            format,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decode an uploaded image
pub fn load(bytes: &[u8]) -> Result<RasterImage, MoleculeError> {
    let format = image::guess_format(bytes).ok();

    let image = image::load_from_memory(bytes)
        .map_err(|e| MoleculeError::DecodeError(e.to_string()))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(MoleculeError::DecodeError(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }

    let raster = RasterImage::new(image, format);

    tracing::debug!(
        "Decoded {:?} upload: {}x{}, {:?}",
        raster.format,
        raster.width(),
        raster.height(),
        raster.mode
    );

    Ok(raster)
}
