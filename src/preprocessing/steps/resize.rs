use image::{imageops, imageops::FilterType, GrayImage};

/// Below this the engine loses detail
pub const MIN_DIMENSION: u32 = 400;
/// Above this processing slows without accuracy gains
pub const MAX_DIMENSION: u32 = 1500;

/// Bring the shorter side up to `MIN_DIMENSION`, then the longer side down to
/// `MAX_DIMENSION`
///
/// The two checks run in sequence on the dimensions: the downscale is measured
/// on the upscaled size. Pixels are resampled once, straight to the final size,
/// so thin strips never materialize the upscaled intermediate. Resampled output
/// is snapped back to binary.
pub fn apply(image: GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let (target_width, target_height) = target_dimensions(width, height);

    if (target_width, target_height) == (width, height) {
        return image;
    }

    tracing::debug!(
        "Resizing {}x{} to {}x{}",
        width,
        height,
        target_width,
        target_height
    );
    let mut img = imageops::resize(&image, target_width, target_height, FilterType::Lanczos3);
    rebinarize(&mut img);
    img
}

/// Final size after the minimum rule and then the maximum rule
fn target_dimensions(width: u32, height: u32) -> (u32, u32) {
    let (mut w, mut h) = (width, height);

    if w.min(h) < MIN_DIMENSION {
        (w, h) = scaled_dimensions(w, h, w.min(h), MIN_DIMENSION);
    }
    if w.max(h) > MAX_DIMENSION {
        (w, h) = scaled_dimensions(w, h, w.max(h), MAX_DIMENSION);
    }
    (w, h)
}

/// Uniform scale mapping the `reference` side to exactly `target`
fn scaled_dimensions(width: u32, height: u32, reference: u32, target: u32) -> (u32, u32) {
    let scale = |side: u32| ((side as u64 * target as u64) / reference as u64).max(1) as u32;
    (scale(width), scale(height))
}

/// Lanczos ringing leaves greys along stroke edges
fn rebinarize(image: &mut GrayImage) {
    for pixel in image.pixels_mut() {
        pixel.0[0] = if pixel.0[0] >= 128 { 255 } else { 0 };
    }
}
