use image::{imageops, GrayImage};

/// Mean luminance below this means a dark-theme capture
const DARK_MEAN_CUTOFF: f64 = 128.0;

/// Invert light-on-dark captures so structure lines end up dark on light
pub fn apply(mut image: GrayImage) -> GrayImage {
    let mean = mean_luminance(&image);
    if mean < DARK_MEAN_CUTOFF {
        tracing::debug!("Mean luminance {:.1}, inverting dark-theme capture", mean);
        imageops::invert(&mut image);
    }
    image
}

fn mean_luminance(image: &GrayImage) -> f64 {
    let count = image.as_raw().len();
    if count == 0 {
        return 255.0;
    }
    let sum: u64 = image.as_raw().iter().map(|&v| v as u64).sum();
    sum as f64 / count as f64
}
