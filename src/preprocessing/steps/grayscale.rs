use image::{GrayImage, Luma, RgbImage};

/// Convert the flattened image to single-channel luminance
///
/// Uses the ITU-R 601 weights (0.299, 0.587, 0.114) in integer form. Green
/// carries far less weight than under 709, so bright green labels (chlorine)
/// stay below the light-artifact cutoff along with blue N and red O.
pub fn apply(image: RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    })
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}
