use image::{imageops, GrayImage, Luma};

/// Pixels trimmed from each side to drop partial page chrome
pub const EDGE_TRIM: u32 = 3;
/// White margin the engine needs to find structure boundaries
pub const PADDING: u32 = 15;

/// Trim the capture edges (when large enough) and pad with white
pub fn apply(image: GrayImage) -> GrayImage {
    let trimmed = trim_edges(image);
    pad(&trimmed)
}

fn trim_edges(image: GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let min_side = 2 * EDGE_TRIM + 10;
    if width <= min_side || height <= min_side {
        return image;
    }

    imageops::crop_imm(
        &image,
        EDGE_TRIM,
        EDGE_TRIM,
        width - 2 * EDGE_TRIM,
        height - 2 * EDGE_TRIM,
    )
    .to_image()
}

fn pad(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut canvas = GrayImage::from_pixel(width + 2 * PADDING, height + 2 * PADDING, Luma([255]));
    imageops::replace(&mut canvas, image, PADDING as i64, PADDING as i64);
    canvas
}
