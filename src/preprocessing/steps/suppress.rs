use image::GrayImage;

/// Anything lighter than this (~63% of full scale) is watermark or shading
pub const LIGHT_ARTIFACT_CUTOFF: u8 = 160;

/// Push light-grey artifacts to pure white, leaving darker strokes alone
pub fn apply(mut image: GrayImage) -> GrayImage {
    for pixel in image.pixels_mut() {
        if pixel.0[0] > LIGHT_ARTIFACT_CUTOFF {
            pixel.0[0] = 255;
        }
    }
    image
}
