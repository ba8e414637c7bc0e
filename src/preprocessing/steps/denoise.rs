use image::GrayImage;
use imageproc::filter::median_filter;

/// Remove isolated specks left over from binarization
///
/// 3x3 median (radius 1). A lone pixel is outvoted by its eight neighbours;
/// border pixels see a replicated edge.
pub fn apply(image: GrayImage) -> GrayImage {
    median_filter(&image, 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_denoise_removes_salt_and_pepper() {
        let mut img = GrayImage::from_pixel(10, 10, Luma([255]));
        img.put_pixel(5, 5, Luma([0])); // pepper on white page
        img.put_pixel(2, 7, Luma([0]));

        let result = apply(img);

        assert!(result.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_denoise_fills_pinholes_in_solid_strokes() {
        let mut img = GrayImage::from_pixel(10, 10, Luma([0]));
        img.put_pixel(4, 4, Luma([255]));

        let result = apply(img);

        assert_eq!(result.get_pixel(4, 4).0[0], 0);
    }

    #[test]
    fn test_denoise_keeps_output_binary() {
        let img = GrayImage::from_fn(16, 16, |x, y| {
            if (x * 7 + y * 3) % 5 < 2 {
                Luma([0])
            } else {
                Luma([255])
            }
        });

        let result = apply(img);

        assert!(result.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }
}
