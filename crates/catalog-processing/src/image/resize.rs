use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;

use super::{ImageError, OutputFormat};

const JPEG_QUALITY: u8 = 75;

/// Resolve the target box for a `src_width`x`src_height` source.
///
/// When exactly one target side is 0 it is derived from the other so the aspect
/// ratio is kept, using integer division (`H * w / W`), floored at 1 pixel.
/// When both are 0 the source size is kept.
pub fn target_dimensions(
    src_width: u32,
    src_height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32) {
    let scale = |side: u32, num: u32, den: u32| -> u32 {
        if den == 0 {
            return side.max(1);
        }
        let scaled = u64::from(side) * u64::from(num) / u64::from(den);
        u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
    };

    match (target_width, target_height) {
        (0, 0) => (src_width, src_height),
        (w, 0) => (w, scale(src_height, w, src_width)),
        (0, h) => (scale(src_width, h, src_height), h),
        (w, h) => (w, h),
    }
}

/// Resample to exactly `width`x`height` with a Lanczos filter
pub fn resize_image(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    img.resize_exact(width, height, FilterType::Lanczos3)
}

/// Decode `data`, resize it into the target box and encode it as `format`.
pub fn encode_resized(
    data: &[u8],
    format: OutputFormat,
    target_width: u32,
    target_height: u32,
) -> Result<Vec<u8>, ImageError> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::Decode(image::ImageError::IoError(e)))?
        .decode()
        .map_err(ImageError::Decode)?;

    let (src_width, src_height) = img.dimensions();
    let (width, height) = target_dimensions(src_width, src_height, target_width, target_height);
    let resized = resize_image(&img, width, height);

    let mut buffer = Vec::with_capacity(width as usize * height as usize * 3);
    match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
            rgb.write_with_encoder(encoder).map_err(ImageError::Encode)?;
        }
        OutputFormat::Png => {
            resized
                .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
                .map_err(ImageError::Encode)?;
        }
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn height_follows_width() {
        // H * 50 / W with integer truncation
        assert_eq!(target_dimensions(200, 100, 50, 0), (50, 25));
        assert_eq!(target_dimensions(300, 199, 50, 0), (50, 199 * 50 / 300));
        assert_eq!(target_dimensions(640, 480, 50, 0), (50, 37));
    }

    #[test]
    fn width_follows_height() {
        assert_eq!(target_dimensions(100, 200, 0, 50), (25, 50));
    }

    #[test]
    fn both_given_or_both_zero() {
        assert_eq!(target_dimensions(640, 480, 50, 50), (50, 50));
        assert_eq!(target_dimensions(640, 480, 0, 0), (640, 480));
    }

    #[test]
    fn derived_side_is_at_least_one_pixel() {
        assert_eq!(target_dimensions(1000, 1, 50, 0), (50, 1));
    }

    #[test]
    fn encodes_png_to_target_box() {
        let out = encode_resized(&png_fixture(200, 100), OutputFormat::Png, 50, 0).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.dimensions(), (50, 25));
        assert_eq!(
            image::guess_format(&out).unwrap(),
            ImageFormat::Png
        );
    }

    #[test]
    fn encodes_jpeg_from_rgba_source() {
        let out = encode_resized(&png_fixture(80, 80), OutputFormat::Jpeg, 50, 50).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
        assert_eq!(image::load_from_memory(&out).unwrap().dimensions(), (50, 50));
    }

    #[test]
    fn garbage_is_decode_error() {
        let err = encode_resized(b"definitely not an image", OutputFormat::Png, 50, 50)
            .unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }
}
