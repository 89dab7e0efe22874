//! Image processor - metadata removal by re-rasterization

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use img_parts::{Bytes, DynImage, ImageEXIF};
use std::io::Cursor;

use crate::sanitizer::SanitizationError;
use crate::validator::normalize_content_type;

/// JPEG quality used when re-encoding lossy images.
pub const JPEG_QUALITY: u8 = 95;

/// Re-encoded image and the content type it was written as.
#[derive(Clone, Debug)]
pub struct ReencodedImage {
    pub data: Vec<u8>,
    pub content_type: String,
}

pub struct ImageProcessor;

impl ImageProcessor {
    /// Encoder target for a declared image type, if one is available.
    pub fn target_format(content_type: &str) -> Option<ImageFormat> {
        match normalize_content_type(content_type).as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/gif" => Some(ImageFormat::Gif),
            "image/webp" => Some(ImageFormat::WebP),
            "image/bmp" | "image/x-ms-bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Decode the pixels and write them into a fresh container.
    ///
    /// Only pixel data survives: EXIF, GPS, XMP, ICC and comment segments are
    /// not carried over. EXIF orientation is applied to the pixels first so the
    /// result displays the same way the source image did. Types without an encoder
    /// fall back to PNG.
    pub fn reencode(data: &[u8], content_type: &str) -> Result<ReencodedImage, SanitizationError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| SanitizationError::Decode(e.to_string()))?;
        let mut decoder = reader
            .into_decoder()
            .map_err(|e| SanitizationError::Decode(e.to_string()))?;
        let orientation = decoder
            .orientation()
            .map_err(|e| SanitizationError::Decode(e.to_string()))?;
        let mut img = DynamicImage::from_decoder(decoder)
            .map_err(|e| SanitizationError::Decode(e.to_string()))?;
        img.apply_orientation(orientation);

        let (format, content_type) = match Self::target_format(content_type) {
            Some(format) => (format, normalize_content_type(content_type)),
            None => {
                tracing::debug!(
                    content_type = %content_type,
                    "No encoder for declared image type, re-encoding as PNG"
                );
                (ImageFormat::Png, "image/png".to_string())
            }
        };

        let mut out = Vec::new();
        let encoded = match format {
            ImageFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
                DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)
            }
            ImageFormat::Png => img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png),
            other => DynamicImage::ImageRgba8(img.to_rgba8())
                .write_to(&mut Cursor::new(&mut out), other),
        };
        encoded.map_err(|e| SanitizationError::Encode(e.to_string()))?;

        Ok(ReencodedImage {
            data: out,
            content_type,
        })
    }

    /// Whether the container carries an EXIF block (JPEG, PNG and WebP are inspected).
    pub fn has_exif(data: &[u8]) -> bool {
        match DynImage::from_bytes(Bytes::copy_from_slice(data)) {
            Ok(Some(image)) => image.exif().is_some(),
            _ => false,
        }
    }

    /// Pixel dimensions, if the data decodes.
    pub fn dimensions(data: &[u8]) -> Option<(u32, u32)> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .ok()?;
        reader.into_dimensions().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use img_parts::jpeg::Jpeg;
    use img_parts::png::Png;

    /// Big-endian TIFF header with a single IFD entry: Orientation = 6 (rotate 90 CW).
    const EXIF_ORIENTATION_6: &[u8] = &[
        b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08, // header, IFD at 8
        0x00, 0x01, // one entry
        0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x06, 0x00, 0x00, // orientation
        0x00, 0x00, 0x00, 0x00, // no next IFD
    ];

    fn create_test_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn create_test_jpeg() -> Vec<u8> {
        let img = RgbImage::from_pixel(40, 20, Rgb([0, 128, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
            .unwrap();
        buffer
    }

    fn jpeg_with_exif(exif: &'static [u8]) -> Vec<u8> {
        let mut jpeg = Jpeg::from_bytes(Bytes::from(create_test_jpeg())).unwrap();
        jpeg.set_exif(Some(Bytes::from_static(exif)));
        jpeg.encoder().bytes().to_vec()
    }

    fn png_with_exif(exif: &'static [u8]) -> Vec<u8> {
        let mut png = Png::from_bytes(Bytes::from(create_test_png())).unwrap();
        png.set_exif(Some(Bytes::from_static(exif)));
        png.encoder().bytes().to_vec()
    }

    #[test]
    fn test_target_format() {
        assert_eq!(
            ImageProcessor::target_format("image/jpg"),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageProcessor::target_format("image/PNG"),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageProcessor::target_format("image/svg+xml"), None);
    }

    #[test]
    fn test_reencode_strips_jpeg_exif() {
        let dirty = jpeg_with_exif(EXIF_ORIENTATION_6);
        assert!(ImageProcessor::has_exif(&dirty));

        let clean = ImageProcessor::reencode(&dirty, "image/jpeg").unwrap();
        assert_eq!(clean.content_type, "image/jpeg");
        assert!(!ImageProcessor::has_exif(&clean.data));
        let dims = ImageProcessor::dimensions(&clean.data).unwrap();
        assert!(dims == (40, 20) || dims == (20, 40));
    }

    #[test]
    fn test_reencode_strips_png_exif() {
        let dirty = png_with_exif(EXIF_ORIENTATION_6);
        assert!(ImageProcessor::has_exif(&dirty));

        let clean = ImageProcessor::reencode(&dirty, "image/png").unwrap();
        assert!(!ImageProcessor::has_exif(&clean.data));
        let dims = ImageProcessor::dimensions(&clean.data).unwrap();
        assert!(dims == (40, 20) || dims == (20, 40));
    }

    #[test]
    fn test_reencode_is_idempotent_for_metadata() {
        let once = ImageProcessor::reencode(&create_test_png(), "image/png").unwrap();
        let twice = ImageProcessor::reencode(&once.data, "image/png").unwrap();
        assert!(!ImageProcessor::has_exif(&once.data));
        assert!(!ImageProcessor::has_exif(&twice.data));
        assert_eq!(ImageProcessor::dimensions(&twice.data), Some((40, 20)));
    }

    #[test]
    fn test_reencode_falls_back_to_png() {
        let clean = ImageProcessor::reencode(&create_test_png(), "image/x-icon").unwrap();
        assert_eq!(clean.content_type, "image/png");
        assert_eq!(
            image::guess_format(&clean.data).unwrap(),
            ImageFormat::Png
        );
    }

    #[test]
    fn test_reencode_converts_to_declared_format() {
        let clean = ImageProcessor::reencode(&create_test_png(), "image/webp").unwrap();
        assert_eq!(clean.content_type, "image/webp");
        assert_eq!(
            image::guess_format(&clean.data).unwrap(),
            ImageFormat::WebP
        );
    }

    #[test]
    fn test_reencode_invalid_image_fails() {
        let result = ImageProcessor::reencode(b"not an image", "image/png");
        assert!(matches!(result, Err(SanitizationError::Decode(_))));
    }

    #[test]
    fn test_svg_is_not_rasterized() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#;
        assert!(ImageProcessor::reencode(svg, "image/svg+xml").is_err());
    }

    #[test]
    fn test_has_exif_on_non_image() {
        assert!(!ImageProcessor::has_exif(b"%PDF-1.7"));
    }
}
