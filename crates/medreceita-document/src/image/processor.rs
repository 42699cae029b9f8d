// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: decode, key out the background, downscale and re-encode
// logo images. Operates on in-memory images using the `image` and `imageproc`
// crates.

use image::{DynamicImage, ImageFormat, RgbaImage};
use medreceita_core::error::{MedReceitaError, Result};
use tracing::{debug, info, instrument};

use super::background;
use super::data_url;

/// Image processing pipeline operating on a single in-memory image.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`,
/// enabling method chaining.
///
/// ```ignore
/// let url = ImageProcessor::from_bytes(&upload)?
///     .remove_background(240)?
///     .to_png_data_url()?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| MedReceitaError::Load(format!("failed to decode image: {err}")))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Create a processor from a base64 `data:` URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let decoded = data_url::decode(url)?;
        if decoded.is_svg() {
            return Err(MedReceitaError::Load(
                "vector images cannot be rasterised".into(),
            ));
        }
        Self::from_bytes(&decoded.bytes)
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consume the processor and return the image as RGBA.
    pub fn into_rgba8(self) -> RgbaImage {
        self.image.into_rgba8()
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Make near-white background pixels transparent.
    ///
    /// The result is always RGBA, whatever the source format was.
    #[instrument(skip(self), fields(width = self.image.width(), height = self.image.height()))]
    pub fn remove_background(self, threshold: u8) -> Result<Self> {
        info!(threshold, "Removing background");
        let rgba = self.image.into_rgba8();
        let keyed = background::remove_background(&rgba, threshold)?;
        Ok(Self {
            image: DynamicImage::ImageRgba8(keyed),
        })
    }

    /// Shrink the image to fit within `max_edge` x `max_edge`, preserving
    /// aspect ratio. Smaller images are left alone.
    #[instrument(skip(self))]
    pub fn fit_within(self, max_edge: u32) -> Self {
        if self.image.width() <= max_edge && self.image.height() <= max_edge {
            return self;
        }
        let resized = self
            .image
            .resize(max_edge, max_edge, image::imageops::FilterType::Lanczos3);
        debug!(
            new_w = resized.width(),
            new_h = resized.height(),
            "Resize complete"
        );
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| MedReceitaError::ImageError(format!("PNG encoding failed: {err}")))?;
        Ok(buffer)
    }

    /// Encode the current image as a PNG `data:` URL.
    pub fn to_png_data_url(&self) -> Result<String> {
        Ok(data_url::encode("image/png", &self.to_png_bytes()?))
    }
}

/// Strip the background from an image carried in a `data:` URL and return
/// the result as a PNG `data:` URL.
#[instrument(skip(url), fields(url_len = url.len()))]
pub fn remove_background_from_data_url(url: &str, threshold: u8) -> Result<String> {
    ImageProcessor::from_data_url(url)?
        .remove_background(threshold)?
        .to_png_data_url()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    fn rgb_png_with_dark_square() -> Vec<u8> {
        let mut img = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
        for y in 2..6 {
            for x in 2..6 {
                img.put_pixel(x, y, Rgb([20, 40, 160]));
            }
        }
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn opaque_rgb_input_gains_an_alpha_channel() {
        let out = ImageProcessor::from_bytes(&rgb_png_with_dark_square())
            .unwrap()
            .remove_background(240)
            .unwrap()
            .to_png_bytes()
            .unwrap();

        let decoded = image::load_from_memory(&out).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (8, 8));
        assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
        assert_eq!(decoded.get_pixel(4, 4).0[3], 255);
    }

    #[test]
    fn garbage_bytes_are_a_load_error() {
        let result = ImageProcessor::from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(MedReceitaError::Load(_))));
    }

    #[test]
    fn data_url_round_trip_produces_png() {
        let src = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255]));
        let url = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(src))
            .to_png_data_url()
            .unwrap();

        let out = remove_background_from_data_url(&url, 240).unwrap();
        assert!(out.starts_with("data:image/png;base64,"));
        let back = ImageProcessor::from_data_url(&out).unwrap().into_rgba8();
        assert!(back.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn svg_data_url_cannot_be_keyed() {
        let url = data_url::encode("image/svg+xml", b"<svg/>");
        assert!(matches!(
            remove_background_from_data_url(&url, 240),
            Err(MedReceitaError::Load(_))
        ));
    }

    #[test]
    fn fit_within_only_shrinks() {
        let big = ImageProcessor::from_dynamic(DynamicImage::new_rgba8(800, 400)).fit_within(200);
        assert_eq!((big.width(), big.height()), (200, 100));
        let small = ImageProcessor::from_dynamic(DynamicImage::new_rgba8(50, 40)).fit_within(200);
        assert_eq!((small.width(), small.height()), (50, 40));
    }
}
