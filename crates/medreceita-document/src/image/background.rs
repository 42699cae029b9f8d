// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colour-keyed background removal.
//
// Every pixel whose red, green and blue channels are all at or above the
// threshold becomes fully transparent. Everything else, alpha included, is
// copied unchanged. No neighbourhood is inspected, so soft edges just below
// the threshold stay opaque.

use image::{Rgba, RgbaImage};
use imageproc::map::map_colors;
use medreceita_core::error::{MedReceitaError, Result};
use tracing::{debug, instrument};

/// Threshold used when none is configured.
pub const DEFAULT_THRESHOLD: u8 = 240;

/// Whether a pixel counts as background. The comparison is inclusive.
#[inline]
pub fn is_background(pixel: &Rgba<u8>, threshold: u8) -> bool {
    let Rgba([r, g, b, _]) = *pixel;
    r >= threshold && g >= threshold && b >= threshold
}

/// Return a copy of `source` with background pixels made transparent.
///
/// Fails with `RenderContext` for a zero-sized image. The input is never
/// modified and the output always has the input's dimensions.
#[instrument(skip(source), fields(width = source.width(), height = source.height()))]
pub fn remove_background(source: &RgbaImage, threshold: u8) -> Result<RgbaImage> {
    if source.width() == 0 || source.height() == 0 {
        return Err(MedReceitaError::RenderContext(format!(
            "cannot rasterise a {}x{} image",
            source.width(),
            source.height()
        )));
    }

    let keyed = map_colors(source, |pixel: Rgba<u8>| {
        if is_background(&pixel, threshold) {
            let Rgba([r, g, b, _]) = pixel;
            Rgba([r, g, b, 0])
        } else {
            pixel
        }
    });

    debug!("background keyed out");
    Ok(keyed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([240, 240, 240, 255]));
        img.put_pixel(1, 0, Rgba([239, 239, 239, 255]));

        let out = remove_background(&img, 240).unwrap();
        assert_eq!(out.get_pixel(0, 0).0[3], 0);
        assert_eq!(out.get_pixel(1, 0).0[3], 255);
    }

    #[test]
    fn pixels_with_any_dark_channel_keep_their_alpha() {
        let samples = [
            Rgba([255, 255, 10, 255]),
            Rgba([10, 255, 255, 128]),
            Rgba([255, 239, 255, 7]),
            Rgba([0, 0, 0, 0]),
        ];
        let mut img = RgbaImage::new(samples.len() as u32, 1);
        for (x, px) in samples.iter().enumerate() {
            img.put_pixel(x as u32, 0, *px);
        }

        let out = remove_background(&img, 240).unwrap();
        for (x, px) in samples.iter().enumerate() {
            assert_eq!(out.get_pixel(x as u32, 0), px);
        }
    }

    #[test]
    fn background_keeps_colour_channels() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([250, 245, 255, 200]));
        let out = remove_background(&img, 240).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([250, 245, 255, 0]));
    }

    #[test]
    fn dimensions_are_preserved_and_input_untouched() {
        let img = RgbaImage::from_pixel(7, 3, Rgba([255, 255, 255, 255]));
        let out = remove_background(&img, 240).unwrap();
        assert_eq!(out.dimensions(), (7, 3));
        assert_eq!(img.get_pixel(3, 1).0[3], 255);
    }

    #[test]
    fn zero_sized_image_is_a_render_context_error() {
        let img = RgbaImage::new(0, 4);
        assert!(matches!(
            remove_background(&img, 240),
            Err(MedReceitaError::RenderContext(_))
        ));
    }

    #[test]
    fn threshold_zero_clears_everything() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let out = remove_background(&img, 0).unwrap();
        assert!(out.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn span_records_threshold_and_dimensions() {
        let spans = crate::image::span_capture::RecordedSpans::default();
        let img = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255]));
        spans.run(|| remove_background(&img, 240).unwrap());

        assert_eq!(spans.value("remove_background", "threshold").as_deref(), Some("240"));
        assert_eq!(spans.value("remove_background", "width").as_deref(), Some("3"));
        assert_eq!(spans.value("remove_background", "height").as_deref(), Some("2"));
    }
}
