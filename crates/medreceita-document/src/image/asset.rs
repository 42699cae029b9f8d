// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Normalise logo assets into the single displayable form the style model
// stores: a `data:` URL.

use medreceita_core::error::{MedReceitaError, Result};
use medreceita_core::types::{LogoAsset, RasterSource, is_svg_markup};
use tracing::{debug, instrument};

use super::data_url;
use super::processor::{ImageProcessor, remove_background_from_data_url};

/// Turn a generated or uploaded logo into a displayable `data:` URL.
///
/// Raster logos are background-stripped and re-encoded as PNG. Vector
/// markup is wrapped as-is, including SVG that arrives through the raster
/// path (an `image/svg+xml` data URL or downloaded SVG bytes).
#[instrument(skip(asset))]
pub fn normalize_logo(asset: LogoAsset, threshold: u8) -> Result<String> {
    match asset {
        LogoAsset::Raster(RasterSource::Bytes(bytes)) => {
            if is_svg_markup(&bytes) {
                return wrap_svg_bytes(bytes);
            }
            ImageProcessor::from_bytes(&bytes)?
                .remove_background(threshold)?
                .to_png_data_url()
        }
        LogoAsset::Raster(RasterSource::DataUrl(url)) => {
            let decoded = data_url::decode(&url)?;
            if decoded.is_svg() || is_svg_markup(&decoded.bytes) {
                return wrap_svg_bytes(decoded.bytes);
            }
            remove_background_from_data_url(&url, threshold)
        }
        LogoAsset::Vector(markup) => wrap_svg(&markup),
    }
}

fn wrap_svg_bytes(bytes: Vec<u8>) -> Result<String> {
    let markup = String::from_utf8(bytes)
        .map_err(|_| MedReceitaError::Load("SVG logo is not valid UTF-8".into()))?;
    wrap_svg(&markup)
}

fn wrap_svg(markup: &str) -> Result<String> {
    let markup = markup.trim();
    if !is_svg_markup(markup.as_bytes()) {
        return Err(MedReceitaError::Load("vector logo is not SVG markup".into()));
    }
    debug!(len = markup.len(), "wrapping vector logo");
    Ok(data_url::encode("image/svg+xml", markup.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    fn white_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn raster_bytes_become_png_url() {
        let url = normalize_logo(LogoAsset::Raster(RasterSource::Bytes(white_png())), 240).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn vector_markup_is_wrapped() {
        let url = normalize_logo(
            LogoAsset::Vector("  <svg xmlns=\"http://www.w3.org/2000/svg\"></svg>".into()),
            240,
        )
        .unwrap();
        let decoded = data_url::decode(&url).unwrap();
        assert!(decoded.is_svg());
        assert!(decoded.bytes.starts_with(b"<svg"));
    }

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 8 8"><rect width="8" height="8" fill="#fff"/></svg>"##;

    #[test]
    fn svg_data_url_from_the_raster_path_is_kept_as_vector() {
        let url = data_url::encode("image/svg+xml", SVG.as_bytes());
        let normalised = normalize_logo(LogoAsset::Raster(RasterSource::DataUrl(url)), 240).unwrap();
        let decoded = data_url::decode(&normalised).unwrap();
        assert!(decoded.is_svg());
        assert_eq!(decoded.bytes, SVG.as_bytes());
    }

    #[test]
    fn downloaded_svg_bytes_are_kept_as_vector() {
        let bytes = format!("<?xml version=\"1.0\"?>\n{SVG}").into_bytes();
        let normalised = normalize_logo(LogoAsset::Raster(RasterSource::Bytes(bytes)), 240).unwrap();
        assert!(normalised.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn mislabelled_svg_data_url_is_sniffed() {
        let url = data_url::encode("application/octet-stream", SVG.as_bytes());
        let normalised = normalize_logo(LogoAsset::Raster(RasterSource::DataUrl(url)), 240).unwrap();
        assert!(data_url::decode(&normalised).unwrap().is_svg());
    }

    #[test]
    fn non_svg_markup_is_rejected() {
        let result = normalize_logo(LogoAsset::Vector("<html></html>".into()), 240);
        assert!(matches!(result, Err(MedReceitaError::Load(_))));
    }

    #[test]
    fn span_records_the_threshold() {
        let spans = crate::image::span_capture::RecordedSpans::default();
        spans.run(|| normalize_logo(LogoAsset::Vector(SVG.into()), 200).unwrap());
        assert_eq!(spans.value("normalize_logo", "threshold").as_deref(), Some("200"));
    }
}
