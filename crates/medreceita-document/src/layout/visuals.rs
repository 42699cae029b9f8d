// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enum-to-visual lookup table shared by both layout variants and both output
// surfaces (HTML preview and PDF).

use medreceita_core::style::{BorderStyle, FontFamily, HeaderPosition, Texture};

/// Background pattern drawn by the PDF surface. `tint` is how far the line
/// colour is pulled from the paper colour towards black (0.0-1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TexturePattern {
    Plain,
    Grid { spacing_mm: f32, tint: f32 },
    Dots { spacing_mm: f32, tint: f32 },
    Horizontal { spacing_mm: f32, tint: f32 },
    Diagonal { spacing_mm: f32, tint: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureVisual {
    /// CSS class from [`crate::layout::html::PRESCRIPTION_CSS`], empty for none.
    pub css_class: &'static str,
    pub pattern: TexturePattern,
}

pub fn texture(texture: Texture) -> TextureVisual {
    let (css_class, pattern) = match texture {
        Texture::None => ("", TexturePattern::Plain),
        Texture::Linen => (
            "texture-linen",
            TexturePattern::Grid {
                spacing_mm: 1.2,
                tint: 0.03,
            },
        ),
        Texture::Paper => (
            "texture-paper",
            TexturePattern::Dots {
                spacing_mm: 2.5,
                tint: 0.04,
            },
        ),
        Texture::Grid => (
            "texture-grid",
            TexturePattern::Grid {
                spacing_mm: 5.0,
                tint: 0.08,
            },
        ),
        Texture::Dots => (
            "texture-dots",
            TexturePattern::Dots {
                spacing_mm: 4.0,
                tint: 0.12,
            },
        ),
        Texture::Lines => (
            "texture-lines",
            TexturePattern::Horizontal {
                spacing_mm: 7.0,
                tint: 0.10,
            },
        ),
        Texture::Crosshatch => (
            "texture-crosshatch",
            TexturePattern::Diagonal {
                spacing_mm: 4.0,
                tint: 0.06,
            },
        ),
    };
    TextureVisual { css_class, pattern }
}

/// Built-in PDF face families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfFace {
    Serif,
    SerifItalic,
    Sans,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontVisual {
    pub css_class: &'static str,
    pub css_family: &'static str,
    pub pdf_face: PdfFace,
}

pub fn font(family: FontFamily) -> FontVisual {
    let (css_class, css_family, pdf_face) = match family {
        FontFamily::Prescription => (
            "font-prescription",
            "'Crimson Pro', Georgia, serif",
            PdfFace::Serif,
        ),
        FontFamily::Classic => (
            "font-classic",
            "'Libre Baskerville', 'Times New Roman', serif",
            PdfFace::Serif,
        ),
        FontFamily::Body => ("font-body", "'Source Sans 3', Arial, sans-serif", PdfFace::Sans),
        FontFamily::Display => (
            "font-display",
            "'Playfair Display', Georgia, serif",
            PdfFace::Serif,
        ),
        FontFamily::Modern => ("font-modern", "Inter, Helvetica, sans-serif", PdfFace::Sans),
        FontFamily::Elegant => (
            "font-elegant",
            "'Cormorant Garamond', Garamond, serif",
            PdfFace::SerifItalic,
        ),
    };
    FontVisual {
        css_class,
        css_family,
        pdf_face,
    }
}

/// One rectangular frame line, `inset_mm` in from the page edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub inset_mm: f32,
    pub width_pt: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderVisual {
    pub style: BorderStyle,
    pub strokes: &'static [Stroke],
    pub radius_mm: f32,
}

impl BorderVisual {
    /// Inline CSS declarations for the frame.
    pub fn css(&self, primary: &str, background: &str) -> String {
        match self.style {
            BorderStyle::None => String::new(),
            BorderStyle::Simple => format!("border: 1px solid {primary};"),
            BorderStyle::Double => format!("border: 4px double {primary};"),
            BorderStyle::Elegant => format!(
                "border: 2px solid {primary}; box-shadow: inset 0 0 0 4px {background}, inset 0 0 0 5px {primary};"
            ),
            BorderStyle::Rounded => {
                format!("border: 2px solid {primary}; border-radius: 12px;")
            }
            BorderStyle::Thick => format!("border: 4px solid {primary};"),
        }
    }
}

pub fn border(style: BorderStyle) -> BorderVisual {
    const NONE: &[Stroke] = &[];
    const SIMPLE: &[Stroke] = &[Stroke {
        inset_mm: 0.0,
        width_pt: 0.75,
    }];
    const DOUBLE: &[Stroke] = &[
        Stroke {
            inset_mm: 0.0,
            width_pt: 1.0,
        },
        Stroke {
            inset_mm: 0.7,
            width_pt: 1.0,
        },
    ];
    const ELEGANT: &[Stroke] = &[
        Stroke {
            inset_mm: 0.0,
            width_pt: 1.5,
        },
        Stroke {
            inset_mm: 1.6,
            width_pt: 0.75,
        },
    ];
    const WIDE: &[Stroke] = &[Stroke {
        inset_mm: 0.0,
        width_pt: 1.5,
    }];
    const THICK: &[Stroke] = &[Stroke {
        inset_mm: 0.0,
        width_pt: 3.0,
    }];

    let (strokes, radius_mm) = match style {
        BorderStyle::None => (NONE, 0.0),
        BorderStyle::Simple => (SIMPLE, 0.0),
        BorderStyle::Double => (DOUBLE, 0.0),
        BorderStyle::Elegant => (ELEGANT, 0.0),
        BorderStyle::Rounded => (WIDE, 3.2),
        BorderStyle::Thick => (THICK, 0.0),
    };
    BorderVisual {
        style,
        strokes,
        radius_mm,
    }
}

/// Horizontal alignment of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn css_text_align(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    pub fn css_align_items(&self) -> &'static str {
        match self {
            Self::Left => "flex-start",
            Self::Center => "center",
            Self::Right => "flex-end",
        }
    }
}

pub fn header_align(position: HeaderPosition) -> Align {
    match position {
        HeaderPosition::Left => Align::Left,
        HeaderPosition::Center => Align::Center,
        HeaderPosition::Right => Align::Right,
    }
}
