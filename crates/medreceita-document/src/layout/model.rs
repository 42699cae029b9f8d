// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rendered document model.
//
// A `RenderedDocument` is a fixed-geometry description of one page. Both the
// HTML preview and the PDF writer draw from it; neither looks at the style
// model or the form data directly.

use medreceita_core::style::{LogoPosition, PrescriptionStyle, ResolvedLogo};
use medreceita_core::types::{Orientation, PaperSize, PrescriptionType};

use super::visuals::{self, Align, BorderVisual, FontVisual, TextureVisual};

/// Page size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageGeometry {
    pub fn for_type(kind: PrescriptionType) -> Self {
        let paper = PaperSize::A4;
        let orientation = kind.orientation();
        let (w, h) = orientation.apply(paper.dimensions_mm());
        Self {
            paper,
            orientation,
            width_mm: w as f32,
            height_mm: h as f32,
        }
    }
}

/// Page-wide colours and visuals.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub background: String,
    pub primary: String,
    pub texture: TextureVisual,
    pub font: FontVisual,
    pub border: BorderVisual,
}

impl Surface {
    pub fn from_style(style: &PrescriptionStyle) -> Self {
        Self {
            background: style.background_color.clone(),
            primary: style.primary_color.clone(),
            texture: visuals::texture(style.texture),
            font: visuals::font(style.font_family),
            border: visuals::border(style.border_style),
        }
    }
}

/// Font sizes in points for one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    pub title_pt: f32,
    pub heading_pt: f32,
    pub body_pt: f32,
    pub small_pt: f32,
    pub caption_pt: f32,
    /// Line height as a multiple of the font size.
    pub leading: f32,
}

impl Typography {
    pub const FULL_PAGE: Self = Self {
        title_pt: 15.0,
        heading_pt: 12.0,
        body_pt: 10.5,
        small_pt: 9.0,
        caption_pt: 9.0,
        leading: 1.5,
    };

    pub const HALF_PAGE: Self = Self {
        title_pt: 9.0,
        heading_pt: 9.0,
        body_pt: 8.0,
        small_pt: 7.0,
        caption_pt: 6.0,
        leading: 1.3,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Normal,
    Multiply,
}

/// A logo drawn inline (header position).
#[derive(Debug, Clone, PartialEq)]
pub struct LogoMark {
    pub src: String,
    pub size_px: f32,
}

/// A logo drawn centred behind the panel content.
#[derive(Debug, Clone, PartialEq)]
pub struct Watermark {
    pub src: String,
    pub size_px: f32,
    pub opacity: f32,
    pub blend: BlendMode,
}

/// Split a resolved logo into its header or watermark form.
pub fn place_logo(
    logo: Option<ResolvedLogo>,
    blend: BlendMode,
) -> (Option<LogoMark>, Option<Watermark>) {
    match logo {
        None => (None, None),
        Some(logo) => match logo.position {
            LogoPosition::Header => (
                Some(LogoMark {
                    src: logo.src,
                    size_px: logo.size_px,
                }),
                None,
            ),
            LogoPosition::Watermark => (
                None,
                Some(Watermark {
                    src: logo.src,
                    size_px: logo.size_px,
                    opacity: logo.opacity,
                    blend,
                }),
            ),
        },
    }
}

/// A labelled value. `underline` draws a fill-in rule under the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: String,
    pub value: String,
    pub underline: bool,
}

impl Field {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            underline: false,
        }
    }

    pub fn underlined(label: &str, value: impl Into<String>) -> Self {
        Self {
            underline: true,
            ..Self::new(label, value)
        }
    }
}

/// Value, or a blank-line placeholder when empty.
pub fn or_blank(value: &str, blank: &str) -> String {
    if value.is_empty() {
        blank.to_string()
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Full-width bar filled with the primary colour, white text.
    Banner { text: String },
    /// Where the panel's via label goes.
    ViaLabel,
    /// Doctor identification with a rule underneath.
    Header {
        align: Align,
        logo: Option<LogoMark>,
        title: String,
        subtitle: Option<String>,
        lines: Vec<String>,
    },
    /// Rows of labelled fields. An empty row is a blank line.
    Section {
        title: Option<String>,
        boxed: bool,
        muted: bool,
        logo: Option<LogoMark>,
        rows: Vec<Vec<Field>>,
        caption: Option<String>,
    },
    /// Free-text body. Takes whatever vertical space is left.
    Body {
        title: String,
        title_align: Align,
        boxed: bool,
        text: String,
    },
    /// Place and date line, then a signature rule with name and licence.
    SignatureFooter {
        place_date: String,
        name: String,
        license: String,
    },
    /// Date on the left, signature rule with caption on the right.
    DateSignature { date: String, caption: String },
    /// Equal-width columns side by side.
    Columns(Vec<Block>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub via: Option<String>,
    pub watermark: Option<Watermark>,
    pub blocks: Vec<Block>,
}

/// A panel and where it sits on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSlot {
    pub x_mm: f32,
    pub width_mm: f32,
    pub padding_mm: f32,
    pub typography: Typography,
    /// Draw a thin primary-colour rule along the right edge.
    pub divider_right: bool,
    pub panel: Panel,
}

/// Dashed vertical cut indicator with a rotated label.
#[derive(Debug, Clone, PartialEq)]
pub struct CutLine {
    pub x_mm: f32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub kind: PrescriptionType,
    pub page: PageGeometry,
    pub surface: Surface,
    pub panels: Vec<PanelSlot>,
    pub cut_line: Option<CutLine>,
}

impl RenderedDocument {
    /// Every text string on the page, in drawing order. Via labels are
    /// included once per panel.
    pub fn texts(&self) -> Vec<String> {
        let mut out = Vec::new();
        for slot in &self.panels {
            if let Some(via) = &slot.panel.via {
                out.push(via.clone());
            }
            for block in &slot.panel.blocks {
                collect_texts(block, &mut out);
            }
        }
        if let Some(cut) = &self.cut_line {
            out.push(cut.label.clone());
        }
        out
    }
}

fn collect_texts(block: &Block, out: &mut Vec<String>) {
    match block {
        Block::Banner { text } => out.push(text.clone()),
        Block::ViaLabel => {}
        Block::Header {
            title,
            subtitle,
            lines,
            ..
        } => {
            out.push(title.clone());
            out.extend(subtitle.iter().cloned());
            out.extend(lines.iter().cloned());
        }
        Block::Section {
            title,
            rows,
            caption,
            ..
        } => {
            out.extend(title.iter().cloned());
            for field in rows.iter().flatten() {
                out.push(format!("{} {}", field.label, field.value));
            }
            out.extend(caption.iter().cloned());
        }
        Block::Body { title, text, .. } => {
            out.push(title.clone());
            out.push(text.clone());
        }
        Block::SignatureFooter {
            place_date,
            name,
            license,
        } => {
            out.push(place_date.clone());
            out.push(name.clone());
            out.push(license.clone());
        }
        Block::DateSignature { date, caption } => {
            out.push(date.clone());
            out.push(caption.clone());
        }
        Block::Columns(columns) => {
            for column in columns {
                collect_texts(column, out);
            }
        }
    }
}
