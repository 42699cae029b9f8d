// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: draw a rendered prescription page with `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.
//
// Layout coordinates are millimetres from the top-left corner; conversion to
// PDF points (bottom-left origin) happens in `Canvas`. Built-in fonts are
// used, so text outside Latin-1 is dropped and widths are estimated.

use std::collections::HashMap;

use medreceita_core::error::{MedReceitaError, Result};
use printpdf::{
    BuiltinFont, Line, LineDashPattern, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage,
    PdfSaveOptions, PdfWarnMsg, Point, Polygon, PolygonRing, Pt, RawImage, RawImageData,
    RawImageFormat, TextItem, TextMatrix, WindingOrder, XObjectId, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use super::color::Rgb8;
use crate::image::data_url;
use crate::image::processor::ImageProcessor;
use crate::layout::model::{
    BlendMode, Block, Field, PanelSlot, RenderedDocument, Typography, Watermark,
};
use crate::layout::visuals::{Align, PdfFace, TexturePattern};

const PT_TO_MM: f32 = 0.352_778;
const PX_TO_MM: f32 = 25.4 / 96.0;
/// Average glyph advance as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.50;
/// Raster resolution used when embedding logos.
const LOGO_DPI: f32 = 300.0;
/// Longest edge of an embedded logo, in pixels.
const LOGO_MAX_EDGE: u32 = 600;

/// Renders [`RenderedDocument`] pages to PDF bytes.
pub struct PdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self { title: None }
    }

    /// Title for the PDF metadata. Blank titles keep the default.
    pub fn with_title(self, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            title: Some(title).filter(|t| !t.trim().is_empty()),
        }
    }

    /// Draw `doc` as a single-page PDF.
    #[instrument(skip(self, doc), fields(kind = ?doc.kind, panels = doc.panels.len()))]
    pub fn render(&self, doc: &RenderedDocument) -> Result<Vec<u8>> {
        let title = self.title.as_deref().unwrap_or("Receituário");
        info!(
            width_mm = doc.page.width_mm,
            height_mm = doc.page.height_mm,
            "Creating prescription PDF"
        );

        let mut pdf = PdfDocument::new(title);
        let ops = {
            let mut canvas = Canvas::new(&mut pdf, doc);
            canvas.draw_document(doc)?;
            canvas.ops
        };

        let page = PdfPage::new(Mm(doc.page.width_mm), Mm(doc.page.height_mm), ops);
        pdf.with_pages(vec![page]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = pdf.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf reported warnings");
        }
        if output.is_empty() {
            return Err(MedReceitaError::PdfError("serialised PDF is empty".into()));
        }
        Ok(output)
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

struct Canvas<'a> {
    pdf: &'a mut PdfDocument,
    ops: Vec<Op>,
    page_h_mm: f32,
    paper: Rgb8,
    primary: Rgb8,
    face: PdfFace,
    images: HashMap<String, Option<(XObjectId, u32, u32)>>,
}

impl<'a> Canvas<'a> {
    fn new(pdf: &'a mut PdfDocument, doc: &RenderedDocument) -> Self {
        let surface = &doc.surface;
        let paper = Rgb8::parse(&surface.background).unwrap_or_else(|| {
            warn!(color = %surface.background, "unreadable background colour, using white");
            Rgb8::WHITE
        });
        let primary = Rgb8::parse(&surface.primary).unwrap_or_else(|| {
            warn!(color = %surface.primary, "unreadable primary colour, using black");
            Rgb8::BLACK
        });
        Self {
            pdf,
            ops: Vec::new(),
            page_h_mm: doc.page.height_mm,
            paper,
            primary,
            face: surface.font.pdf_face,
            images: HashMap::new(),
        }
    }

    // -- Primitives -----------------------------------------------------------

    fn point(&self, x_mm: f32, y_mm: f32) -> LinePoint {
        LinePoint {
            p: Point {
                x: Mm(x_mm).into_pt(),
                y: Mm(self.page_h_mm - y_mm).into_pt(),
            },
            bezier: false,
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb8) {
        let ring = PolygonRing {
            points: vec![
                self.point(x, y),
                self.point(x + w, y),
                self.point(x + w, y + h),
                self.point(x, y + h),
            ],
        };
        self.ops.push(Op::SetFillColor {
            col: color.to_pdf(),
        });
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![ring],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, width_pt: f32, color: Rgb8) {
        self.ops.push(Op::SetOutlineColor {
            col: color.to_pdf(),
        });
        self.ops.push(Op::SetOutlineThickness { pt: Pt(width_pt) });
        let line = Line {
            points: vec![
                self.point(x, y),
                self.point(x + w, y),
                self.point(x + w, y + h),
                self.point(x, y + h),
            ],
            is_closed: true,
        };
        self.ops.push(Op::DrawLine { line });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), width_pt: f32, color: Rgb8) {
        self.ops.push(Op::SetOutlineColor {
            col: color.to_pdf(),
        });
        self.ops.push(Op::SetOutlineThickness { pt: Pt(width_pt) });
        let line = Line {
            points: vec![self.point(from.0, from.1), self.point(to.0, to.1)],
            is_closed: false,
        };
        self.ops.push(Op::DrawLine { line });
    }

    fn dashed_line(&mut self, from: (f32, f32), to: (f32, f32), width_pt: f32, color: Rgb8) {
        self.ops.push(Op::SaveGraphicsState);
        self.ops.push(Op::SetLineDashPattern {
            dash: LineDashPattern {
                dash_1: Some(4),
                gap_1: Some(3),
                ..Default::default()
            },
        });
        self.line(from, to, width_pt, color);
        self.ops.push(Op::RestoreGraphicsState);
    }

    fn font(&self, bold: bool) -> BuiltinFont {
        match (self.face, bold) {
            (PdfFace::Serif, false) => BuiltinFont::TimesRoman,
            (PdfFace::Serif, true) => BuiltinFont::TimesBold,
            (PdfFace::SerifItalic, false) => BuiltinFont::TimesItalic,
            (PdfFace::SerifItalic, true) => BuiltinFont::TimesBoldItalic,
            (PdfFace::Sans, false) => BuiltinFont::Helvetica,
            (PdfFace::Sans, true) => BuiltinFont::HelveticaBold,
        }
    }

    /// Draw one line of text with its baseline at `baseline_mm`.
    fn text(&mut self, x: f32, baseline_mm: f32, size_pt: f32, bold: bool, color: Rgb8, text: &str) {
        let text = pdf_safe(text);
        if text.is_empty() {
            return;
        }
        let font = self.font(bold);
        self.ops.push(Op::SetFillColor {
            col: color.to_pdf(),
        });
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: self.point(x, baseline_mm).p,
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(size_pt),
            font,
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text)],
            font,
        });
        self.ops.push(Op::EndTextSection);
    }

    /// Draw text aligned inside the horizontal band `[x, x + width]`.
    #[allow(clippy::too_many_arguments)]
    fn aligned_text(
        &mut self,
        x: f32,
        width: f32,
        align: Align,
        baseline_mm: f32,
        size_pt: f32,
        bold: bool,
        color: Rgb8,
        text: &str,
    ) {
        let w = text_width_mm(text, size_pt);
        let left = match align {
            Align::Left => x,
            Align::Center => x + (width - w) / 2.0,
            Align::Right => x + width - w,
        };
        self.text(left, baseline_mm, size_pt, bold, color, text);
    }

    /// Decode, composite and register a logo. Returns `None` for logos that
    /// cannot be drawn here (vector markup, undecodable data).
    fn logo_image(
        &mut self,
        src: &str,
        opacity: f32,
        blend: BlendMode,
    ) -> Option<(XObjectId, u32, u32)> {
        let key = format!("{opacity}:{blend:?}:{src}");
        if let Some(cached) = self.images.get(&key) {
            return cached.clone();
        }
        let entry = match self.decode_logo(src, opacity, blend) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(error = %e, "logo skipped in PDF output");
                None
            }
        };
        self.images.insert(key, entry.clone());
        entry
    }

    fn decode_logo(&mut self, src: &str, opacity: f32, blend: BlendMode) -> Result<(XObjectId, u32, u32)> {
        let decoded = data_url::decode(src)?;
        if decoded.is_svg() {
            return Err(MedReceitaError::PdfError(
                "vector logos are not embedded in PDF output".into(),
            ));
        }
        let rgba = ImageProcessor::from_bytes(&decoded.bytes)?
            .fit_within(LOGO_MAX_EDGE)
            .into_rgba8();
        let (w, h) = rgba.dimensions();
        let paper = self.paper;

        // Flatten onto the paper colour; PDF output has no blend modes here.
        let mut pixels = Vec::with_capacity((w * h * 3) as usize);
        for px in rgba.pixels() {
            let [r, g, b, a] = px.0;
            let alpha = (a as f32 / 255.0) * opacity.clamp(0.0, 1.0);
            let src_px = Rgb8 { r, g, b };
            let top = match blend {
                BlendMode::Normal => src_px,
                BlendMode::Multiply => Rgb8 {
                    r: ((paper.r as u16 * r as u16) / 255) as u8,
                    g: ((paper.g as u16 * g as u16) / 255) as u8,
                    b: ((paper.b as u16 * b as u16) / 255) as u8,
                },
            };
            let out = paper.mix(top, alpha);
            pixels.extend_from_slice(&[out.r, out.g, out.b]);
        }

        let raw = RawImage {
            pixels: RawImageData::U8(pixels),
            width: w as usize,
            height: h as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        Ok((self.pdf.add_image(&raw), w, h))
    }

    /// Place an image inside a `size_mm` square with its top-left corner at
    /// (`x`, `y`), preserving aspect ratio (object-fit: contain).
    fn place_image(&mut self, id: XObjectId, w_px: u32, h_px: u32, x: f32, y: f32, size_mm: f32) {
        let longest = w_px.max(h_px).max(1) as f32;
        let draw_w = size_mm * w_px as f32 / longest;
        let draw_h = size_mm * h_px as f32 / longest;
        let left = x + (size_mm - draw_w) / 2.0;
        let bottom = y + (size_mm + draw_h) / 2.0;

        let natural_w_mm = w_px as f32 / LOGO_DPI * 25.4;
        let scale = draw_w / natural_w_mm;
        self.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Mm(left).into_pt()),
                translate_y: Some(Mm(self.page_h_mm - bottom).into_pt()),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(LOGO_DPI),
                rotate: None,
            },
        });
    }

    // -- Page -----------------------------------------------------------------

    fn draw_document(&mut self, doc: &RenderedDocument) -> Result<()> {
        let (w, h) = (doc.page.width_mm, doc.page.height_mm);
        self.fill_rect(0.0, 0.0, w, h, self.paper);
        self.draw_texture(doc.surface.texture.pattern, w, h);

        for slot in &doc.panels {
            self.draw_panel(slot);
        }

        if let Some(cut) = &doc.cut_line {
            let primary = self.primary;
            self.dashed_line((cut.x_mm, 0.0), (cut.x_mm, h), 1.5, primary);
            self.draw_cut_label(cut.x_mm, h / 2.0, &cut.label);
        }

        for stroke in doc.surface.border.strokes {
            let inset = stroke.inset_mm + stroke.width_pt * PT_TO_MM / 2.0;
            let primary = self.primary;
            self.stroke_rect(
                inset,
                inset,
                w - 2.0 * inset,
                h - 2.0 * inset,
                stroke.width_pt,
                primary,
            );
        }
        Ok(())
    }

    fn draw_texture(&mut self, pattern: TexturePattern, w: f32, h: f32) {
        let width_pt = 0.25;
        match pattern {
            TexturePattern::Plain => {}
            TexturePattern::Grid { spacing_mm, tint } => {
                let ink = self.paper.mix(Rgb8::BLACK, tint);
                for x in steps(spacing_mm, w) {
                    self.line((x, 0.0), (x, h), width_pt, ink);
                }
                for y in steps(spacing_mm, h) {
                    self.line((0.0, y), (w, y), width_pt, ink);
                }
            }
            TexturePattern::Horizontal { spacing_mm, tint } => {
                let ink = self.paper.mix(Rgb8::BLACK, tint);
                for y in steps(spacing_mm, h) {
                    self.line((0.0, y), (w, y), width_pt, ink);
                }
            }
            TexturePattern::Dots { spacing_mm, tint } => {
                let ink = self.paper.mix(Rgb8::BLACK, tint);
                let dot = 0.3;
                for y in steps(spacing_mm, h) {
                    for x in steps(spacing_mm, w) {
                        self.fill_rect(x - dot / 2.0, y - dot / 2.0, dot, dot, ink);
                    }
                }
            }
            TexturePattern::Diagonal { spacing_mm, tint } => {
                let ink = self.paper.mix(Rgb8::BLACK, tint);
                let mut c = -h;
                while c < w {
                    self.line((c, 0.0), (c + h, h), width_pt, ink);
                    self.line((c + h, 0.0), (c, h), width_pt, ink);
                    c += spacing_mm;
                }
            }
        }
    }

    fn draw_cut_label(&mut self, x: f32, y_center: f32, label: &str) {
        let size_pt = 8.0;
        let label = pdf_safe(label).trim().to_string();
        let len = text_width_mm(&label, size_pt);
        let thick = size_pt * PT_TO_MM * 1.4;
        self.fill_rect(
            x - thick / 2.0,
            y_center - len / 2.0 - 1.0,
            thick,
            len + 2.0,
            self.paper,
        );

        // Reads top to bottom, like text rotated 90 degrees clockwise.
        let origin = self.point(x + size_pt * PT_TO_MM * 0.35, y_center - len / 2.0).p;
        let font = self.font(false);
        self.ops.push(Op::SetFillColor {
            col: self.primary.to_pdf(),
        });
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextMatrix {
            matrix: TextMatrix::TranslateRotate(origin.x, origin.y, -90.0),
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(size_pt),
            font,
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(label)],
            font,
        });
        self.ops.push(Op::EndTextSection);
    }

    // -- Panel ----------------------------------------------------------------

    fn draw_panel(&mut self, slot: &PanelSlot) {
        let t = slot.typography;
        let x = slot.x_mm + slot.padding_mm;
        let width = slot.width_mm - 2.0 * slot.padding_mm;
        let top = slot.padding_mm;
        let bottom = self.page_h_mm - slot.padding_mm;

        if let Some(watermark) = &slot.panel.watermark {
            self.draw_watermark(slot, watermark);
        }

        if slot.divider_right {
            let edge = slot.x_mm + slot.width_mm;
            let primary = self.primary;
            self.line((edge, 0.0), (edge, self.page_h_mm), 0.75, primary);
        }

        let ctx = PanelCtx {
            t,
            via: slot.panel.via.as_deref(),
        };
        let fixed: f32 = slot
            .panel
            .blocks
            .iter()
            .filter(|b| !matches!(b, Block::Body { .. }))
            .map(|b| measure(b, width, &ctx))
            .sum();
        let body_room = (bottom - top - fixed).max(0.0);

        let mut y = top;
        for block in &slot.panel.blocks {
            let height = match block {
                Block::Body { .. } => body_room,
                other => measure(other, width, &ctx),
            };
            self.draw_block(block, x, y, width, height, &ctx);
            y += height;
        }
        debug!(used_mm = y - top, "panel drawn");
    }

    fn draw_watermark(&mut self, slot: &PanelSlot, watermark: &Watermark) {
        let Some((id, w, h)) = self.logo_image(&watermark.src, watermark.opacity, watermark.blend)
        else {
            return;
        };
        let size = watermark.size_px * PX_TO_MM;
        let x = slot.x_mm + (slot.width_mm - size) / 2.0;
        let y = (self.page_h_mm - size) / 2.0;
        self.place_image(id, w, h, x, y, size);
    }

    fn draw_block(&mut self, block: &Block, x: f32, y: f32, width: f32, height: f32, ctx: &PanelCtx) {
        let t = ctx.t;
        let ink = Rgb8::INK;
        let primary = self.primary;
        match block {
            Block::Banner { text } => {
                let bar = t.heading_pt * PT_TO_MM * 1.6;
                self.fill_rect(x, y, width, bar, primary);
                let baseline = y + bar / 2.0 + t.heading_pt * PT_TO_MM * 0.35;
                self.aligned_text(x, width, Align::Center, baseline, t.heading_pt, true, Rgb8::WHITE, text);
            }
            Block::ViaLabel => {
                if let Some(via) = ctx.via {
                    let baseline = y + line_mm(t.heading_pt, t.leading) * 0.8;
                    self.aligned_text(x, width, Align::Right, baseline, t.heading_pt, false, primary, via);
                }
            }
            Block::Header {
                align,
                logo,
                title,
                subtitle,
                lines,
            } => {
                let mut cursor = y;
                if let Some(logo) = logo {
                    let size = logo.size_px * PX_TO_MM;
                    if let Some((id, w, h)) = self.logo_image(&logo.src, 1.0, BlendMode::Normal) {
                        let left = match align {
                            Align::Left => x,
                            Align::Center => x + (width - size) / 2.0,
                            Align::Right => x + width - size,
                        };
                        self.place_image(id, w, h, left, cursor, size);
                    }
                    cursor += size + 3.0;
                }
                cursor += line_mm(t.title_pt, t.leading);
                self.aligned_text(x, width, *align, cursor - 1.5, t.title_pt, true, primary, title);
                if let Some(subtitle) = subtitle {
                    cursor += line_mm(t.body_pt, t.leading);
                    self.aligned_text(x, width, *align, cursor - 1.0, t.body_pt, false, Rgb8::MUTED, subtitle);
                }
                for line in lines {
                    cursor += line_mm(t.small_pt, t.leading);
                    self.aligned_text(x, width, *align, cursor - 1.0, t.small_pt, false, Rgb8::MUTED, line);
                }
                let rule_y = cursor + 4.0;
                self.line((x, rule_y), (x + width, rule_y), 1.5, primary);
            }
            Block::Section {
                title,
                boxed,
                muted,
                logo,
                rows,
                caption,
            } => {
                let pad = if *boxed { 2.0 } else { 0.0 };
                let gap = 2.0;
                if *boxed {
                    self.stroke_rect(x, y, width, height - gap, 0.5, Rgb8::MUTED);
                }
                let size_pt = if *boxed { t.small_pt } else { t.body_pt };
                let text_color = if *muted { Rgb8::MUTED } else { ink };
                let mut cursor = y + pad;
                if let Some(title) = title {
                    cursor += line_mm(t.small_pt, t.leading);
                    self.text(x + pad, cursor - 1.0, t.small_pt, true, primary, title);
                }
                let mut fields_x = x + pad;
                if let Some(logo) = logo {
                    let size = logo.size_px * PX_TO_MM;
                    if let Some((id, w, h)) = self.logo_image(&logo.src, 1.0, BlendMode::Normal) {
                        self.place_image(id, w, h, fields_x, cursor + 0.5, size);
                    }
                    fields_x += size + 2.0;
                }
                for row in rows {
                    cursor += line_mm(size_pt, t.leading);
                    self.draw_row(row, fields_x, cursor - 1.0, size_pt, text_color);
                }
                if let Some(caption) = caption {
                    cursor += 1.5;
                    self.line((x + pad, cursor), (x + width - pad, cursor), 0.5, Rgb8::MUTED);
                    cursor += line_mm(t.caption_pt, t.leading);
                    self.aligned_text(x, width, Align::Center, cursor - 0.8, t.caption_pt, false, Rgb8::MUTED, caption);
                }
            }
            Block::Body {
                title,
                title_align,
                boxed,
                text,
            } => {
                let pad = if *boxed { 2.0 } else { 0.0 };
                let gap = 2.0;
                if *boxed {
                    self.stroke_rect(x, y, width, (height - gap).max(0.0), 0.5, Rgb8::MUTED);
                }
                let limit = y + height - gap - pad;
                let mut cursor = y + pad + line_mm(t.heading_pt, t.leading);
                if cursor > limit {
                    return;
                }
                self.aligned_text(x + pad, width - 2.0 * pad, *title_align, cursor - 1.0, t.heading_pt, true, primary, title);
                cursor += 2.0;
                let step = line_mm(t.body_pt, t.leading);
                for line in wrap_text(text, chars_per_line(width - 2.0 * pad, t.body_pt)) {
                    if cursor + step > limit {
                        debug!("prescription text clipped to its box");
                        break;
                    }
                    cursor += step;
                    self.text(x + pad, cursor - 1.0, t.body_pt, false, ink, &line);
                }
            }
            Block::SignatureFooter {
                place_date,
                name,
                license,
            } => {
                let mut cursor = y + 8.0 + line_mm(t.body_pt, t.leading);
                self.aligned_text(x, width, Align::Right, cursor - 1.0, t.body_pt, false, ink, place_date);
                cursor += 10.0;
                let rule_w = 48.0;
                let rule_x = x + width - rule_w;
                self.line((rule_x, cursor), (x + width, cursor), 0.5, Rgb8::MUTED);
                cursor += line_mm(t.body_pt, t.leading);
                self.aligned_text(rule_x, rule_w, Align::Center, cursor - 1.0, t.body_pt, true, ink, name);
                cursor += line_mm(t.small_pt, t.leading);
                self.aligned_text(rule_x, rule_w, Align::Center, cursor - 1.0, t.small_pt, false, Rgb8::MUTED, license);
            }
            Block::DateSignature { date, caption } => {
                let rule_y = y + 8.0;
                self.text(x, rule_y, t.body_pt, false, ink, date);
                let rule_w = 32.0;
                let rule_x = x + width - rule_w;
                self.line((rule_x, rule_y - 2.0), (x + width, rule_y - 2.0), 0.5, Rgb8::MUTED);
                self.aligned_text(rule_x, rule_w, Align::Center, rule_y + line_mm(t.small_pt, 1.0) - 1.0, t.small_pt, false, ink, caption);
            }
            Block::Columns(columns) => {
                let n = columns.len().max(1) as f32;
                let gap = 1.0;
                let col_w = (width - gap * (n - 1.0)) / n;
                for (i, column) in columns.iter().enumerate() {
                    let col_x = x + i as f32 * (col_w + gap);
                    self.draw_block(column, col_x, y, col_w, height, ctx);
                }
            }
        }
    }

    fn draw_row(&mut self, row: &[Field], x: f32, baseline: f32, size_pt: f32, color: Rgb8) {
        let mut cursor = x;
        for field in row {
            self.text(cursor, baseline, size_pt, true, color, &field.label);
            cursor += text_width_mm(&field.label, size_pt) + 1.0;
            let value_w = text_width_mm(&field.value, size_pt);
            self.text(cursor, baseline, size_pt, false, color, &field.value);
            if field.underline {
                let rule_w = value_w.max(180.0 * PX_TO_MM);
                self.line((cursor, baseline + 0.8), (cursor + rule_w, baseline + 0.8), 0.4, Rgb8::MUTED);
                cursor += rule_w + 3.0;
            } else {
                cursor += value_w + 3.0;
            }
        }
    }
}

struct PanelCtx<'a> {
    t: Typography,
    via: Option<&'a str>,
}

// -- Measurement ----------------------------------------------------------------

fn line_mm(size_pt: f32, leading: f32) -> f32 {
    size_pt * leading * PT_TO_MM
}

fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    pdf_safe(text).chars().count() as f32 * AVG_GLYPH_EM * size_pt * PT_TO_MM
}

fn chars_per_line(width_mm: f32, size_pt: f32) -> usize {
    ((width_mm / (AVG_GLYPH_EM * size_pt * PT_TO_MM)) as usize).max(1)
}

/// Height of a block in millimetres. Body blocks report their natural
/// height; the panel stretches or clips them.
fn measure(block: &Block, width: f32, ctx: &PanelCtx) -> f32 {
    let t = &ctx.t;
    match block {
        Block::Banner { .. } => t.heading_pt * PT_TO_MM * 1.6 + 2.0,
        Block::ViaLabel => line_mm(t.heading_pt, t.leading) + 1.0,
        Block::Header {
            logo,
            subtitle,
            lines,
            ..
        } => {
            let logo_h = logo.as_ref().map_or(0.0, |l| l.size_px * PX_TO_MM + 3.0);
            let subtitle_h = subtitle.as_ref().map_or(0.0, |_| line_mm(t.body_pt, t.leading));
            logo_h
                + line_mm(t.title_pt, t.leading)
                + subtitle_h
                + lines.len() as f32 * line_mm(t.small_pt, t.leading)
                + 4.0
                + 6.0
        }
        Block::Section {
            title,
            boxed,
            logo,
            rows,
            caption,
            ..
        } => {
            let pad = if *boxed { 2.0 } else { 0.0 };
            let size_pt = if *boxed { t.small_pt } else { t.body_pt };
            let title_h = title.as_ref().map_or(0.0, |_| line_mm(t.small_pt, t.leading));
            let rows_h = rows.len() as f32 * line_mm(size_pt, t.leading);
            let logo_h = logo.as_ref().map_or(0.0, |l| l.size_px * PX_TO_MM + 0.5);
            let caption_h = caption
                .as_ref()
                .map_or(0.0, |_| 1.5 + line_mm(t.caption_pt, t.leading));
            2.0 * pad + title_h + rows_h.max(logo_h) + caption_h + 2.0
        }
        Block::Body {
            boxed, text, ..
        } => {
            let pad = if *boxed { 2.0 } else { 0.0 };
            let lines = wrap_text(text, chars_per_line(width - 2.0 * pad, t.body_pt)).len();
            2.0 * pad
                + line_mm(t.heading_pt, t.leading)
                + 2.0
                + lines as f32 * line_mm(t.body_pt, t.leading)
                + 2.0
        }
        Block::SignatureFooter { .. } => {
            8.0 + line_mm(t.body_pt, t.leading)
                + 10.0
                + line_mm(t.body_pt, t.leading)
                + line_mm(t.small_pt, t.leading)
        }
        Block::DateSignature { .. } => 8.0 + line_mm(t.small_pt, 1.0) + 2.0,
        Block::Columns(columns) => {
            let n = columns.len().max(1) as f32;
            let col_w = (width - (n - 1.0)) / n;
            columns
                .iter()
                .map(|c| measure(c, col_w, ctx))
                .fold(0.0, f32::max)
        }
    }
}

/// Evenly spaced positions in `(0, limit)`.
fn steps(spacing: f32, limit: f32) -> impl Iterator<Item = f32> {
    let spacing = spacing.max(0.5);
    (1..)
        .map(move |i| i as f32 * spacing)
        .take_while(move |v| *v < limit)
}

/// Keep only characters the built-in (Latin-1) fonts can show.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            '\u{2013}' | '\u{2014}' => Some('-'),
            '\u{2018}' | '\u{2019}' => Some('\''),
            '\u{201C}' | '\u{201D}' => Some('"'),
            c if (c as u32) < 0x20 => None,
            c if (c as u32) <= 0xFF => Some(c),
            _ => None,
        })
        .collect()
}

// -- Text wrapping helper -----------------------------------------------------

/// Wrap a multi-line string so that no line exceeds `max_width` characters.
///
/// Splits on existing newlines first, then performs simple word-wrap within each
/// paragraph. Words longer than `max_width` are force-broken.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            result.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0usize;

        for word in words {
            let chars: Vec<char> = word.chars().collect();
            if chars.len() > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                let mut chunks = chars.chunks(max_width).peekable();
                while let Some(chunk) = chunks.next() {
                    let piece: String = chunk.iter().collect();
                    if chunks.peek().is_some() {
                        result.push(piece);
                    } else {
                        current_len = chunk.len();
                        current = piece;
                    }
                }
            } else if current.is_empty() {
                current.push_str(word);
                current_len = chars.len();
            } else if current_len + 1 + chars.len() <= max_width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + chars.len();
            } else {
                result.push(std::mem::replace(&mut current, word.to_string()));
                current_len = chars.len();
            }
        }

        if !current.is_empty() {
            result.push(current);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{simple, special};
    use medreceita_core::style::{BorderStyle, LogoPosition, PrescriptionStyle, StyleEdit, Texture};
    use medreceita_core::types::{BuyerInfo, DoctorField, DoctorInfo, PrescriptionData};

    fn logo_url() -> String {
        let img = ::image::RgbaImage::from_pixel(4, 4, ::image::Rgba([20, 40, 160, 255]));
        ImageProcessor::from_dynamic(::image::DynamicImage::ImageRgba8(img))
            .to_png_data_url()
            .unwrap()
    }

    fn media_box(bytes: &[u8]) -> (f32, f32) {
        let doc = lopdf::Document::load_mem(bytes).expect("generated PDF should parse");
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page_id = *pages.values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media = match page.get(b"MediaBox") {
            Ok(media) => media.as_array().unwrap().clone(),
            Err(_) => {
                // Inherited from the page tree root.
                let parent = page.get(b"Parent").unwrap().as_reference().unwrap();
                let pages = doc.get_dictionary(parent).unwrap();
                pages.get(b"MediaBox").unwrap().as_array().unwrap().clone()
            }
        };
        let num = |o: &lopdf::Object| match o {
            lopdf::Object::Integer(i) => *i as f32,
            lopdf::Object::Real(r) => *r,
            other => panic!("unexpected MediaBox entry {other:?}"),
        };
        (num(&media[2]), num(&media[3]))
    }

    #[test]
    fn simple_page_is_portrait() {
        let doctor = DoctorInfo::default().with_field(DoctorField::Name, "Dr. Ana Souza");
        let doc = simple::render(&doctor, &PrescriptionData::default(), &PrescriptionStyle::default());
        let bytes = PdfWriter::new().render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let (w, h) = media_box(&bytes);
        assert!(h > w, "expected portrait, got {w}x{h}");
    }

    #[test]
    fn special_page_is_landscape_with_logo() {
        let style = PrescriptionStyle::default()
            .apply(StyleEdit::Logo(Some(logo_url())))
            .apply(StyleEdit::LogoPosition(Some(LogoPosition::Watermark)))
            .apply(StyleEdit::Texture(Texture::Crosshatch))
            .apply(StyleEdit::BorderStyle(BorderStyle::Double));
        let doc = special::render(
            &DoctorInfo::default(),
            &PrescriptionData::default(),
            &style,
            &BuyerInfo::default(),
        );
        let bytes = PdfWriter::new().render(&doc).unwrap();
        let (w, h) = media_box(&bytes);
        assert!(w > h, "expected landscape, got {w}x{h}");
    }

    #[test]
    fn vector_logos_and_odd_colours_do_not_fail_rendering() {
        let svg = data_url::encode("image/svg+xml", b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>");
        let style = PrescriptionStyle::default()
            .apply(StyleEdit::Logo(Some(svg)))
            .apply(StyleEdit::PrimaryColor("hsl(10, 50%, 50%)".into()))
            .apply(StyleEdit::BackgroundColor("not-a-colour".into()));
        let doc = simple::render(&DoctorInfo::default(), &PrescriptionData::default(), &style);
        assert!(PdfWriter::new().render(&doc).is_ok());
    }

    #[test]
    fn long_prescriptions_are_clipped_not_paginated() {
        let text = "Dipirona 500mg, tomar de 6 em 6 horas se dor.\n".repeat(200);
        let data = PrescriptionData::default().with_prescription(&text);
        let doc = special::render(
            &DoctorInfo::default(),
            &data,
            &PrescriptionStyle::default(),
            &BuyerInfo::default(),
        );
        let bytes = PdfWriter::new().render(&doc).unwrap();
        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
    }

    fn info_title(bytes: &[u8]) -> String {
        let doc = lopdf::Document::load_mem(bytes).unwrap();
        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let raw = doc
            .get_dictionary(info_id)
            .unwrap()
            .get(b"Title")
            .unwrap()
            .as_str()
            .unwrap()
            .to_vec();
        match raw.strip_prefix(&[0xfe, 0xff]) {
            Some(utf16) => String::from_utf16_lossy(
                &utf16
                    .chunks(2)
                    .map(|c| u16::from_be_bytes([c[0], *c.get(1).unwrap_or(&0)]))
                    .collect::<Vec<_>>(),
            ),
            None => String::from_utf8_lossy(&raw).into_owned(),
        }
    }

    #[test]
    fn exported_title_lands_in_document_info() {
        let doc = simple::render(
            &DoctorInfo::default(),
            &PrescriptionData::default(),
            &PrescriptionStyle::default(),
        );
        let titled = PdfWriter::new().with_title("receita-2026-10-16").render(&doc).unwrap();
        assert_eq!(info_title(&titled), "receita-2026-10-16");

        let blank = PdfWriter::new().with_title("  ").render(&doc).unwrap();
        assert!(info_title(&blank).starts_with("Receitu"));
    }

    #[test]
    fn wrap_respects_width_and_multibyte_text() {
        let lines = wrap_text("Amoxicilina 500mg cápsulas\n\nação", 12);
        assert_eq!(lines, vec!["Amoxicilina", "500mg", "cápsulas", "", "ação"]);
        let forced = wrap_text("ééééééééé", 4);
        assert_eq!(forced, vec!["éééé", "éééé", "é"]);
    }

    #[test]
    fn pdf_safe_drops_symbols_outside_latin1() {
        assert_eq!(pdf_safe("✂ Recortar"), " Recortar");
        assert_eq!(pdf_safe("1ª Via – Farmácia"), "1ª Via - Farmácia");
    }
}
