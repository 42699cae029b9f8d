// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTML surface for the in-app preview and browser print.

use std::fmt::Write as _;

use medreceita_core::types::PrescriptionType;

use super::model::{
    BlendMode, Block, Field, LogoMark, PanelSlot, RenderedDocument, Typography, Watermark,
};

/// Texture and font classes referenced by [`render_html`].
pub const PRESCRIPTION_CSS: &str = r#"
.prescription-page { color: #1f2937; overflow: hidden; }
.prescription-page * { box-sizing: border-box; }
.prescription-page p { margin: 0; }
.prescription-muted { color: #6b7280; }
.font-prescription { font-family: 'Crimson Pro', Georgia, serif; }
.font-classic { font-family: 'Libre Baskerville', 'Times New Roman', serif; }
.font-body { font-family: 'Source Sans 3', Arial, sans-serif; }
.font-display { font-family: 'Playfair Display', Georgia, serif; }
.font-modern { font-family: Inter, Helvetica, sans-serif; }
.font-elegant { font-family: 'Cormorant Garamond', Garamond, serif; font-style: italic; }
.texture-linen { background-image: repeating-linear-gradient(0deg, rgba(0,0,0,.03) 0 1px, transparent 1px 4px), repeating-linear-gradient(90deg, rgba(0,0,0,.03) 0 1px, transparent 1px 4px); }
.texture-paper { background-image: radial-gradient(rgba(0,0,0,.04) 1px, transparent 1px); background-size: 9px 9px; }
.texture-grid { background-image: linear-gradient(rgba(0,0,0,.08) 1px, transparent 1px), linear-gradient(90deg, rgba(0,0,0,.08) 1px, transparent 1px); background-size: 5mm 5mm; }
.texture-dots { background-image: radial-gradient(rgba(0,0,0,.12) 1px, transparent 1px); background-size: 4mm 4mm; }
.texture-lines { background-image: linear-gradient(rgba(0,0,0,.10) 1px, transparent 1px); background-size: 100% 7mm; }
.texture-crosshatch { background-image: repeating-linear-gradient(45deg, rgba(0,0,0,.06) 0 1px, transparent 1px 4mm), repeating-linear-gradient(-45deg, rgba(0,0,0,.06) 0 1px, transparent 1px 4mm); }
@media print { body * { visibility: hidden; } .prescription-page, .prescription-page * { visibility: visible; } .prescription-page { position: absolute; left: 0; top: 0; } }
"#;

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a document as a self-contained HTML fragment.
pub fn render_html(doc: &RenderedDocument) -> String {
    let s = &doc.surface;
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="prescription-page print-{kind} {texture} {font}" style="width: {w}mm; height: {h}mm; background-color: {bg}; display: flex; position: relative; {border}">"#,
        kind = match doc.kind {
            PrescriptionType::Simple => "simple",
            PrescriptionType::Special => "special",
        },
        texture = s.texture.css_class,
        font = s.font.css_class,
        w = doc.page.width_mm,
        h = doc.page.height_mm,
        bg = escape(&s.background),
        border = escape(&s.border.css(&s.primary, &s.background)),
    );

    for (i, slot) in doc.panels.iter().enumerate() {
        if let Some(cut) = doc.cut_line.as_ref().filter(|_| i > 0) {
            let _ = write!(
                html,
                r#"<div class="cut-line" style="width: 0; position: relative; border-right: 2px dashed {c};"><span style="position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%) rotate(90deg); white-space: nowrap; padding: 0 4px; font-size: 8pt; color: {c}; background-color: {bg};">{label}</span></div>"#,
                c = escape(&s.primary),
                bg = escape(&s.background),
                label = escape(&cut.label),
            );
        }
        render_panel(&mut html, doc, slot);
    }

    html.push_str("</div>");
    html
}

fn render_panel(html: &mut String, doc: &RenderedDocument, slot: &PanelSlot) {
    let primary = escape(&doc.surface.primary);
    let t = &slot.typography;
    let divider = if slot.divider_right {
        format!("border-right: 1px solid {primary};")
    } else {
        String::new()
    };
    let _ = write!(
        html,
        r#"<div class="prescription-panel" style="width: {w}mm; height: 100%; padding: {p}mm; font-size: {fs}pt; line-height: {lh}; display: flex; flex-direction: column; position: relative; {divider}">"#,
        w = slot.width_mm,
        p = slot.padding_mm,
        fs = t.body_pt,
        lh = t.leading,
    );

    if let Some(watermark) = &slot.panel.watermark {
        render_watermark(html, watermark);
    }

    for block in &slot.panel.blocks {
        render_block(html, block, slot, &primary);
    }
    html.push_str("</div>");
}

fn render_watermark(html: &mut String, w: &Watermark) {
    let blend = match w.blend {
        BlendMode::Normal => "",
        BlendMode::Multiply => " mix-blend-mode: multiply;",
    };
    let _ = write!(
        html,
        r#"<div style="position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; pointer-events: none; z-index: 0;"><img src="{src}" alt="Logo watermark" style="width: {sz}px; height: {sz}px; object-fit: contain; opacity: {op};{blend}"></div>"#,
        src = escape(&w.src),
        sz = w.size_px,
        op = w.opacity,
    );
}

fn logo_img(html: &mut String, logo: &LogoMark, extra: &str) {
    let _ = write!(
        html,
        r#"<img src="{src}" alt="Logo" style="width: {sz}px; height: {sz}px; object-fit: contain; flex-shrink: 0; {extra}">"#,
        src = escape(&logo.src),
        sz = logo.size_px,
    );
}

fn render_fields(html: &mut String, rows: &[Vec<Field>]) {
    for row in rows {
        if row.is_empty() {
            html.push_str("<p>&nbsp;</p>");
            continue;
        }
        html.push_str(r#"<div style="display: flex; gap: 0.75em;">"#);
        for field in row {
            let value = if field.underline {
                format!(
                    r#"<span style="display: inline-block; min-width: 180px; border-bottom: 1px solid rgba(0,0,0,.35);">{}</span>"#,
                    escape(&field.value)
                )
            } else {
                escape(&field.value)
            };
            let _ = write!(
                html,
                r#"<p><span style="font-weight: 600;">{}</span> {}</p>"#,
                escape(&field.label),
                value
            );
        }
        html.push_str("</div>");
    }
}

fn render_block(html: &mut String, block: &Block, slot: &PanelSlot, primary: &str) {
    let t: &Typography = &slot.typography;
    match block {
        Block::Banner { text } => {
            let _ = write!(
                html,
                r#"<div style="background-color: {primary}; color: #fff; text-align: center; font-weight: 700; font-size: {fs}pt; padding: 2px 0; margin-bottom: 0.5em; position: relative; z-index: 1;">{}</div>"#,
                escape(text),
                fs = t.heading_pt,
            );
        }
        Block::ViaLabel => {
            if let Some(via) = &slot.panel.via {
                let _ = write!(
                    html,
                    r#"<div style="text-align: right; font-size: {fs}pt; font-weight: 500; color: {primary}; margin-bottom: 0.25em; position: relative; z-index: 1;">{}</div>"#,
                    escape(via),
                    fs = t.heading_pt,
                );
            }
        }
        Block::Header {
            align,
            logo,
            title,
            subtitle,
            lines,
        } => {
            let _ = write!(
                html,
                r#"<div style="display: flex; flex-direction: column; align-items: {ai}; text-align: {ta}; border-bottom: 2px solid {primary}; padding-bottom: 1em; margin-bottom: 1.5em; position: relative; z-index: 1;">"#,
                ai = align.css_align_items(),
                ta = align.css_text_align(),
            );
            if let Some(logo) = logo {
                logo_img(html, logo, "margin-bottom: 0.75em;");
            }
            let _ = write!(
                html,
                r#"<h1 style="font-size: {fs}pt; font-weight: 700; margin: 0 0 0.25em; color: {primary};">{}</h1>"#,
                escape(title),
                fs = t.title_pt,
            );
            if let Some(subtitle) = subtitle {
                let _ = write!(
                    html,
                    r#"<p class="prescription-muted">{}</p>"#,
                    escape(subtitle)
                );
            }
            let _ = write!(
                html,
                r#"<div class="prescription-muted" style="font-size: {fs}pt;">"#,
                fs = t.small_pt
            );
            for line in lines {
                let _ = write!(html, "<p>{}</p>", escape(line));
            }
            html.push_str("</div></div>");
        }
        Block::Section {
            title,
            boxed,
            muted,
            logo,
            rows,
            caption,
        } => {
            let frame = if *boxed {
                "border: 1px solid rgba(0,0,0,.4); padding: 0.5em;"
            } else {
                ""
            };
            let class = if *muted { "prescription-muted" } else { "" };
            let _ = write!(
                html,
                r#"<div class="{class}" style="{frame} margin-bottom: 0.5em; position: relative; z-index: 1;">"#,
            );
            if let Some(title) = title {
                let _ = write!(
                    html,
                    r#"<div style="font-weight: 700; color: {primary}; font-size: {fs}pt; margin-bottom: 0.25em;">{}</div>"#,
                    escape(title),
                    fs = t.small_pt,
                );
            }
            html.push_str(r#"<div style="display: flex; gap: 0.5em; align-items: flex-start;">"#);
            if let Some(logo) = logo {
                logo_img(html, logo, "");
            }
            html.push_str(r#"<div style="flex: 1;">"#);
            render_fields(html, rows);
            html.push_str("</div></div>");
            if let Some(caption) = caption {
                let _ = write!(
                    html,
                    r#"<div style="margin-top: 0.25em; border-top: 1px solid rgba(0,0,0,.3); text-align: center; font-size: {fs}pt;">{}</div>"#,
                    escape(caption),
                    fs = t.caption_pt,
                );
            }
            html.push_str("</div>");
        }
        Block::Body {
            title,
            title_align,
            boxed,
            text,
        } => {
            let frame = if *boxed {
                "border: 1px solid rgba(0,0,0,.4); padding: 0.5em; overflow: hidden;"
            } else {
                ""
            };
            let _ = write!(
                html,
                r#"<div style="flex: 1; min-height: 0; margin-bottom: 0.5em; position: relative; z-index: 1; {frame}"><div style="font-weight: 700; font-size: {fs}pt; color: {primary}; text-align: {ta}; margin-bottom: 0.5em;">{}</div><div style="white-space: pre-wrap;">{}</div></div>"#,
                escape(title),
                escape(text),
                fs = t.heading_pt,
                ta = title_align.css_text_align(),
            );
        }
        Block::SignatureFooter {
            place_date,
            name,
            license,
        } => {
            let _ = write!(
                html,
                r#"<div style="margin-top: auto; padding-top: 2em; text-align: right; position: relative; z-index: 1;"><p>{}</p><div style="display: inline-block; text-align: center; margin-top: 2.5em;"><div style="width: 48mm; border-top: 1px solid rgba(0,0,0,.5); padding-top: 2px;"><p style="font-weight: 600;">{}</p><p class="prescription-muted" style="font-size: {fs}pt;">{}</p></div></div></div>"#,
                escape(place_date),
                escape(name),
                escape(license),
                fs = t.small_pt,
            );
        }
        Block::DateSignature { date, caption } => {
            let _ = write!(
                html,
                r#"<div style="display: flex; justify-content: space-between; align-items: flex-end; margin-bottom: 0.5em; position: relative; z-index: 1;"><p>{}</p><div style="width: 32mm; border-top: 1px solid rgba(0,0,0,.5); text-align: center; font-size: {fs}pt;">{}</div></div>"#,
                escape(date),
                escape(caption),
                fs = t.small_pt,
            );
        }
        Block::Columns(columns) => {
            let _ = write!(
                html,
                r#"<div style="display: flex; gap: 2px; font-size: {fs}pt; position: relative; z-index: 1;">"#,
                fs = t.small_pt
            );
            for column in columns {
                html.push_str(r#"<div style="flex: 1 1 0;">"#);
                render_block(html, column, slot, primary);
                html.push_str("</div>");
            }
            html.push_str("</div>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{simple, special};
    use medreceita_core::style::{BorderStyle, PrescriptionStyle, StyleEdit, Texture};
    use medreceita_core::types::{BuyerInfo, DoctorField, DoctorInfo, PrescriptionData};

    #[test]
    fn text_is_escaped() {
        let doctor = DoctorInfo::default().with_field(DoctorField::Name, "<script>alert(1)</script>");
        let html = render_html(&simple::render(
            &doctor,
            &PrescriptionData::default(),
            &PrescriptionStyle::default(),
        ));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn classes_and_border_follow_style() {
        let style = PrescriptionStyle::default()
            .apply(StyleEdit::Texture(Texture::Grid))
            .apply(StyleEdit::BorderStyle(BorderStyle::Thick));
        let html = render_html(&simple::render(
            &DoctorInfo::default(),
            &PrescriptionData::default(),
            &style,
        ));
        assert!(html.contains("texture-grid"));
        assert!(html.contains("font-prescription"));
        assert!(html.contains("border: 4px solid #2563eb;"));
        assert!(html.contains("width: 210mm; height: 297mm"));
    }

    #[test]
    fn special_page_has_cut_line_and_both_vias() {
        let html = render_html(&special::render(
            &DoctorInfo::default(),
            &PrescriptionData::default(),
            &PrescriptionStyle::default(),
            &BuyerInfo::default(),
        ));
        assert!(html.contains("✂ Recortar"));
        assert!(html.contains("1ª Via - Farmácia"));
        assert!(html.contains("2ª Via - Paciente"));
        assert_eq!(html.matches("RECEITUÁRIO DE CONTROLE ESPECIAL").count(), 2);
    }
}
