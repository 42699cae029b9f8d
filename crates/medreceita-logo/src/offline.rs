// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Offline logo generator: a handful of monochrome medical marks drawn as SVG
// in the requested colour. Used when no logo service is configured.

use medreceita_core::error::Result;
use medreceita_core::types::LogoAsset;
use tracing::{debug, instrument};

use crate::generator::{LogoGenerator, LogoRequest};

const FALLBACK_COLOR: &str = "#2563eb";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoTemplate {
    Caduceus,
    Cross,
    HeartPulse,
    Pill,
}

impl LogoTemplate {
    pub const ALL: [Self; 4] = [Self::Caduceus, Self::Cross, Self::HeartPulse, Self::Pill];

    /// Pick a template for a prompt. Keywords win; otherwise the choice is a
    /// stable function of the prompt text.
    pub fn for_prompt(prompt: &str) -> Self {
        let lower = prompt.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));
        if has(&["caduc", "cobra", "serpente", "snake", "bastão"]) {
            Self::Caduceus
        } else if has(&["coraç", "cardio", "heart", "pulso", "pulse"]) {
            Self::HeartPulse
        } else if has(&["pílula", "pilula", "cápsula", "capsula", "remédio", "pill", "farmác"]) {
            Self::Pill
        } else if has(&["cruz", "cross", "hospital"]) {
            Self::Cross
        } else {
            let sum = lower.bytes().fold(0u32, |acc, b| acc.wrapping_add(b as u32));
            Self::ALL[(sum % Self::ALL.len() as u32) as usize]
        }
    }

    fn body(self, color: &str) -> String {
        match self {
            Self::Caduceus => format!(
                concat!(
                    r#"<rect x="244" y="72" width="24" height="380" rx="12" fill="{c}"/>"#,
                    r#"<circle cx="256" cy="64" r="28" fill="{c}"/>"#,
                    r#"<path d="M256 120 C160 100 120 170 256 190 C392 210 352 280 256 300 C160 320 200 390 256 400" "#,
                    r#"fill="none" stroke="{c}" stroke-width="22" stroke-linecap="round"/>"#,
                    r#"<path d="M244 96 C180 40 90 60 60 110 C120 100 180 110 244 140 Z" fill="{c}"/>"#,
                    r#"<path d="M268 96 C332 40 422 60 452 110 C392 100 332 110 268 140 Z" fill="{c}"/>"#,
                ),
                c = color
            ),
            Self::Cross => format!(
                r#"<path d="M196 64 H316 V196 H448 V316 H316 V448 H196 V316 H64 V196 H196 Z" fill="{color}"/>"#
            ),
            Self::HeartPulse => format!(
                concat!(
                    r#"<path d="M256 448 L88 280 C28 220 40 120 120 96 C180 80 228 112 256 156 "#,
                    r#"C284 112 332 80 392 96 C472 120 484 220 424 280 Z" fill="{c}"/>"#,
                    r#"<path d="M96 260 H200 L228 200 L268 320 L300 240 H416" fill="none" "#,
                    r##"stroke="#ffffff" stroke-width="22" stroke-linejoin="round" stroke-linecap="round"/>"##,
                ),
                c = color
            ),
            Self::Pill => format!(
                concat!(
                    r#"<g transform="rotate(-45 256 256)">"#,
                    r#"<rect x="96" y="176" width="320" height="160" rx="80" fill="none" stroke="{c}" stroke-width="28"/>"#,
                    r#"<path d="M256 176 H176 A80 80 0 0 0 176 336 H256 Z" fill="{c}"/>"#,
                    r#"</g>"#,
                ),
                c = color
            ),
        }
    }

    /// Complete SVG document for this template.
    pub fn render(self, color: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 512 512" width="512" height="512">{}</svg>"#,
            self.body(color)
        )
    }
}

/// Keep colour strings from breaking out of an SVG attribute.
fn sanitize_color(color: &str) -> String {
    let cleaned: String = color
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' '))
        .collect();
    if cleaned.trim().is_empty() {
        FALLBACK_COLOR.to_string()
    } else {
        cleaned
    }
}

/// Draws logos locally from [`LogoTemplate`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgLogoGenerator;

impl SvgLogoGenerator {
    pub fn draw(&self, request: &LogoRequest) -> LogoAsset {
        let template = LogoTemplate::for_prompt(&request.prompt);
        debug!(?template, "drawing offline logo");
        LogoAsset::Vector(template.render(&sanitize_color(&request.primary_color)))
    }
}

impl LogoGenerator for SvgLogoGenerator {
    #[instrument(skip_all)]
    async fn generate(&self, request: &LogoRequest) -> Result<LogoAsset> {
        Ok(self.draw(request))
    }
}
