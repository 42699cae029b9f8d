// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Style model: visual presentation of the prescription pad.
//
// Enumerations are closed sets. Stored values outside a set never fail the
// whole style; they resolve to the field's fallback visual and a warning is
// logged. Optional logo fields stay `None` until the user sets them so that
// persisted styles round-trip without render-time defaults leaking in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::types::PrescriptionType;

/// Header logo edge length when `logo_size` is unset.
pub const DEFAULT_HEADER_LOGO_PX: u32 = 60;
/// Watermark edge length when `logo_size` is unset.
pub const DEFAULT_WATERMARK_LOGO_PX: u32 = 250;
/// Logo opacity (percent) when `logo_opacity` is unset.
pub const DEFAULT_LOGO_OPACITY: u8 = 15;

/// Defines a closed string enum with lenient deserialisation.
macro_rules! style_enum {
    (
        $(#[$meta:meta])*
        $name:ident, fallback = $fallback:ident {
            $( $variant:ident => $wire:literal, $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            /// Every variant, in picker order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Wire name used in persisted styles.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $wire ),+
                }
            }

            /// Label shown in the style editor.
            pub fn label(&self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Visual used when a stored value is not recognised.
            pub fn fallback() -> Self {
                Self::$fallback
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok(Self::$variant), )+
                    other => Err(format!(
                        "unknown {} value: {other}",
                        stringify!($name)
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = serde_json::Value::deserialize(deserializer)?;
                let parsed = raw.as_str().and_then(|s| s.parse().ok());
                Ok(parsed.unwrap_or_else(|| {
                    warn!(
                        field = stringify!($name),
                        value = %raw,
                        "unrecognised style value, using fallback"
                    );
                    Self::$fallback
                }))
            }
        }
    };
}

style_enum! {
    /// Background paper texture.
    Texture, fallback = None {
        None => "none", "Sem textura",
        Linen => "linen", "Linho",
        Paper => "paper", "Papel",
        Grid => "grid", "Grade",
        Dots => "dots", "Pontilhado",
        Lines => "lines", "Pautado",
        Crosshatch => "crosshatch", "Hachurado",
    }
}

style_enum! {
    /// Named font family.
    FontFamily, fallback = Body {
        Prescription => "prescription", "Elegante",
        Classic => "classic", "Clássica",
        Body => "body", "Moderna",
        Display => "display", "Sofisticada",
        Modern => "modern", "Contemporânea",
        Elegant => "elegant", "Caligráfica",
    }
}

style_enum! {
    /// Page frame.
    BorderStyle, fallback = Simple {
        None => "none", "Sem borda",
        Simple => "simple", "Simples",
        Double => "double", "Dupla",
        Elegant => "elegant", "Elegante",
        Rounded => "rounded", "Arredondada",
        Thick => "thick", "Espessa",
    }
}

style_enum! {
    /// Where the logo is drawn.
    LogoPosition, fallback = Header {
        Header => "header", "Cabeçalho",
        Watermark => "watermark", "Marca d'água",
    }
}

style_enum! {
    /// Horizontal alignment of the header block.
    HeaderPosition, fallback = Center {
        Left => "left", "Esquerda",
        Center => "center", "Centro",
        Right => "right", "Direita",
    }
}

/// Visual configuration shared by both layout variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrescriptionStyle {
    /// Opaque colour string understood by the rendering surface.
    pub background_color: String,
    pub texture: Texture,
    pub font_family: FontFamily,
    pub primary_color: String,
    pub border_style: BorderStyle,
    /// Displayable image (data URL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Logo edge length in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_size: Option<u32>,
    /// Logo opacity in percent (0-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_opacity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_position: Option<LogoPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_position: Option<HeaderPosition>,
}

impl Default for PrescriptionStyle {
    fn default() -> Self {
        Self {
            background_color: "#faf9f7".into(),
            texture: Texture::Paper,
            font_family: FontFamily::Prescription,
            primary_color: "#2563eb".into(),
            border_style: BorderStyle::Elegant,
            logo: None,
            logo_size: None,
            logo_opacity: None,
            logo_position: None,
            header_position: None,
        }
    }
}

/// A single style change coming from the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleEdit {
    BackgroundColor(String),
    Texture(Texture),
    FontFamily(FontFamily),
    PrimaryColor(String),
    BorderStyle(BorderStyle),
    Logo(Option<String>),
    LogoSize(Option<u32>),
    LogoOpacity(Option<u8>),
    LogoPosition(Option<LogoPosition>),
    HeaderPosition(Option<HeaderPosition>),
}

/// Logo placement after every default has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLogo {
    pub src: String,
    pub position: LogoPosition,
    /// Edge length in CSS pixels.
    pub size_px: f32,
    /// Opacity as a fraction (0.0-1.0). Header logos are always opaque.
    pub opacity: f32,
}

impl PrescriptionStyle {
    /// Return a copy with one edit applied.
    pub fn apply(self, edit: StyleEdit) -> Self {
        match edit {
            StyleEdit::BackgroundColor(c) => Self {
                background_color: c,
                ..self
            },
            StyleEdit::Texture(texture) => Self { texture, ..self },
            StyleEdit::FontFamily(font_family) => Self {
                font_family,
                ..self
            },
            StyleEdit::PrimaryColor(c) => Self {
                primary_color: c,
                ..self
            },
            StyleEdit::BorderStyle(border_style) => Self {
                border_style,
                ..self
            },
            StyleEdit::Logo(logo) => Self {
                logo: logo.filter(|l| !l.is_empty()),
                ..self
            },
            StyleEdit::LogoSize(logo_size) => Self { logo_size, ..self },
            StyleEdit::LogoOpacity(o) => Self {
                logo_opacity: o.map(|v| v.min(100)),
                ..self
            },
            StyleEdit::LogoPosition(logo_position) => Self {
                logo_position,
                ..self
            },
            StyleEdit::HeaderPosition(header_position) => Self {
                header_position,
                ..self
            },
        }
    }

    pub fn has_logo(&self) -> bool {
        self.logo.as_deref().is_some_and(|l| !l.is_empty())
    }

    pub fn effective_logo_position(&self) -> LogoPosition {
        self.logo_position.unwrap_or(LogoPosition::Header)
    }

    pub fn effective_header_position(&self) -> HeaderPosition {
        self.header_position.unwrap_or(HeaderPosition::Center)
    }

    /// Opacity percent, clamped to 0-100.
    pub fn effective_logo_opacity(&self) -> u8 {
        self.logo_opacity.unwrap_or(DEFAULT_LOGO_OPACITY).min(100)
    }

    /// Logo edge length for the given layout. A stored size of 0 counts as
    /// unset. The dual-copy layout halves every size.
    pub fn effective_logo_size(&self, kind: PrescriptionType) -> f32 {
        let base = match self.logo_size.filter(|s| *s > 0) {
            Some(size) => size,
            None => match self.effective_logo_position() {
                LogoPosition::Header => DEFAULT_HEADER_LOGO_PX,
                LogoPosition::Watermark => DEFAULT_WATERMARK_LOGO_PX,
            },
        };
        base as f32 * kind.logo_scale()
    }

    /// Fully defaulted logo placement, or `None` when no logo is set.
    pub fn resolved_logo(&self, kind: PrescriptionType) -> Option<ResolvedLogo> {
        let src = self.logo.as_ref().filter(|l| !l.is_empty())?;
        let position = self.effective_logo_position();
        let opacity = match position {
            LogoPosition::Header => 1.0,
            LogoPosition::Watermark => f32::from(self.effective_logo_opacity()) / 100.0,
        };
        Some(ResolvedLogo {
            src: src.clone(),
            position,
            size_px: self.effective_logo_size(kind),
            opacity,
        })
    }
}

impl PrescriptionType {
    /// Factor applied to logo sizes (each dual copy is half-width).
    pub fn logo_scale(&self) -> f32 {
        match self {
            Self::Simple => 1.0,
            Self::Special => 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_logo() -> PrescriptionStyle {
        PrescriptionStyle::default().apply(StyleEdit::Logo(Some(
            "data:image/png;base64,AAAA".into(),
        )))
    }

    #[test]
    fn logo_position_defaults_to_header() {
        let style = with_logo();
        assert_eq!(style.effective_logo_position(), LogoPosition::Header);
        let logo = style.resolved_logo(PrescriptionType::Simple).unwrap();
        assert_eq!(logo.position, LogoPosition::Header);
        assert_eq!(logo.size_px, 60.0);
        let logo = style.resolved_logo(PrescriptionType::Special).unwrap();
        assert_eq!(logo.size_px, 30.0);
    }

    #[test]
    fn watermark_size_defaults_per_layout() {
        let style = with_logo().apply(StyleEdit::LogoPosition(Some(LogoPosition::Watermark)));
        assert_eq!(style.effective_logo_size(PrescriptionType::Simple), 250.0);
        assert_eq!(style.effective_logo_size(PrescriptionType::Special), 125.0);
        let logo = style.resolved_logo(PrescriptionType::Simple).unwrap();
        assert!((logo.opacity - 0.15).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_size_counts_as_unset() {
        let style = with_logo().apply(StyleEdit::LogoSize(Some(0)));
        assert_eq!(style.effective_logo_size(PrescriptionType::Simple), 60.0);
        let style = style.apply(StyleEdit::LogoSize(Some(80)));
        assert_eq!(style.effective_logo_size(PrescriptionType::Special), 40.0);
    }

    #[test]
    fn opacity_is_clamped() {
        let style = with_logo().apply(StyleEdit::LogoOpacity(Some(180)));
        assert_eq!(style.effective_logo_opacity(), 100);
        let mut raw = with_logo();
        raw.logo_opacity = Some(250);
        assert_eq!(raw.effective_logo_opacity(), 100);
    }

    #[test]
    fn no_logo_resolves_to_nothing() {
        let style = PrescriptionStyle::default().apply(StyleEdit::Logo(Some(String::new())));
        assert!(style.logo.is_none());
        assert!(style.resolved_logo(PrescriptionType::Simple).is_none());
    }

    #[test]
    fn defaults_match_original_palette() {
        let style = PrescriptionStyle::default();
        assert_eq!(style.background_color, "#faf9f7");
        assert_eq!(style.texture, Texture::Paper);
        assert_eq!(style.font_family, FontFamily::Prescription);
        assert_eq!(style.primary_color, "#2563eb");
        assert_eq!(style.border_style, BorderStyle::Elegant);
    }

    #[test]
    fn unset_optionals_are_not_serialised() {
        let json = serde_json::to_value(PrescriptionStyle::default()).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("logo"));
        assert!(!object.contains_key("logoSize"));
        assert_eq!(object["borderStyle"], "elegant");
    }

    #[test]
    fn unknown_enum_values_fall_back_per_field() {
        let json = r##"{
            "backgroundColor": "#fff",
            "texture": "marble",
            "fontFamily": "comic",
            "primaryColor": "#000",
            "borderStyle": 7,
            "logoPosition": "footer",
            "headerPosition": "justify"
        }"##;
        let style: PrescriptionStyle = serde_json::from_str(json).unwrap();
        assert_eq!(style.texture, Texture::None);
        assert_eq!(style.font_family, FontFamily::Body);
        assert_eq!(style.border_style, BorderStyle::Simple);
        assert_eq!(style.logo_position, Some(LogoPosition::Header));
        assert_eq!(style.header_position, Some(HeaderPosition::Center));
        assert_eq!(style.background_color, "#fff");
    }

    #[test]
    fn enum_wire_names_parse_back() {
        for texture in Texture::ALL {
            assert_eq!(texture.as_str().parse::<Texture>().unwrap(), *texture);
        }
        assert_eq!(FontFamily::ALL.len(), 6);
        assert_eq!(BorderStyle::ALL.len(), 6);
        assert!("Paper".parse::<Texture>().is_err());
    }
}
