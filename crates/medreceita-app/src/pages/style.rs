// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Style page: colours, texture, font, frame, header alignment and the logo
// manager (upload, generation, history).

use dioxus::prelude::*;

use medreceita_bridge::NativeFilePicker;
use medreceita_core::error::{MedReceitaError, Result};
use medreceita_core::style::{
    BorderStyle, DEFAULT_LOGO_OPACITY, FontFamily, HeaderPosition, LogoPosition, Texture,
};
use medreceita_core::types::PrescriptionType;
use medreceita_core::upload::UploadCandidate;
use medreceita_core::StyleEdit;

use super::form::{ColorField, Section, SelectField};
use crate::services::app_services::AppServices;
use crate::state::AppState;

const LOGO_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/bmp",
    "image/svg+xml",
];

macro_rules! options_of {
    ($ty:ty) => {
        <$ty>::ALL.iter().map(|v| (v.as_str(), v.label())).collect::<Vec<_>>()
    };
}

#[component]
pub fn Style() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let style = state.read().session.style().clone();

    rsx! {
        div { style: "max-width: 640px; margin: 0 auto;",
            h1 { "Estilo" }

            Section { title: "Aparência",
                ColorField {
                    label: "Cor principal",
                    value: style.primary_color.clone(),
                    on_change: move |v: String| state.write().session.edit_style(StyleEdit::PrimaryColor(v)),
                }
                ColorField {
                    label: "Cor do papel",
                    value: style.background_color.clone(),
                    on_change: move |v: String| state.write().session.edit_style(StyleEdit::BackgroundColor(v)),
                }
                SelectField {
                    label: "Textura",
                    value: style.texture.as_str().to_string(),
                    options: options_of!(Texture),
                    on_change: move |v: String| {
                        if let Ok(t) = v.parse::<Texture>() {
                            state.write().session.edit_style(StyleEdit::Texture(t));
                        }
                    },
                }
                SelectField {
                    label: "Fonte",
                    value: style.font_family.as_str().to_string(),
                    options: options_of!(FontFamily),
                    on_change: move |v: String| {
                        if let Ok(f) = v.parse::<FontFamily>() {
                            state.write().session.edit_style(StyleEdit::FontFamily(f));
                        }
                    },
                }
                SelectField {
                    label: "Borda",
                    value: style.border_style.as_str().to_string(),
                    options: options_of!(BorderStyle),
                    on_change: move |v: String| {
                        if let Ok(b) = v.parse::<BorderStyle>() {
                            state.write().session.edit_style(StyleEdit::BorderStyle(b));
                        }
                    },
                }
                SelectField {
                    label: "Alinhamento do cabeçalho",
                    value: style.effective_header_position().as_str().to_string(),
                    options: options_of!(HeaderPosition),
                    on_change: move |v: String| {
                        if let Ok(h) = v.parse::<HeaderPosition>() {
                            state.write().session.edit_style(StyleEdit::HeaderPosition(Some(h)));
                        }
                    },
                }
            }

            LogoManager {}
        }
    }
}

#[component]
fn LogoManager() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let (style, history, uploading, generating, prompt) = {
        let s = state.read();
        (
            s.session.style().clone(),
            s.session
                .history()
                .items()
                .iter()
                .rev()
                .map(|item| (item.id.clone(), item.url.clone(), item.caption()))
                .collect::<Vec<_>>(),
            s.session.is_uploading(),
            s.session.is_generating(),
            s.logo_prompt.clone(),
        )
    };
    let position = style.effective_logo_position();
    let size = style.effective_logo_size(PrescriptionType::Simple).round() as u32;
    let opacity = style.effective_logo_opacity();

    rsx! {
        Section { title: "Logo",
            if let Some(logo) = style.logo.clone() {
                div { style: "display: flex; align-items: center; gap: 16px; margin-bottom: 12px;",
                    img { src: "{logo}", style: "width: 96px; height: 96px; object-fit: contain; border: 1px solid #eee; border-radius: 8px;" }
                    button {
                        style: "padding: 6px 12px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                        onclick: move |_| state.write().session.clear_logo(),
                        "Remover logo"
                    }
                }
            }

            // Upload
            button {
                style: "width: 100%; padding: 10px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white; font-size: 15px; margin-bottom: 12px;",
                disabled: uploading,
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let candidate = match pick_logo_file(&svc) {
                            Ok(Some(c)) => c,
                            Ok(None) => return,
                            Err(e) => {
                                state.write().session.report(&e);
                                return;
                            }
                        };
                        let begun = state.write().session.begin_upload(&candidate);
                        if begun.is_err() {
                            return;
                        }
                        let svc = svc.clone();
                        spawn(async move {
                            let result = svc.process_upload(candidate).await;
                            state.write().session.finish_upload(result);
                        });
                    }
                },
                if uploading { "Processando imagem..." } else { "Carregar imagem" }
            }

            // Generation
            div { style: "display: flex; gap: 8px; margin-bottom: 12px;",
                input {
                    r#type: "text",
                    style: "flex: 1; padding: 8px; border: 1px solid #ccc; border-radius: 6px;",
                    placeholder: "Descreva o logo (ex.: caduceu minimalista)",
                    value: "{prompt}",
                    oninput: move |evt| state.write().logo_prompt = evt.value(),
                }
                button {
                    style: "padding: 8px 16px; border-radius: 6px; border: none; background: #007aff; color: white;",
                    disabled: generating || prompt.trim().is_empty(),
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let prompt = state.read().logo_prompt.clone();
                            let begun = state.write().session.begin_generation(&prompt);
                            let Ok(request) = begun else {
                                return;
                            };
                            let svc = svc.clone();
                            spawn(async move {
                                let result = svc.generate_logo(request).await;
                                state.write().session.finish_generation(&prompt, result);
                            });
                        }
                    },
                    if generating { "Gerando..." } else { "Gerar" }
                }
            }

            if style.has_logo() {
                SelectField {
                    label: "Posição do logo",
                    value: position.as_str().to_string(),
                    options: options_of!(LogoPosition),
                    on_change: move |v: String| {
                        if let Ok(p) = v.parse::<LogoPosition>() {
                            state.write().session.edit_style(StyleEdit::LogoPosition(Some(p)));
                        }
                    },
                }
                RangeRow {
                    label: "Tamanho (px)",
                    value: size,
                    min: 20,
                    max: 400,
                    on_change: move |v: u32| state.write().session.edit_style(StyleEdit::LogoSize(Some(v))),
                }
                if position == LogoPosition::Watermark {
                    RangeRow {
                        label: "Opacidade (%)",
                        value: u32::from(opacity),
                        min: 0,
                        max: 100,
                        on_change: move |v: u32| {
                            let pct = u8::try_from(v).unwrap_or(DEFAULT_LOGO_OPACITY);
                            state.write().session.edit_style(StyleEdit::LogoOpacity(Some(pct)));
                        },
                    }
                }
            }

            if !history.is_empty() {
                h4 { style: "margin: 16px 0 8px 0;", "Logos anteriores" }
                div { style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(110px, 1fr)); gap: 8px;",
                    for (id, url, caption) in history {
                        div { key: "{id}",
                            style: "border: 1px solid #eee; border-radius: 8px; padding: 6px; text-align: center;",
                            img { src: "{url}", style: "width: 72px; height: 72px; object-fit: contain;" }
                            p { style: "margin: 4px 0; font-size: 11px; color: #666;", "{caption}" }
                            div { style: "display: flex; gap: 4px; justify-content: center;",
                                button {
                                    style: "font-size: 11px; padding: 2px 6px;",
                                    onclick: {
                                        let id = id.clone();
                                        move |_| {
                                            state.write().session.select_logo(&id);
                                        }
                                    },
                                    "Usar"
                                }
                                button {
                                    style: "font-size: 11px; padding: 2px 6px;",
                                    onclick: {
                                        let id = id.clone();
                                        move |_| {
                                            state.write().session.remove_logo(&id);
                                        }
                                    },
                                    "Excluir"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn RangeRow(label: &'static str, value: u32, min: u32, max: u32, on_change: EventHandler<u32>) -> Element {
    rsx! {
        label { style: "display: block; margin-bottom: 12px;",
            span { style: "display: block; font-size: 13px; color: #555; margin-bottom: 4px;", "{label}: {value}" }
            input {
                r#type: "range",
                style: "width: 100%;",
                min: "{min}",
                max: "{max}",
                value: "{value}",
                oninput: move |evt| {
                    if let Ok(v) = evt.value().parse::<u32>() {
                        on_change.call(v);
                    }
                },
            }
        }
    }
}

/// Ask the platform for a logo file, falling back to the desktop dialog
/// where there is no native picker.
fn pick_logo_file(svc: &AppServices) -> Result<Option<UploadCandidate>> {
    let bridge = svc.bridge();
    match bridge.pick_file(LOGO_MIME_TYPES) {
        Ok(Some(path)) => {
            let bytes = bridge.read_picked_file(&path)?;
            let name = path.rsplit(['/', '\\']).next().unwrap_or(&path).to_string();
            Ok(Some(UploadCandidate::from_file_name(name, bytes)))
        }
        Ok(None) => Ok(None),
        Err(MedReceitaError::PlatformUnavailable) => pick_with_dialog(),
        Err(e) => Err(e),
    }
}

#[cfg(not(any(target_os = "ios", target_os = "android")))]
fn pick_with_dialog() -> Result<Option<UploadCandidate>> {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Imagens", &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"])
        .pick_file()
    else {
        return Ok(None);
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "logo".into());
    let bytes = std::fs::read(&path)?;
    tracing::debug!(%name, bytes = bytes.len(), "logo file picked");
    Ok(Some(UploadCandidate::from_file_name(name, bytes)))
}

#[cfg(any(target_os = "ios", target_os = "android"))]
fn pick_with_dialog() -> Result<Option<UploadCandidate>> {
    Err(MedReceitaError::PlatformUnavailable)
}
