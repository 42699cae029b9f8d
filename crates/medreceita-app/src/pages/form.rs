// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Form controls shared by the editor pages.

use dioxus::prelude::*;

const INPUT_STYLE: &str =
    "width: 100%; padding: 8px; border: 1px solid #ccc; border-radius: 6px; font-size: 14px; box-sizing: border-box;";

#[component]
pub fn TextField(
    label: &'static str,
    value: String,
    #[props(default)]
    placeholder: &'static str,
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        label { style: "display: block; margin-bottom: 12px;",
            span { style: "display: block; font-size: 13px; color: #555; margin-bottom: 4px;", "{label}" }
            input {
                r#type: "text",
                style: INPUT_STYLE,
                value: "{value}",
                placeholder,
                oninput: move |evt| on_input.call(evt.value()),
            }
        }
    }
}

#[component]
pub fn TextArea(
    label: &'static str,
    value: String,
    rows: u32,
    #[props(default)]
    placeholder: &'static str,
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        label { style: "display: block; margin-bottom: 12px;",
            span { style: "display: block; font-size: 13px; color: #555; margin-bottom: 4px;", "{label}" }
            textarea {
                style: "{INPUT_STYLE} font-family: ui-monospace, monospace;",
                rows: "{rows}",
                value: "{value}",
                placeholder,
                oninput: move |evt| on_input.call(evt.value()),
            }
        }
    }
}

/// A labelled `<select>` over `(value, label)` pairs.
#[component]
pub fn SelectField(
    label: &'static str,
    value: String,
    options: Vec<(&'static str, &'static str)>,
    on_change: EventHandler<String>,
) -> Element {
    rsx! {
        label { style: "display: block; margin-bottom: 12px;",
            span { style: "display: block; font-size: 13px; color: #555; margin-bottom: 4px;", "{label}" }
            select {
                style: INPUT_STYLE,
                value: "{value}",
                onchange: move |evt| on_change.call(evt.value()),
                for (wire, text) in options.iter().copied() {
                    option { key: "{wire}", value: wire, selected: wire == value, "{text}" }
                }
            }
        }
    }
}

#[component]
pub fn ColorField(label: &'static str, value: String, on_change: EventHandler<String>) -> Element {
    rsx! {
        label { style: "display: flex; align-items: center; justify-content: space-between; margin-bottom: 12px;",
            span { style: "font-size: 13px; color: #555;", "{label}" }
            input {
                r#type: "color",
                value: "{value}",
                oninput: move |evt| on_change.call(evt.value()),
            }
        }
    }
}

/// Card wrapper used to group related fields.
#[component]
pub fn Section(title: &'static str, children: Element) -> Element {
    rsx! {
        section { style: "margin: 16px 0; padding: 16px; border: 1px solid #eee; border-radius: 10px; background: white;",
            h3 { style: "margin: 0 0 12px 0;", "{title}" }
            {children}
        }
    }
}
