// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dismissible success/error banners for the session's notices.

use dioxus::prelude::*;

use crate::session::{Notice, NoticeKind};
use crate::state::AppState;

#[component]
pub fn Notices() -> Element {
    let state = use_context::<Signal<AppState>>();
    let notices = state.read().session.notices().to_vec();

    rsx! {
        div { class: "no-print", style: "padding: 0 16px;",
            for (index, notice) in notices.into_iter().enumerate() {
                NoticeBanner { key: "{index}-{notice.message}", index, notice }
            }
        }
    }
}

#[component]
fn NoticeBanner(index: usize, notice: Notice) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let (color, bg) = match notice.kind {
        NoticeKind::Success => ("#155724", "#d4edda"),
        NoticeKind::Error => ("#721c24", "#f8d7da"),
    };

    rsx! {
        div {
            style: "display: flex; justify-content: space-between; align-items: flex-start; gap: 8px; margin-top: 8px; padding: 10px 12px; border-radius: 8px; color: {color}; background: {bg};",
            div {
                strong { "{notice.message}" }
                if let Some(detail) = notice.detail.as_ref() {
                    p { style: "margin: 4px 0 0 0; font-size: 13px;", "{detail}" }
                }
            }
            button {
                style: "border: none; background: transparent; color: {color}; font-size: 16px; cursor: pointer;",
                onclick: move |_| state.write().session.dismiss_notice(index),
                "×"
            }
        }
    }
}
