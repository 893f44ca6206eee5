// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip port and content.

use kurbo::Point;

/// An overlay that shows HTML near the pointer.
pub trait Tooltip {
    /// Show `html` at `at` (canvas coordinates), replacing any previous content.
    fn show(&mut self, html: &str, at: Point);
    /// Follow the pointer without changing the content.
    fn move_to(&mut self, at: Point) {
        let _ = at;
    }
    /// Hide the overlay.
    fn hide(&mut self);
}

/// Breadcrumb separator.
pub(crate) const SEPARATOR: &str = " &rarr; ";

/// Tooltip markup: a title block followed by free-form content.
pub(crate) fn html(title: &str, content: &str) -> String {
    format!(r#"<div class="tooltip-title">{title}</div>{content}"#)
}

/// Escape text for inclusion in HTML.
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
