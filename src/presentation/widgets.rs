//! Display-only HTML fragments.

use crate::presentation::view::{Segment, Tab};

pub const LOADER_TEXT: &str = "Processing, this may take a few seconds...";
pub const EMPTY_TAB_TEXT: &str = "No items found for this category.";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn tabs(active: Tab) -> String {
    let buttons: String = Tab::ALL
        .iter()
        .map(|tab| {
            format!(
                r#"<button type="button" class="tab-btn{active}" data-tab="{id}">{label}</button>"#,
                active = if *tab == active { " active" } else { "" },
                id = tab.id(),
                label = tab.label(),
            )
        })
        .collect();
    format!(r#"<div class="tabs" role="tablist">{}</div>"#, buttons)
}

pub fn loader() -> String {
    format!(r#"<div class="loader" role="status">{}</div>"#, LOADER_TEXT)
}

pub fn error_banner(message: &str) -> String {
    format!(
        r#"<div class="error-box" role="alert">Error: {}</div>"#,
        escape_html(message)
    )
}

/// Emphasized runs become `<mark>`; everything is escaped.
pub fn highlighted(segments: &[Segment<'_>]) -> String {
    segments
        .iter()
        .map(|segment| {
            if segment.emphasized {
                format!("<mark>{}</mark>", escape_html(segment.text))
            } else {
                escape_html(segment.text)
            }
        })
        .collect()
}
