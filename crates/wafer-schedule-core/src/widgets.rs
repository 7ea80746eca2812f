//! Admin widget helpers: markdown preview settings, the time shortcut list
//! and talk categorization labels.

use chrono::NaiveTime;
use chrono::format::{Item, StrftimeItems};

/// First and last hour offered in the admin time shortcut list.
pub const TIMELIST_HOURS: std::ops::Range<u32> = 8..20;

const FALLBACK_TIME_FORMAT: &str = "%H:%M";

/// Markdown editor settings read from a `.django-markitup-config` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupPreviewConfig {
    /// Selector of the textarea to enhance.
    pub element: String,
    /// Server endpoint rendering the preview, if the default is overridden.
    pub preview_url: Option<String>,
    /// Open the preview as soon as the editor is set up.
    pub auto_preview: bool,
}

impl MarkupPreviewConfig {
    /// Build from the raw `data-element`, `data-preview-url` and
    /// `data-auto-preview` attribute values.
    pub fn from_attributes(
        element: Option<String>,
        preview_url: Option<String>,
        auto_preview: Option<String>,
    ) -> Option<Self> {
        let element = element.filter(|e| !e.is_empty())?;
        Some(Self {
            element,
            preview_url: preview_url.filter(|u| !u.is_empty()),
            auto_preview: auto_preview.as_deref() == Some("1"),
        })
    }
}

/// One entry of the admin clock shortcut list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeQuicklink {
    pub hour: u32,
    pub label: String,
    pub href: String,
}

/// Shortcut links for the `index`th clock widget on the page.
///
/// `format` is the admin's first `TIME_INPUT_FORMATS` entry in strftime
/// syntax; an unparsable format falls back to `%H:%M`.
pub fn time_quicklinks(index: usize, format: &str) -> Vec<TimeQuicklink> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    let items = if items.iter().any(|i| matches!(i, Item::Error)) {
        tracing::warn!(format, "unusable time format, falling back to {FALLBACK_TIME_FORMAT}");
        StrftimeItems::new(FALLBACK_TIME_FORMAT).collect()
    } else {
        items
    };

    TIMELIST_HOURS
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0).map(|t| (hour, t)))
        .map(|(hour, time)| TimeQuicklink {
            hour,
            label: time.format_with_items(items.iter()).to_string(),
            href: format!("javascript:DateTimeShortcuts.handleClockQuicklink({index}, {hour});"),
        })
        .collect()
}

/// Split a categorization option `"Name: description"` into its parts.
pub fn split_categorization(text: &str) -> (&str, Option<&str>) {
    match text.split_once(':') {
        Some((name, description)) => (name, Some(description.trim_start())),
        None => (text, None),
    }
}

/// Dropdown rendering of a categorization option.
pub fn categorization_result_html(text: &str) -> String {
    let (name, description) = split_categorization(text);
    format!(
        "<div><div><strong>{}</strong></div>{}</div>",
        escape_html(name),
        escape_html(description.unwrap_or_default())
    )
}

/// Selected-value rendering of a categorization option.
pub fn categorization_selection(text: &str) -> &str {
    split_categorization(text).0
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
