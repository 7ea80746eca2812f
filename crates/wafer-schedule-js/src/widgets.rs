//! Admin widget entry points.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wafer_schedule_browser::widgets::{init_markup_previews, populate_timelists};
use wafer_schedule_core::widgets::{
    MarkupPreviewConfig, categorization_result_html, categorization_selection,
};

const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Settings handed to the page's markup editor setup function.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkupSettings<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    preview_parser_path: Option<&'a str>,
}

impl<'a> From<&'a MarkupPreviewConfig> for MarkupSettings<'a> {
    fn from(config: &'a MarkupPreviewConfig) -> Self {
        Self {
            preview_parser_path: config.preview_url.as_deref(),
        }
    }
}

/// Fill the admin time lists and set up markdown previews.
///
/// `timeFormat` is the admin's first `TIME_INPUT_FORMATS` entry. When given,
/// `applyMarkup(textarea, settings)` is called for each markdown textarea
/// that has no editor yet.
#[wasm_bindgen(js_name = initScheduleWidgets)]
pub fn init_schedule_widgets(
    time_format: Option<String>,
    apply_markup: Option<js_sys::Function>,
) -> Result<(), JsValue> {
    let document = gloo_utils::document();
    populate_timelists(
        &document,
        time_format.as_deref().unwrap_or(DEFAULT_TIME_FORMAT),
    )?;

    if let Some(apply) = apply_markup {
        init_markup_previews(&document, |textarea, config| {
            let settings = match serde_wasm_bindgen::to_value(&MarkupSettings::from(config)) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("serializing markup settings failed: {}", e);
                    return;
                }
            };
            if let Err(e) = apply.call2(&JsValue::NULL, textarea, &settings) {
                tracing::warn!(element = %config.element, "markup setup threw: {:?}", e);
            }
        })?;
    }
    Ok(())
}

/// Dropdown markup for a talk categorization option.
#[wasm_bindgen(js_name = formatTalkCategorizationResult)]
pub fn format_talk_categorization_result(text: &str) -> String {
    categorization_result_html(text)
}

/// Selected-value text for a talk categorization option.
#[wasm_bindgen(js_name = formatTalkCategorizationSelection)]
pub fn format_talk_categorization_selection(text: &str) -> String {
    categorization_selection(text).to_owned()
}
