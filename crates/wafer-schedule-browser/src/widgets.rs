//! DOM glue for the admin widgets.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wafer_schedule_core::widgets::{MarkupPreviewConfig, time_quicklinks};

const MARKUP_CONFIG_SELECTOR: &str = ".django-markitup-config";
const MARKUP_EDITOR_CLASS: &str = "markItUpEditor";
const PREVIEW_LINK_SELECTOR: &str = "a[title=\"Preview\"]";

fn each_element(
    document: &web_sys::Document,
    selector: &str,
) -> Result<Vec<web_sys::Element>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .collect())
}

/// Set up markdown preview for every `.django-markitup-config` element.
///
/// `apply` receives the textarea and its settings and does the actual
/// editor setup; textareas that already carry an editor are skipped.
/// Returns how many configs were found.
pub fn init_markup_previews(
    document: &web_sys::Document,
    mut apply: impl FnMut(&web_sys::Element, &MarkupPreviewConfig),
) -> Result<usize, JsValue> {
    let configs = each_element(document, MARKUP_CONFIG_SELECTOR)?;
    for node in &configs {
        let Some(config) = MarkupPreviewConfig::from_attributes(
            node.get_attribute("data-element"),
            node.get_attribute("data-preview-url"),
            node.get_attribute("data-auto-preview"),
        ) else {
            tracing::warn!("markitup config without a data-element");
            continue;
        };

        match document.query_selector(&config.element)? {
            Some(textarea) if !textarea.class_list().contains(MARKUP_EDITOR_CLASS) => {
                apply(&textarea, &config);
            }
            Some(_) => tracing::debug!(element = %config.element, "editor already set up"),
            None => tracing::warn!(element = %config.element, "markitup target not found"),
        }

        if config.auto_preview {
            trigger_preview(document)?;
        }
    }
    Ok(configs.len())
}

fn trigger_preview(document: &web_sys::Document) -> Result<(), JsValue> {
    let init = web_sys::MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    for link in each_element(document, PREVIEW_LINK_SELECTOR)? {
        let event = web_sys::MouseEvent::new_with_mouse_event_init_dict("mouseup", &init)?;
        link.dispatch_event(&event)?;
    }
    Ok(())
}

/// Replace the contents of every `.timelist` with hourly quick links.
///
/// Returns how many lists were filled.
pub fn populate_timelists(document: &web_sys::Document, format: &str) -> Result<usize, JsValue> {
    let lists = each_element(document, ".timelist")?;
    for (index, list) in lists.iter().enumerate() {
        list.set_inner_html("");
        for link in time_quicklinks(index, format) {
            let item = document.create_element("li")?;
            let anchor = document.create_element("a")?;
            anchor.set_attribute("href", &link.href)?;
            anchor.set_text_content(Some(&link.label));
            item.append_child(&anchor)?;
            list.append_child(&item)?;
        }
    }
    tracing::debug!(count = lists.len(), format, "time lists populated");
    Ok(lists.len())
}
