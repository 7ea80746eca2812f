//! `ScheduleDom` over the live page.

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wafer_schedule_core::ScheduleDom;
use wafer_schedule_core::model::class;

const CLOSE_SELECTOR: &str = ":scope > .close";
const CLOSE_GLYPH: &str = "\u{00d7}";

/// Browser DOM access for the editor.
///
/// Holds the document for id lookups and element creation.
#[derive(Clone)]
pub struct BrowserDom {
    document: web_sys::Document,
    notice_ms: u32,
}

impl BrowserDom {
    pub fn new(document: web_sys::Document, notice_ms: u32) -> Self {
        Self {
            document,
            notice_ms,
        }
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }
}

fn is_close_control(node: &web_sys::Node) -> bool {
    node.dyn_ref::<web_sys::Element>()
        .is_some_and(|e| e.class_list().contains(class::CLOSE))
}

impl ScheduleDom for BrowserDom {
    type Element = web_sys::Element;

    fn element_by_id(&self, id: &str) -> Option<web_sys::Element> {
        self.document.get_element_by_id(id)
    }

    fn attribute(&self, element: &web_sys::Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&self, element: &web_sys::Element, name: &str, value: &str) {
        if let Err(e) = element.set_attribute(name, value) {
            tracing::warn!(name, value, "set_attribute failed: {:?}", e);
        }
    }

    fn remove_attribute(&self, element: &web_sys::Element, name: &str) {
        if let Err(e) = element.remove_attribute(name) {
            tracing::warn!(name, "remove_attribute failed: {:?}", e);
        }
    }

    fn has_class(&self, element: &web_sys::Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn add_class(&self, element: &web_sys::Element, class: &str) {
        let _ = element.class_list().add_1(class);
    }

    fn remove_class(&self, element: &web_sys::Element, class: &str) {
        let _ = element.class_list().remove_1(class);
    }

    fn label(&self, element: &web_sys::Element) -> String {
        let children = element.child_nodes();
        let mut text = String::new();
        for i in 0..children.length() {
            let Some(child) = children.item(i) else {
                continue;
            };
            if is_close_control(&child) {
                continue;
            }
            if let Some(content) = child.text_content() {
                text.push_str(&content);
            }
        }
        text
    }

    fn set_label(&self, element: &web_sys::Element, text: &str) {
        // Collect first: child_nodes() is live.
        let children = element.child_nodes();
        let stale: Vec<web_sys::Node> = (0..children.length())
            .filter_map(|i| children.item(i))
            .filter(|child| !is_close_control(child))
            .collect();
        for child in stale {
            let _ = element.remove_child(&child);
        }

        if text.is_empty() {
            return;
        }
        let label = self.document.create_text_node(text);
        let first = element.first_child();
        if let Err(e) = element.insert_before(&label, first.as_ref()) {
            tracing::warn!("inserting cell label failed: {:?}", e);
        }
    }

    fn set_opacity(&self, element: &web_sys::Element, opacity: Option<&str>) {
        let Some(html) = element.dyn_ref::<web_sys::HtmlElement>() else {
            return;
        };
        let style = html.style();
        let result = match opacity {
            Some(value) => style.set_property("opacity", value),
            None => style.remove_property("opacity").map(|_| ()),
        };
        if let Err(e) = result {
            tracing::debug!("opacity update failed: {:?}", e);
        }
    }

    fn parent(&self, element: &web_sys::Element) -> Option<web_sys::Element> {
        element.parent_element()
    }

    fn close_control(&self, cell: &web_sys::Element) -> Option<web_sys::Element> {
        cell.query_selector(CLOSE_SELECTOR).ok().flatten()
    }

    fn create_close_control(&self, cell: &web_sys::Element) -> Option<web_sys::Element> {
        let button = self
            .document
            .create_element("button")
            .map_err(|e| tracing::warn!("creating close control failed: {:?}", e))
            .ok()?;
        let _ = button.set_attribute("type", "button");
        let _ = button.set_attribute("aria-label", "Remove from schedule");
        let _ = button.class_list().add_1(class::CLOSE);
        button.set_text_content(Some(CLOSE_GLYPH));
        cell.append_child(&button).ok()?;
        Some(button)
    }

    fn notify(&self, message: &str) {
        let Some(body) = self.document.body() else {
            tracing::warn!(message, "no body to show notice in");
            return;
        };
        let Ok(notice) = self.document.create_element("div") else {
            return;
        };
        let _ = notice.set_attribute("class", "alert alert-danger schedule-notice");
        let _ = notice.set_attribute("role", "alert");
        notice.set_text_content(Some(message));
        if body.append_child(&notice).is_err() {
            return;
        }
        Timeout::new(self.notice_ms, move || notice.remove()).forget();
    }
}
