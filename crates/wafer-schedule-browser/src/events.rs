//! Browser event handling for the schedule grid.
//!
//! Listeners are delegated from the grid root so cells bound after mount
//! are handled like the server-rendered ones.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use wafer_schedule_core::model::class;
use wafer_schedule_core::{DRAG_MIME, EditorConfig, EventPath, ScheduleEditor};

use crate::dom::BrowserDom;
use crate::http::HttpScheduleApi;

/// The editor as wired into a page.
pub type BrowserEditor = ScheduleEditor<BrowserDom, Rc<HttpScheduleApi>>;

// === Event path extraction ===

fn elements(array: &js_sys::Array) -> Vec<web_sys::Element> {
    array
        .iter()
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .collect()
}

/// The propagation path of `event`, in whatever form the runtime offers.
///
/// Prefers the legacy `event.path` array, then `composedPath()`, then the
/// bare target. Non-element entries (document, window) are dropped.
pub fn event_path(event: &web_sys::Event) -> EventPath<web_sys::Element> {
    if let Ok(path) = js_sys::Reflect::get(event, &JsValue::from_str("path")) {
        if let Some(array) = path.dyn_ref::<js_sys::Array>() {
            return EventPath::Path(elements(array));
        }
    }

    if let Ok(composed) = js_sys::Reflect::get(event, &JsValue::from_str("composedPath")) {
        if let Some(function) = composed.dyn_ref::<js_sys::Function>() {
            if let Ok(result) = function.call0(event) {
                if let Some(array) = result.dyn_ref::<js_sys::Array>() {
                    return EventPath::Composed(elements(array));
                }
            }
        }
    }

    let target = event.target().and_then(|target| {
        match target.dyn_into::<web_sys::Element>() {
            Ok(element) => Some(element),
            // Text nodes report themselves as the target in some engines.
            Err(target) => target
                .dyn_into::<web_sys::Node>()
                .ok()
                .and_then(|node| node.parent_element()),
        }
    });
    match target {
        Some(target) => EventPath::Target(target),
        None => EventPath::Path(Vec::new()),
    }
}

fn closest(event: &web_sys::Event, class_name: &str) -> Option<web_sys::Element> {
    let selector = format!(".{class_name}");
    let target = event.target()?;
    let element = match target.dyn_into::<web_sys::Element>() {
        Ok(element) => element,
        Err(target) => target.dyn_into::<web_sys::Node>().ok()?.parent_element()?,
    };
    element.closest(&selector).ok().flatten()
}

/// Whether the element the pointer moved to is `cell` or inside it.
fn pointer_stays_in(event: &web_sys::Event, cell: &web_sys::Element) -> bool {
    event
        .dyn_ref::<web_sys::MouseEvent>()
        .and_then(|event| event.related_target())
        .and_then(|target| target.dyn_into::<web_sys::Node>().ok())
        .is_some_and(|node| cell.contains(Some(&node)))
}

fn data_transfer(event: &web_sys::Event) -> Option<web_sys::DataTransfer> {
    event.dyn_ref::<web_sys::DragEvent>()?.data_transfer()
}

// === Mounting ===

/// A mounted editor. Dropping it detaches every listener.
pub struct MountedEditor {
    editor: Rc<BrowserEditor>,
    _listeners: Vec<EventListener>,
}

impl MountedEditor {
    pub fn editor(&self) -> &Rc<BrowserEditor> {
        &self.editor
    }
}

/// Wire the drag/drop and delete handlers onto the page.
pub fn mount(config: EditorConfig) -> Result<MountedEditor, JsValue> {
    let document = gloo_utils::document();
    let root = document
        .query_selector(&config.grid_selector)?
        .ok_or_else(|| JsValue::from_str(&format!("no element matches {:?}", config.grid_selector)))?;

    let api = Rc::new(HttpScheduleApi::from_page(config.clone(), &document)?);
    let dom = BrowserDom::new(document, config.notice_ms);
    let editor = Rc::new(ScheduleEditor::new(dom, api));

    let listeners = vec![
        on_drag_start(&root, editor.clone()),
        on_drag_end(&root, editor.clone()),
        on_drag_over(&root, editor.clone()),
        on_drag_enter(&root, editor.clone()),
        on_drag_leave(&root, editor.clone()),
        on_drop(&root, editor.clone()),
        on_click(&root, editor.clone()),
    ];

    tracing::info!(root = %config.grid_selector, api = %config.api_root, "schedule editor mounted");
    Ok(MountedEditor {
        editor,
        _listeners: listeners,
    })
}

fn on_drag_start(root: &web_sys::Element, editor: Rc<BrowserEditor>) -> EventListener {
    EventListener::new(root, "dragstart", move |event| {
        let Some(chip) = closest(event, class::DRAGGABLE) else {
            return;
        };
        let Some(start) = editor.drag_start(&chip) else {
            return;
        };
        if let Some(transfer) = data_transfer(event) {
            transfer.set_effect_allowed(start.effect.as_str());
            if let Err(e) = transfer.set_data(DRAG_MIME, &start.payload) {
                tracing::warn!("setting drag payload failed: {:?}", e);
            }
        }
    })
}

fn on_drag_end(root: &web_sys::Element, editor: Rc<BrowserEditor>) -> EventListener {
    EventListener::new(root, "dragend", move |event| {
        if let Some(chip) = closest(event, class::DRAGGABLE) {
            editor.drag_end(&chip);
        }
    })
}

fn on_drag_over(root: &web_sys::Element, editor: Rc<BrowserEditor>) -> EventListener {
    let options = EventListenerOptions::enable_prevent_default();
    EventListener::new_with_options(root, "dragover", options, move |event| {
        if closest(event, class::DROPPABLE).is_none() {
            return;
        }
        // Without this the browser never fires `drop`.
        event.prevent_default();
        if let Some(transfer) = data_transfer(event) {
            transfer.set_drop_effect(editor.drag_over().as_str());
        }
    })
}

fn on_drag_enter(root: &web_sys::Element, editor: Rc<BrowserEditor>) -> EventListener {
    EventListener::new(root, "dragenter", move |event| {
        if let Some(cell) = closest(event, class::DROPPABLE) {
            editor.drag_enter(&cell);
        }
    })
}

fn on_drag_leave(root: &web_sys::Element, editor: Rc<BrowserEditor>) -> EventListener {
    EventListener::new(root, "dragleave", move |event| {
        let Some(cell) = closest(event, class::DROPPABLE) else {
            return;
        };
        // Moving onto a child of the cell fires `dragleave` on the cell.
        if pointer_stays_in(event, &cell) {
            return;
        }
        editor.drag_leave(&cell);
    })
}

fn on_drop(root: &web_sys::Element, editor: Rc<BrowserEditor>) -> EventListener {
    let options = EventListenerOptions::enable_prevent_default();
    EventListener::new_with_options(root, "drop", options, move |event| {
        let Some(cell) = closest(event, class::DROPPABLE) else {
            return;
        };
        event.prevent_default();
        event.stop_propagation();

        let payload = data_transfer(event)
            .and_then(|transfer| transfer.get_data(DRAG_MIME).ok())
            .unwrap_or_default();
        let pending = match (*editor).drop(&cell, &payload) {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(error = %e, payload, "drop ignored");
                return;
            }
        };

        let editor = editor.clone();
        spawn_local(async move {
            // Failures are already logged and reported on the page.
            let _ = editor.persist(pending).await;
        });
    })
}

fn on_click(root: &web_sys::Element, editor: Rc<BrowserEditor>) -> EventListener {
    let options = EventListenerOptions::enable_prevent_default();
    EventListener::new_with_options(root, "click", options, move |event| {
        if closest(event, class::CLOSE).is_none() {
            return;
        }
        event.prevent_default();

        let pending = match editor.delete(event_path(event)) {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(error = %e, "delete ignored");
                return;
            }
        };

        let editor = editor.clone();
        spawn_local(async move {
            let _ = editor.persist_deletion(pending).await;
        });
    })
}
