//! WASM browser tests for wafer-schedule-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use wafer_schedule_browser::widgets::{init_markup_previews, populate_timelists};
use wafer_schedule_browser::{
    BrowserDom, DRAG_MIME, EditorConfig, EventPath, MountedEditor, ScheduleDom, event_path, mount,
    resolve_event_path,
};

fn document() -> web_sys::Document {
    gloo_utils::document()
}

/// Fresh container appended to the body, filled with `html`.
fn fixture(html: &str) -> web_sys::Element {
    let doc = document();
    let root = doc.create_element("div").unwrap();
    root.set_inner_html(html);
    doc.body().unwrap().append_child(&root).unwrap();
    root
}

fn dom() -> BrowserDom {
    BrowserDom::new(document(), 50)
}

// === BrowserDom ===

#[wasm_bindgen_test]
fn test_label_skips_close_control() {
    let root = fixture(
        r#"<div class="droppable" data-venue="1" data-slot="2">Intro<button class="close">x</button></div>"#,
    );
    let cell = root.first_element_child().unwrap();
    let dom = dom();

    assert_eq!(dom.label(&cell), "Intro");

    dom.set_label(&cell, "Lunch");
    assert_eq!(dom.label(&cell), "Lunch");
    assert!(dom.close_control(&cell).is_some());

    dom.set_label(&cell, "");
    assert_eq!(dom.label(&cell), "");
    assert_eq!(cell.child_element_count(), 1);
    root.remove();
}

#[wasm_bindgen_test]
fn test_create_close_control() {
    let root = fixture(r#"<div class="droppable"></div>"#);
    let cell = root.first_element_child().unwrap();
    let dom = dom();

    assert!(dom.close_control(&cell).is_none());
    let close = dom.create_close_control(&cell).unwrap();
    assert!(dom.has_class(&close, "close"));
    assert_eq!(dom.close_control(&cell), Some(close));
    root.remove();
}

#[wasm_bindgen_test]
fn test_close_control_is_direct_child_only() {
    let root = fixture(r#"<div class="droppable"><span><i class="close"></i></span></div>"#);
    let cell = root.first_element_child().unwrap();

    assert!(dom().close_control(&cell).is_none());
    root.remove();
}

#[wasm_bindgen_test]
fn test_opacity_round_trip() {
    let root = fixture(r#"<div id="talk-1" class="draggable"></div>"#);
    let chip = root.first_element_child().unwrap();
    let dom = dom();

    dom.set_opacity(&chip, Some("0.4"));
    let style = chip.dyn_ref::<web_sys::HtmlElement>().unwrap().style();
    assert_eq!(style.get_property_value("opacity").unwrap(), "0.4");

    dom.set_opacity(&chip, None);
    assert_eq!(style.get_property_value("opacity").unwrap(), "");
    root.remove();
}

#[wasm_bindgen_test]
fn test_notify_appends_notice() {
    let dom = dom();
    dom.notify("Could not save the schedule");

    // Editors mounted by other tests may have posted notices of their own.
    let notices = document().query_selector_all(".schedule-notice").unwrap();
    let notice = (0..notices.length())
        .filter_map(|i| notices.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .find(|e| e.text_content().as_deref() == Some("Could not save the schedule"))
        .unwrap();
    notice.remove();
}

// === Event paths ===

#[wasm_bindgen_test]
fn test_event_path_during_dispatch() {
    let root = fixture(
        r#"<div class="droppable"><button class="close"><i id="close-icon"></i></button></div>"#,
    );
    let icon = document().get_element_by_id("close-icon").unwrap();
    let seen: Rc<RefCell<Option<EventPath<web_sys::Element>>>> = Rc::default();

    let listener = {
        let seen = seen.clone();
        EventListener::new(&root, "click", move |event| {
            *seen.borrow_mut() = Some(event_path(event));
        })
    };
    let init = web_sys::EventInit::new();
    init.set_bubbles(true);
    let event = web_sys::Event::new_with_event_init_dict("click", &init).unwrap();
    icon.dispatch_event(&event).unwrap();
    drop(listener);

    let path = seen.borrow_mut().take().unwrap();
    let chain = resolve_event_path(&dom(), path);
    assert_eq!(chain.first(), Some(&icon));
    assert!(chain.iter().any(|e| e.class_list().contains("close")));
    assert!(chain.iter().any(|e| e.class_list().contains("droppable")));
    root.remove();
}

#[wasm_bindgen_test]
fn test_event_path_after_dispatch_falls_back_to_target() {
    let root = fixture(r#"<div class="droppable"><button class="close"></button></div>"#);
    let close = root.query_selector(".close").unwrap().unwrap();
    let event = web_sys::Event::new("click").unwrap();
    close.dispatch_event(&event).unwrap();

    // composedPath() is empty once dispatch has finished.
    let chain = resolve_event_path(&dom(), event_path(&event));
    assert!(chain.is_empty() || chain.first() == Some(&close));
    root.remove();
}

// === Mounted editor ===

/// Grid fixture with one chip and one empty cell, and an editor on it.
///
/// Requests go to an address nothing listens on, so they fail after the
/// optimistic changes under test are already visible.
fn mounted(grid_id: &str, chip_id: &str, cell_html: &str) -> (web_sys::Element, MountedEditor) {
    let root = fixture(&format!(
        r#"<div id="{grid_id}">
            <div id="{chip_id}" class="draggable" draggable="true" data-type="talk"
                 data-talk-id="7" title="Intro to X">Intro to X</div>
            {cell_html}
        </div>"#
    ));
    let editor = mount(EditorConfig {
        grid_selector: format!("#{grid_id}"),
        base_url: Some("http://127.0.0.1:9".to_string()),
        ..Default::default()
    })
    .unwrap();
    (root, editor)
}

fn drag_event(
    kind: &str,
    payload: Option<&str>,
    related: Option<&web_sys::Element>,
) -> web_sys::DragEvent {
    let init = web_sys::DragEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    if let Some(payload) = payload {
        let transfer = web_sys::DataTransfer::new().unwrap();
        transfer.set_data(DRAG_MIME, payload).unwrap();
        init.set_data_transfer(Some(&transfer));
    }
    init.set_related_target(related.map(|e| e.unchecked_ref::<web_sys::EventTarget>()));
    web_sys::DragEvent::new_with_event_init_dict(kind, &init).unwrap()
}

fn cell_in(root: &web_sys::Element) -> web_sys::Element {
    root.query_selector(".droppable").unwrap().unwrap()
}

#[wasm_bindgen_test]
fn test_dragover_on_cell_is_canceled() {
    let (root, editor) = mounted(
        "grid-dragover",
        "talk-dragover",
        r#"<div class="droppable" data-venue="1" data-slot="2"></div>"#,
    );
    let cell = cell_in(&root);

    let event = drag_event("dragover", None, None);
    cell.dispatch_event(&event).unwrap();
    assert!(event.default_prevented());

    // Off the cells the browser keeps its default.
    let chip = document().get_element_by_id("talk-dragover").unwrap();
    let event = drag_event("dragover", None, None);
    chip.dispatch_event(&event).unwrap();
    assert!(!event.default_prevented());

    drop(editor);
    root.remove();
}

#[wasm_bindgen_test]
fn test_hover_class_follows_pointer() {
    let (root, editor) = mounted(
        "grid-hover",
        "talk-hover",
        r#"<div class="droppable" data-venue="1" data-slot="2"><i class="icon"></i></div>"#,
    );
    let cell = cell_in(&root);
    let icon = cell.query_selector(".icon").unwrap().unwrap();

    cell.dispatch_event(&drag_event("dragenter", None, None)).unwrap();
    assert!(cell.class_list().contains("over"));

    // Onto a child: the pointer is still over the cell.
    cell.dispatch_event(&drag_event("dragleave", None, Some(&icon))).unwrap();
    assert!(cell.class_list().contains("over"));

    // Back from the child onto the cell itself.
    icon.dispatch_event(&drag_event("dragleave", None, Some(&cell))).unwrap();
    assert!(cell.class_list().contains("over"));

    cell.dispatch_event(&drag_event("dragleave", None, Some(&root))).unwrap();
    assert!(!cell.class_list().contains("over"));

    drop(editor);
    root.remove();
}

#[wasm_bindgen_test]
fn test_drop_shows_chip_before_response() {
    let (root, editor) = mounted(
        "grid-drop",
        "talk-drop",
        r#"<div class="droppable" data-venue="1" data-slot="2"></div>"#,
    );
    let cell = cell_in(&root);

    let event = drag_event("drop", Some("talk-drop"), None);
    cell.dispatch_event(&event).unwrap();

    assert!(event.default_prevented());
    assert_eq!(cell.text_content().as_deref(), Some("Intro to X"));
    assert_eq!(cell.get_attribute("data-type").as_deref(), Some("talk"));

    drop(editor);
    root.remove();
}

#[wasm_bindgen_test]
fn test_drop_of_unknown_chip_leaves_cell_alone() {
    let (root, editor) = mounted(
        "grid-unknown",
        "talk-unknown",
        r#"<div class="droppable" data-venue="1" data-slot="2"></div>"#,
    );
    let cell = cell_in(&root);

    let event = drag_event("drop", Some("no-such-chip"), None);
    cell.dispatch_event(&event).unwrap();

    assert!(event.default_prevented());
    assert_eq!(cell.text_content().as_deref(), Some(""));
    assert_eq!(cell.get_attribute("data-type"), None);

    drop(editor);
    root.remove();
}

#[wasm_bindgen_test]
fn test_close_click_clears_cell() {
    let (root, editor) = mounted(
        "grid-close",
        "talk-close",
        r#"<div id="scheduleItem55" class="droppable success" data-venue="1" data-slot="2"
                data-schedule-item-id="55" data-type="talk">Intro to X<button class="close" data-id="55"><i></i></button></div>"#,
    );
    let cell = cell_in(&root);
    let icon = cell.query_selector(".close i").unwrap().unwrap();

    let init = web_sys::MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = web_sys::MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();
    icon.dispatch_event(&event).unwrap();

    assert!(event.default_prevented());
    assert_eq!(cell.id(), "");
    assert_eq!(cell.get_attribute("data-schedule-item-id"), None);
    let close = cell.query_selector(".close").unwrap().unwrap();
    assert!(close.class_list().contains("hide"));
    assert_eq!(close.get_attribute("data-id"), None);

    drop(editor);
    root.remove();
}

#[wasm_bindgen_test]
fn test_mount_without_grid_fails() {
    let result = mount(EditorConfig {
        grid_selector: "#no-such-grid".to_string(),
        base_url: Some("http://127.0.0.1:9".to_string()),
        ..Default::default()
    });
    assert!(result.is_err());
}

// === Widgets ===

#[wasm_bindgen_test]
fn test_populate_timelists() {
    let root = fixture(r#"<ul class="timelist"><li>stale</li></ul><ul class="timelist"></ul>"#);

    let count = populate_timelists(&document(), "%H:%M").unwrap();
    assert!(count >= 2);

    let lists = root.query_selector_all(".timelist").unwrap();
    let second = lists.item(1).unwrap().dyn_into::<web_sys::Element>().unwrap();
    let links = second.query_selector_all("a").unwrap();
    assert_eq!(links.length(), 12);
    let first = links.item(0).unwrap().dyn_into::<web_sys::Element>().unwrap();
    assert_eq!(first.text_content().as_deref(), Some("08:00"));
    assert!(
        first
            .get_attribute("href")
            .unwrap()
            .ends_with(", 8);")
    );
    root.remove();
}

#[wasm_bindgen_test]
fn test_markup_previews_skip_existing_editors() {
    let root = fixture(
        r##"<textarea id="fresh"></textarea>
        <textarea id="done" class="markItUpEditor"></textarea>
        <div class="django-markitup-config" data-element="#fresh" data-preview-url="/preview/"></div>
        <div class="django-markitup-config" data-element="#done"></div>"##,
    );
    let mut applied = Vec::new();

    init_markup_previews(&document(), |textarea, config| {
        applied.push((textarea.id(), config.preview_url.clone()));
    })
    .unwrap();

    assert_eq!(applied, vec![("fresh".to_string(), Some("/preview/".to_string()))]);
    root.remove();
}
