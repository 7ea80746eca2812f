//! Drag session: marks the source chip and names it in the drag payload.

use crate::dom::ScheduleDom;
use crate::editor::ScheduleEditor;
use crate::model::class;
use crate::sync::ScheduleApi;

/// MIME type of the drag payload.
pub const DRAG_MIME: &str = "text/plain";

/// Opacity applied to a chip while it is being dragged.
pub const DRAGGING_OPACITY: &str = "0.4";

/// Drag feedback shown by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Move,
}

impl DropEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            DropEffect::Move => "move",
        }
    }
}

/// What the platform layer writes into the drag data channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragStart {
    pub payload: String,
    pub effect: DropEffect,
}

impl<D: ScheduleDom, A: ScheduleApi> ScheduleEditor<D, A> {
    /// Begin dragging `chip`.
    ///
    /// Returns `None` for elements without an id, which cannot be found
    /// again on drop.
    pub fn drag_start(&self, chip: &D::Element) -> Option<DragStart> {
        let dom = self.dom();
        let Some(id) = dom.element_id(chip) else {
            tracing::warn!(?chip, "drag started on an element without an id");
            return None;
        };
        dom.set_opacity(chip, Some(DRAGGING_OPACITY));
        dom.add_class(chip, class::DRAGGING);
        tracing::debug!(chip = %id, "drag start");
        Some(DragStart {
            payload: id,
            effect: DropEffect::Move,
        })
    }

    /// End a drag, whatever became of it.
    pub fn drag_end(&self, chip: &D::Element) {
        let dom = self.dom();
        dom.set_opacity(chip, None);
        dom.remove_class(chip, class::DRAGGING);
    }
}
