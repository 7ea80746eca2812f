//! DOM abstraction and typed accessors for chips and cells.
//!
//! The page markup is the only state the editor has. Every handler re-reads
//! it through `ScheduleDom`, and the `Chip`/`Cell` wrappers below are the one
//! place where the attribute contract (kind names, id format, exactly one
//! foreign key) is checked.

use std::fmt;

use crate::error::EditorError;
use crate::model::{CellKey, ChipKind, ItemRef, ScheduleItemId, attr, class};

/// Element access needed by the editor.
///
/// The browser implementation wraps `web_sys::Element`; tests use an
/// in-memory tree. All methods take `&self` because DOM mutation goes
/// through shared handles.
pub trait ScheduleDom {
    /// Handle to an element. Cloning must yield a handle to the same node.
    type Element: Clone + PartialEq + fmt::Debug;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;
    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);
    fn remove_attribute(&self, element: &Self::Element, name: &str);

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;
    fn add_class(&self, element: &Self::Element, class: &str);
    fn remove_class(&self, element: &Self::Element, class: &str);

    /// Visible text of a cell, excluding its close control.
    fn label(&self, element: &Self::Element) -> String;
    /// Replace a cell's visible text, keeping its close control.
    fn set_label(&self, element: &Self::Element, text: &str);

    /// Inline `opacity` style; `None` removes it.
    fn set_opacity(&self, element: &Self::Element, opacity: Option<&str>);

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// The close control inside a cell, if the markup has one.
    fn close_control(&self, cell: &Self::Element) -> Option<Self::Element>;
    /// Build and attach a close control to a cell that lacks one.
    fn create_close_control(&self, cell: &Self::Element) -> Option<Self::Element>;

    /// Show a transient message to the user.
    fn notify(&self, message: &str);

    /// Non-empty attribute value.
    fn non_empty_attribute(&self, element: &Self::Element, name: &str) -> Option<String> {
        self.attribute(element, name).filter(|v| !v.is_empty())
    }

    fn element_id(&self, element: &Self::Element) -> Option<String> {
        self.non_empty_attribute(element, attr::ID)
    }

    fn set_element_id(&self, element: &Self::Element, id: Option<&str>) {
        match id {
            Some(id) => self.set_attribute(element, attr::ID, id),
            None => self.remove_attribute(element, attr::ID),
        }
    }

    fn toggle_class(&self, element: &Self::Element, class: &str, on: bool) {
        if on {
            self.add_class(element, class);
        } else {
            self.remove_class(element, class);
        }
    }
}

fn describe<D: ScheduleDom>(dom: &D, element: &D::Element) -> String {
    dom.element_id(element)
        .map(|id| format!("#{id}"))
        .unwrap_or_else(|| "element".to_string())
}

fn required<D: ScheduleDom>(
    dom: &D,
    element: &D::Element,
    attribute: &'static str,
) -> Result<String, EditorError> {
    dom.non_empty_attribute(element, attribute)
        .ok_or_else(|| EditorError::MissingAttribute {
            element: describe(dom, element),
            attribute,
        })
}

/// A draggable talk or page, validated once when read.
#[derive(Debug, Clone, PartialEq)]
pub struct Chip<E> {
    pub element: E,
    pub id: String,
    pub kind: ChipKind,
    pub key: String,
    pub title: String,
}

impl<E: Clone + PartialEq + fmt::Debug> Chip<E> {
    /// Look up the chip named by a drag payload.
    pub fn by_id<D>(dom: &D, id: &str) -> Result<Self, EditorError>
    where
        D: ScheduleDom<Element = E>,
    {
        let element = dom
            .element_by_id(id)
            .ok_or_else(|| EditorError::MissingChip(id.to_string()))?;
        Self::from_element(dom, element)
    }

    pub fn from_element<D>(dom: &D, element: E) -> Result<Self, EditorError>
    where
        D: ScheduleDom<Element = E>,
    {
        let id = required(dom, &element, attr::ID)?;
        let kind: ChipKind = required(dom, &element, attr::TYPE)?.parse()?;
        let key = required(dom, &element, kind.key_attribute())?;
        let title = dom.attribute(&element, attr::TITLE).unwrap_or_default();
        Ok(Self {
            element,
            id,
            kind,
            key,
            title,
        })
    }

    pub fn item_ref(&self) -> ItemRef {
        ItemRef::new(self.kind, self.key.clone())
    }
}

/// A droppable (venue, slot) grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<E> {
    pub element: E,
    pub key: CellKey,
}

impl<E: Clone + PartialEq + fmt::Debug> Cell<E> {
    /// Resolve the cell containing `target` (the target itself or an ancestor).
    pub fn containing<D>(dom: &D, target: &E) -> Result<Self, EditorError>
    where
        D: ScheduleDom<Element = E>,
    {
        let mut current = Some(target.clone());
        while let Some(element) = current {
            if dom.has_class(&element, class::DROPPABLE) {
                return Self::from_element(dom, element);
            }
            current = dom.parent(&element);
        }
        Err(EditorError::NotACell)
    }

    pub fn from_element<D>(dom: &D, element: E) -> Result<Self, EditorError>
    where
        D: ScheduleDom<Element = E>,
    {
        let venue = required(dom, &element, attr::VENUE)?;
        let slot = required(dom, &element, attr::SLOT)?;
        Ok(Self {
            element,
            key: CellKey::new(venue, slot),
        })
    }

    pub fn venue(&self) -> &str {
        &self.key.venue
    }

    pub fn slot(&self) -> &str {
        &self.key.slot
    }

    /// Server record this cell is bound to, if any.
    ///
    /// Reads the canonical attribute, then the legacy spelling, then the
    /// element id.
    pub fn schedule_item_id<D>(&self, dom: &D) -> Result<Option<ScheduleItemId>, EditorError>
    where
        D: ScheduleDom<Element = E>,
    {
        for name in [attr::SCHEDULE_ITEM_ID, attr::LEGACY_SCHEDULE_ITEM_ID] {
            if let Some(value) = dom.non_empty_attribute(&self.element, name) {
                return ScheduleItemId::from_attribute(&value);
            }
        }
        match dom.element_id(&self.element) {
            Some(id) => ScheduleItemId::from_element_id(&id).or(Ok(None)),
            None => Ok(None),
        }
    }

    /// Show `chip` in this cell before the server has confirmed it.
    pub(crate) fn show_placement<D>(
        &self,
        dom: &D,
        chip: &Chip<E>,
        prior: Option<ScheduleItemId>,
    ) where
        D: ScheduleDom<Element = E>,
    {
        dom.set_label(&self.element, &chip.title);
        self.set_kind(dom, Some(chip.kind));
        match prior {
            Some(id) => {
                dom.set_element_id(&self.element, Some(&id.element_id()));
                dom.set_attribute(&self.element, attr::SCHEDULE_ITEM_ID, &id.to_string());
            }
            None => {
                dom.set_element_id(&self.element, None);
                dom.remove_attribute(&self.element, attr::SCHEDULE_ITEM_ID);
            }
        }
    }

    /// Bind this cell to a confirmed server record.
    pub(crate) fn bind<D>(&self, dom: &D, id: ScheduleItemId, kind: ChipKind)
    where
        D: ScheduleDom<Element = E>,
    {
        dom.set_element_id(&self.element, Some(&id.element_id()));
        dom.set_attribute(&self.element, attr::SCHEDULE_ITEM_ID, &id.to_string());
        dom.remove_attribute(&self.element, attr::LEGACY_SCHEDULE_ITEM_ID);
        self.set_kind(dom, Some(kind));

        let close = dom
            .close_control(&self.element)
            .or_else(|| dom.create_close_control(&self.element));
        match close {
            Some(close) => {
                dom.set_attribute(&close, attr::CLOSE_ID, &id.to_string());
                dom.remove_class(&close, class::HIDE);
            }
            None => tracing::warn!(cell = %self.key, %id, "could not attach a close control"),
        }
    }

    /// Reset to the empty state: no id, no data attributes, no state classes.
    pub(crate) fn clear<D>(&self, dom: &D)
    where
        D: ScheduleDom<Element = E>,
    {
        dom.set_element_id(&self.element, None);
        for name in [
            attr::SCHEDULE_ITEM_ID,
            attr::LEGACY_SCHEDULE_ITEM_ID,
            attr::CLOSE_ID,
            attr::TALK_ID,
            attr::PAGE_ID,
        ] {
            dom.remove_attribute(&self.element, name);
        }
        dom.remove_class(&self.element, class::DRAGGABLE);
        dom.remove_class(&self.element, class::OVER);
        self.set_kind(dom, None);
        dom.set_label(&self.element, "");

        if let Some(close) = dom.close_control(&self.element) {
            dom.remove_attribute(&close, attr::CLOSE_ID);
            dom.add_class(&close, class::HIDE);
        }
    }

    fn set_kind<D>(&self, dom: &D, kind: Option<ChipKind>)
    where
        D: ScheduleDom<Element = E>,
    {
        dom.remove_class(&self.element, class::SUCCESS);
        dom.remove_class(&self.element, class::INFO);
        match kind {
            Some(kind) => {
                dom.set_attribute(&self.element, attr::TYPE, kind.as_str());
                dom.add_class(&self.element, kind.state_class());
            }
            None => dom.remove_attribute(&self.element, attr::TYPE),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CloseSnapshot<E> {
    element: E,
    id: Option<String>,
    hidden: bool,
}

/// Everything an optimistic mutation may touch on a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellSnapshot<E> {
    element: E,
    attributes: Vec<(&'static str, Option<String>)>,
    classes: Vec<(&'static str, bool)>,
    label: String,
    close: Option<CloseSnapshot<E>>,
}

const SNAPSHOT_ATTRIBUTES: [&str; 7] = [
    attr::ID,
    attr::TYPE,
    attr::SCHEDULE_ITEM_ID,
    attr::LEGACY_SCHEDULE_ITEM_ID,
    attr::CLOSE_ID,
    attr::TALK_ID,
    attr::PAGE_ID,
];

const SNAPSHOT_CLASSES: [&str; 4] = [class::SUCCESS, class::INFO, class::DRAGGABLE, class::OVER];

impl<E: Clone + PartialEq + fmt::Debug> CellSnapshot<E> {
    pub fn capture<D>(dom: &D, cell: &Cell<E>) -> Self
    where
        D: ScheduleDom<Element = E>,
    {
        let element = cell.element.clone();
        let attributes = SNAPSHOT_ATTRIBUTES
            .iter()
            .map(|&name| (name, dom.attribute(&element, name)))
            .collect();
        let classes = SNAPSHOT_CLASSES
            .iter()
            .map(|&class| (class, dom.has_class(&element, class)))
            .collect();
        let close = dom.close_control(&element).map(|close| CloseSnapshot {
            id: dom.attribute(&close, attr::CLOSE_ID),
            hidden: dom.has_class(&close, class::HIDE),
            element: close,
        });
        Self {
            label: dom.label(&element),
            element,
            attributes,
            classes,
            close,
        }
    }

    /// Put the cell back exactly as captured.
    pub fn restore<D>(&self, dom: &D)
    where
        D: ScheduleDom<Element = E>,
    {
        for (name, value) in &self.attributes {
            match value {
                Some(value) => dom.set_attribute(&self.element, name, value),
                None => dom.remove_attribute(&self.element, name),
            }
        }
        for &(class, on) in &self.classes {
            dom.toggle_class(&self.element, class, on);
        }
        dom.set_label(&self.element, &self.label);

        match &self.close {
            Some(close) => {
                match &close.id {
                    Some(id) => dom.set_attribute(&close.element, attr::CLOSE_ID, id),
                    None => dom.remove_attribute(&close.element, attr::CLOSE_ID),
                }
                dom.toggle_class(&close.element, class::HIDE, close.hidden);
            }
            // A control created after the capture must not outlive the rollback.
            None => {
                if let Some(created) = dom.close_control(&self.element) {
                    dom.remove_attribute(&created, attr::CLOSE_ID);
                    dom.add_class(&created, class::HIDE);
                }
            }
        }
    }
}

/// The state a cell returns to when its latest request fails.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Settled<E> {
    /// As the page showed it before the first unconfirmed change.
    Snapshot(CellSnapshot<E>),
    /// Bound to a record the server confirmed after that change was made.
    Bound {
        id: ScheduleItemId,
        kind: ChipKind,
        label: String,
    },
    /// The server deleted the cell's record.
    Empty,
}

impl<E: Clone + PartialEq + fmt::Debug> Settled<E> {
    pub(crate) fn restore<D>(&self, dom: &D, cell: &Cell<E>)
    where
        D: ScheduleDom<Element = E>,
    {
        match self {
            Settled::Snapshot(snapshot) => snapshot.restore(dom),
            Settled::Bound { id, kind, label } => {
                cell.clear(dom);
                dom.set_label(&cell.element, label);
                cell.bind(dom, *id, *kind);
            }
            Settled::Empty => cell.clear(dom),
        }
    }
}
