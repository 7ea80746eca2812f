//! In-memory DOM and scripted API for unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde_json::{Value, json};
use tokio::sync::oneshot;

use crate::dom::ScheduleDom;
use crate::error::PersistenceFailure;
use crate::model::ScheduleItemId;
use crate::sync::{CreateScheduleItem, ScheduleApi, ScheduleItemResponse, UpdateScheduleItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Node {
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    label: String,
    opacity: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A tiny element tree. Node 0 is the grid row every cell lives in.
#[derive(Debug)]
pub struct MemoryDom {
    nodes: RefCell<Vec<Node>>,
    notices: RefCell<Vec<String>>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![Node::default()]),
            notices: RefCell::new(Vec::new()),
        }
    }

    fn insert(&self, parent: Option<NodeId>) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(Node {
            parent,
            ..Node::default()
        });
        if let Some(parent) = parent {
            nodes[parent.0].children.push(id);
        }
        id
    }

    fn with<T>(&self, element: &NodeId, f: impl FnOnce(&Node) -> T) -> T {
        f(&self.nodes.borrow()[element.0])
    }

    fn with_mut<T>(&self, element: &NodeId, f: impl FnOnce(&mut Node) -> T) -> T {
        f(&mut self.nodes.borrow_mut()[element.0])
    }

    /// Plain child element, e.g. the icon inside a close button.
    pub fn child(&self, parent: &NodeId) -> NodeId {
        self.insert(Some(*parent))
    }

    pub fn chip(&self, id: &str, kind: &str, key: &str, title: &str) -> NodeId {
        let chip = self.insert(None);
        self.set_attribute(&chip, "id", id);
        self.set_attribute(&chip, "data-type", kind);
        self.set_attribute(&chip, &format!("data-{kind}-id"), key);
        self.set_attribute(&chip, "title", title);
        self.add_class(&chip, "draggable");
        chip
    }

    pub fn cell(&self, venue: &str, slot: &str) -> NodeId {
        let cell = self.insert(Some(NodeId(0)));
        self.set_attribute(&cell, "data-venue", venue);
        self.set_attribute(&cell, "data-slot", slot);
        self.add_class(&cell, "droppable");
        cell
    }

    /// A cell as the server renders it when it already holds an item.
    pub fn placed_cell(&self, venue: &str, slot: &str, id: u64, kind: &str, title: &str) -> NodeId {
        let cell = self.cell(venue, slot);
        self.set_attribute(&cell, "id", &format!("scheduleItem{id}"));
        self.set_attribute(&cell, "data-schedule-item-id", &id.to_string());
        self.set_attribute(&cell, "data-type", kind);
        self.add_class(&cell, if kind == "talk" { "success" } else { "info" });
        self.set_label(&cell, title);
        let close = self.insert(Some(cell));
        self.add_class(&close, "close");
        self.set_attribute(&close, "data-id", &id.to_string());
        cell
    }

    pub fn opacity(&self, element: &NodeId) -> Option<String> {
        self.with(element, |n| n.opacity.clone())
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }
}

impl ScheduleDom for MemoryDom {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .borrow()
            .iter()
            .position(|n| n.attributes.get("id").map(String::as_str) == Some(id))
            .map(NodeId)
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.with(element, |n| n.attributes.get(name).cloned())
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) {
        self.with_mut(element, |n| {
            n.attributes.insert(name.to_string(), value.to_string());
        });
    }

    fn remove_attribute(&self, element: &NodeId, name: &str) {
        self.with_mut(element, |n| {
            n.attributes.remove(name);
        });
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.with(element, |n| n.classes.contains(class))
    }

    fn add_class(&self, element: &NodeId, class: &str) {
        self.with_mut(element, |n| {
            n.classes.insert(class.to_string());
        });
    }

    fn remove_class(&self, element: &NodeId, class: &str) {
        self.with_mut(element, |n| {
            n.classes.remove(class);
        });
    }

    fn label(&self, element: &NodeId) -> String {
        self.with(element, |n| n.label.clone())
    }

    fn set_label(&self, element: &NodeId, text: &str) {
        self.with_mut(element, |n| n.label = text.to_string());
    }

    fn set_opacity(&self, element: &NodeId, opacity: Option<&str>) {
        self.with_mut(element, |n| n.opacity = opacity.map(str::to_string));
    }

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.with(element, |n| n.parent)
    }

    fn close_control(&self, cell: &NodeId) -> Option<NodeId> {
        let children = self.with(cell, |n| n.children.clone());
        children.into_iter().find(|c| self.has_class(c, "close"))
    }

    fn create_close_control(&self, cell: &NodeId) -> Option<NodeId> {
        let close = self.insert(Some(*cell));
        self.add_class(&close, "close");
        Some(close)
    }

    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }
}

/// A request the scripted API received, with its JSON body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Create(Value),
    Update(ScheduleItemId, Value),
    Delete(ScheduleItemId),
}

type Reply = Result<Value, PersistenceFailure>;

enum Scripted {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// API double answering requests from a queue, in call order.
#[derive(Default)]
pub struct ScriptedApi {
    replies: RefCell<VecDeque<Scripted>>,
    calls: RefCell<Vec<ApiCall>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate reply.
    pub fn reply(&self, reply: Reply) {
        self.replies.borrow_mut().push_back(Scripted::Ready(reply));
    }

    /// Queue a reply that arrives when the sender fires.
    pub fn defer(&self, rx: oneshot::Receiver<Reply>) {
        self.replies.borrow_mut().push_back(Scripted::Deferred(rx));
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    async fn answer(&self, call: ApiCall) -> Reply {
        self.calls.borrow_mut().push(call);
        let next = self.replies.borrow_mut().pop_front();
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(PersistenceFailure::Network("reply dropped".into()))),
            None => Err(PersistenceFailure::Network("no scripted reply".into())),
        }
    }
}

impl ScheduleApi for ScriptedApi {
    async fn create(
        &self,
        item: &CreateScheduleItem,
    ) -> Result<ScheduleItemResponse, PersistenceFailure> {
        let body = serde_json::to_value(item)?;
        let value = self.answer(ApiCall::Create(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn update(
        &self,
        id: ScheduleItemId,
        item: &UpdateScheduleItem,
    ) -> Result<ScheduleItemResponse, PersistenceFailure> {
        let body = serde_json::to_value(item)?;
        let value = self.answer(ApiCall::Update(id, body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn delete(&self, id: ScheduleItemId) -> Result<(), PersistenceFailure> {
        self.answer(ApiCall::Delete(id)).await.map(|_| ())
    }
}

/// Server response body for a schedule item.
pub fn item_json(id: u64, talk: Option<u64>, page: Option<u64>) -> Value {
    json!({
        "id": id,
        "venue": 1,
        "slots": [1],
        "talk": talk,
        "page": page,
    })
}
