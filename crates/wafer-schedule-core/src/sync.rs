//! Schedule item resource: request bodies, response shape and the client trait.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceFailure;
use crate::model::{ChipKind, ItemRef, ScheduleItemId};

/// Body of `POST /schedule/api/scheduleitems/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateScheduleItem {
    pub talk: String,
    pub page: String,
    pub venue: String,
    pub slots: Vec<String>,
}

impl CreateScheduleItem {
    pub fn new(item: ItemRef, venue: impl Into<String>, slot: impl Into<String>) -> Self {
        let (talk, page) = item.into_parts();
        Self {
            talk,
            page,
            venue: venue.into(),
            slots: vec![slot.into()],
        }
    }
}

/// Body of `PATCH /schedule/api/scheduleitems/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateScheduleItem {
    pub talk: String,
    pub page: String,
}

impl From<ItemRef> for UpdateScheduleItem {
    fn from(item: ItemRef) -> Self {
        let (talk, page) = item.into_parts();
        Self { talk, page }
    }
}

/// A related object as the server serializes it: usually a primary key,
/// occasionally a slug or name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelatedKey {
    Id(u64),
    Key(String),
}

impl RelatedKey {
    fn is_blank(&self) -> bool {
        matches!(self, RelatedKey::Key(k) if k.is_empty())
    }
}

impl fmt::Display for RelatedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelatedKey::Id(id) => write!(f, "{id}"),
            RelatedKey::Key(key) => f.write_str(key),
        }
    }
}

/// Canonical schedule item returned by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItemResponse {
    pub id: u64,
    #[serde(default)]
    pub venue: Option<RelatedKey>,
    #[serde(default)]
    pub slots: Vec<RelatedKey>,
    #[serde(default)]
    pub talk: Option<RelatedKey>,
    #[serde(default)]
    pub page: Option<RelatedKey>,
}

impl ScheduleItemResponse {
    pub fn from_json(body: &str) -> Result<Self, PersistenceFailure> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn item_id(&self) -> ScheduleItemId {
        ScheduleItemId(self.id)
    }

    /// What the record now holds. Exactly one of `talk`/`page` must be set.
    pub fn kind(&self) -> Result<ChipKind, PersistenceFailure> {
        let talk = self.talk.as_ref().filter(|k| !k.is_blank());
        let page = self.page.as_ref().filter(|k| !k.is_blank());
        match (talk, page) {
            (Some(_), None) => Ok(ChipKind::Talk),
            (None, Some(_)) => Ok(ChipKind::Page),
            (Some(_), Some(_)) => Err(PersistenceFailure::MalformedResponse(format!(
                "schedule item {} references both a talk and a page",
                self.id
            ))),
            (None, None) => Err(PersistenceFailure::MalformedResponse(format!(
                "schedule item {} references neither a talk nor a page",
                self.id
            ))),
        }
    }
}

/// Client for the schedule item resource.
///
/// Futures are not `Send`: the browser client runs on the page's single
/// event loop.
#[allow(async_fn_in_trait)]
pub trait ScheduleApi {
    async fn create(
        &self,
        item: &CreateScheduleItem,
    ) -> Result<ScheduleItemResponse, PersistenceFailure>;

    async fn update(
        &self,
        id: ScheduleItemId,
        item: &UpdateScheduleItem,
    ) -> Result<ScheduleItemResponse, PersistenceFailure>;

    async fn delete(&self, id: ScheduleItemId) -> Result<(), PersistenceFailure>;
}

impl<T: ScheduleApi> ScheduleApi for Rc<T> {
    async fn create(
        &self,
        item: &CreateScheduleItem,
    ) -> Result<ScheduleItemResponse, PersistenceFailure> {
        (**self).create(item).await
    }

    async fn update(
        &self,
        id: ScheduleItemId,
        item: &UpdateScheduleItem,
    ) -> Result<ScheduleItemResponse, PersistenceFailure> {
        (**self).update(id, item).await
    }

    async fn delete(&self, id: ScheduleItemId) -> Result<(), PersistenceFailure> {
        (**self).delete(id).await
    }
}
