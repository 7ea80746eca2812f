//! Schedule grid vocabulary: chip kinds, schedule item ids and the markup
//! attribute/class names the server-rendered page uses.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use crate::error::EditorError;

/// Prefix of a placed cell's element id (`scheduleItem42`).
pub const SCHEDULE_ITEM_ID_PREFIX: &str = "scheduleItem";

/// Attribute names shared with the server-rendered markup.
pub mod attr {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const TYPE: &str = "data-type";
    pub const TALK_ID: &str = "data-talk-id";
    pub const PAGE_ID: &str = "data-page-id";
    pub const VENUE: &str = "data-venue";
    pub const SLOT: &str = "data-slot";
    /// Canonical cell binding to the server record.
    pub const SCHEDULE_ITEM_ID: &str = "data-schedule-item-id";
    /// Older renders used this spelling; cleared on delete.
    pub const LEGACY_SCHEDULE_ITEM_ID: &str = "data-scheduleitem-id";
    /// Schedule item id carried by a close control; some older cells carry it too.
    pub const CLOSE_ID: &str = "data-id";
}

/// CSS classes shared with the server-rendered markup and stylesheet.
pub mod class {
    pub const DRAGGABLE: &str = "draggable";
    pub const DROPPABLE: &str = "droppable";
    pub const OVER: &str = "over";
    pub const SUCCESS: &str = "success";
    pub const INFO: &str = "info";
    pub const DRAGGING: &str = "label-danger";
    pub const CLOSE: &str = "close";
    pub const HIDE: &str = "hide";
}

/// What a chip schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipKind {
    Talk,
    Page,
}

impl ChipKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChipKind::Talk => "talk",
            ChipKind::Page => "page",
        }
    }

    /// Cell state class for a placement of this kind.
    pub fn state_class(self) -> &'static str {
        match self {
            ChipKind::Talk => class::SUCCESS,
            ChipKind::Page => class::INFO,
        }
    }

    /// Chip attribute holding the kind-specific foreign key.
    pub fn key_attribute(self) -> &'static str {
        match self {
            ChipKind::Talk => attr::TALK_ID,
            ChipKind::Page => attr::PAGE_ID,
        }
    }
}

impl fmt::Display for ChipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChipKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "talk" => Ok(ChipKind::Talk),
            "page" => Ok(ChipKind::Page),
            other => Err(EditorError::UnknownChipKind(other.to_string())),
        }
    }
}

/// Server-assigned schedule item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleItemId(pub u64);

impl ScheduleItemId {
    /// Element id of a cell bound to this item.
    pub fn element_id(self) -> String {
        format!("{SCHEDULE_ITEM_ID_PREFIX}{}", self.0)
    }

    /// Parse a cell element id.
    ///
    /// `Ok(None)` for the legacy `scheduleItemnull`/`scheduleItem` placeholders.
    pub fn from_element_id(id: &str) -> Result<Option<Self>, EditorError> {
        let Some(rest) = id.strip_prefix(SCHEDULE_ITEM_ID_PREFIX) else {
            return Err(EditorError::InvalidScheduleItemId(id.to_string()));
        };
        match rest {
            "" | "null" | "undefined" => Ok(None),
            digits => digits.parse::<ScheduleItemId>().map(Some),
        }
    }

    /// Parse an attribute value; empty and `null` mean "no record".
    pub fn from_attribute(value: &str) -> Result<Option<Self>, EditorError> {
        match value.trim() {
            "" | "null" | "undefined" | "None" => Ok(None),
            digits => digits.parse::<ScheduleItemId>().map(Some),
        }
    }
}

impl FromStr for ScheduleItemId {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(ScheduleItemId)
            .map_err(|_| EditorError::InvalidScheduleItemId(s.to_string()))
    }
}

impl fmt::Display for ScheduleItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a grid cell.
///
/// The element id changes as the cell is filled and emptied, the venue and
/// slot never do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub venue: SmolStr,
    pub slot: SmolStr,
}

impl CellKey {
    pub fn new(venue: impl Into<SmolStr>, slot: impl Into<SmolStr>) -> Self {
        Self {
            venue: venue.into(),
            slot: slot.into(),
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.venue, self.slot)
    }
}

/// Foreign-key pair sent to the server.
///
/// Exactly one side is non-empty. The other is an empty string so the
/// server clears any reference left over from a previous placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    talk: String,
    page: String,
}

impl ItemRef {
    pub fn new(kind: ChipKind, key: impl Into<String>) -> Self {
        let key = key.into();
        match kind {
            ChipKind::Talk => Self {
                talk: key,
                page: String::new(),
            },
            ChipKind::Page => Self {
                talk: String::new(),
                page: key,
            },
        }
    }

    pub fn talk(&self) -> &str {
        &self.talk
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn into_parts(self) -> (String, String) {
        (self.talk, self.page)
    }
}
