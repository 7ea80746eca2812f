//! wafer-schedule-core: schedule grid editing logic without browser dependencies.
//!
//! This crate provides:
//! - `ScheduleDom` trait for element access, so the same logic runs against
//!   the browser DOM or an in-memory tree in tests
//! - `ScheduleApi` trait for the `scheduleitems` REST resource
//! - `ScheduleEditor` - drag session, drop resolution, sync and deletion
//! - Typed chip/cell accessors that enforce the markup contract in one place
//! - CSRF helpers, configuration and the admin widget helpers

pub mod config;
pub mod csrf;
pub mod delete;
pub mod dom;
pub mod drag;
pub mod drop;
pub mod editor;
pub mod error;
pub mod event_path;
pub mod model;
pub mod sync;
pub mod widgets;

#[cfg(test)]
pub(crate) mod testing;

pub use config::EditorConfig;
pub use csrf::{CsrfPolicy, cookie_value, is_csrf_safe_method};
pub use delete::PendingDeletion;
pub use dom::{Cell, CellSnapshot, Chip, ScheduleDom};
pub use drag::{DRAG_MIME, DragStart, DropEffect};
pub use drop::{PendingPlacement, PlacementRequest};
pub use editor::{ScheduleEditor, SyncStatus};
pub use error::{EditorError, PersistenceFailure};
pub use event_path::{EventPath, resolve_event_path};
pub use model::{CellKey, ChipKind, ItemRef, ScheduleItemId};
pub use smol_str::SmolStr;
pub use sync::{
    CreateScheduleItem, RelatedKey, ScheduleApi, ScheduleItemResponse, UpdateScheduleItem,
};
