//! Cell deletion through a cell's close control.

use crate::dom::{Cell, ScheduleDom, Settled};
use crate::editor::{Confirmation, ScheduleEditor, SyncStatus, Ticket};
use crate::error::EditorError;
use crate::event_path::{EventPath, resolve_event_path};
use crate::model::{ScheduleItemId, attr, class};
use crate::sync::ScheduleApi;

/// A cell already emptied on the page, waiting for the server to delete
/// its record.
#[derive(Debug, Clone)]
pub struct PendingDeletion<E> {
    pub cell: Cell<E>,
    pub id: ScheduleItemId,
    ticket: Ticket,
}

impl<D: ScheduleDom, A: ScheduleApi> ScheduleEditor<D, A> {
    /// Handle a click that travelled along `path`.
    ///
    /// Finds the close control and its owning cell, resolves the record id
    /// and resets the cell to empty.
    pub fn delete(
        &self,
        path: EventPath<D::Element>,
    ) -> Result<PendingDeletion<D::Element>, EditorError> {
        let dom = self.dom();
        let chain = resolve_event_path(dom, path);

        let close_at = chain
            .iter()
            .position(|e| dom.has_class(e, class::CLOSE))
            .ok_or(EditorError::NoCloseControl)?;
        let close = &chain[close_at];
        let cell_element = chain[close_at + 1..]
            .iter()
            .find(|e| dom.has_class(e, class::DROPPABLE))
            .cloned()
            .or_else(|| {
                // Paths from some runtimes stop early; fall back to the tree.
                Cell::containing(dom, close).ok().map(|c| c.element)
            })
            .ok_or(EditorError::NotACell)?;
        let cell = Cell::from_element(dom, cell_element)?;

        let id = match dom.non_empty_attribute(close, attr::CLOSE_ID) {
            Some(value) => ScheduleItemId::from_attribute(&value)?,
            None => cell.schedule_item_id(dom)?,
        }
        .ok_or_else(|| EditorError::MissingAttribute {
            element: format!("close control of {}", cell.key),
            attribute: attr::CLOSE_ID,
        })?;

        let ticket = self.begin(&cell, Some(id));
        cell.clear(dom);
        tracing::debug!(cell = %cell.key, %id, generation = ticket.generation, "delete");

        Ok(PendingDeletion { cell, id, ticket })
    }

    /// Ask the server to delete the record, restoring the cell on failure.
    pub async fn persist_deletion(
        &self,
        pending: PendingDeletion<D::Element>,
    ) -> Result<SyncStatus, EditorError> {
        let _turn = pending.ticket.turn().await;
        let result = self.api().delete(pending.id).await;

        let confirmation = result.is_ok().then_some(Confirmation {
            record: None,
            settled: Settled::Empty,
        });
        let rollback = self.complete(&pending.cell.key, pending.ticket.generation, confirmation);
        let Some(rollback) = rollback else {
            tracing::warn!(
                cell = %pending.cell.key,
                id = %pending.id,
                ok = result.is_ok(),
                "dropping delete response superseded by a later request"
            );
            return Ok(SyncStatus::Superseded);
        };

        match result {
            Ok(()) => {
                tracing::debug!(cell = %pending.cell.key, id = %pending.id, "delete confirmed");
                Ok(SyncStatus::Deleted(pending.id))
            }
            Err(failure) => {
                tracing::error!(
                    cell = %pending.cell.key,
                    id = %pending.id,
                    error = %failure,
                    "delete failed"
                );
                rollback.restore(self.dom(), &pending.cell);
                self.dom().notify(&failure.notice());
                Err(failure.into())
            }
        }
    }

    /// `delete` followed by `persist_deletion`.
    pub async fn handle_delete(
        &self,
        path: EventPath<D::Element>,
    ) -> Result<SyncStatus, EditorError> {
        let pending = self.delete(path)?;
        self.persist_deletion(pending).await
    }
}
