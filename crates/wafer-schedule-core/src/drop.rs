//! Drop target resolution and placement persistence.
//!
//! A drop is handled in two halves. `drop` runs synchronously inside the
//! event handler: it resolves the cell and chip, shows the placement
//! optimistically and returns the request to make. `persist` runs the
//! request and then reconciles the cell with the server's record, or puts
//! it back the way it was.

use crate::dom::{Cell, Chip, ScheduleDom, Settled};
use crate::drag::DropEffect;
use crate::editor::{Confirmation, ScheduleEditor, SyncStatus, Ticket};
use crate::error::EditorError;
use crate::model::{ScheduleItemId, class};
use crate::sync::{CreateScheduleItem, ScheduleApi, UpdateScheduleItem};

/// Request chosen by whether the cell was already bound to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementRequest {
    Create(CreateScheduleItem),
    Update {
        id: ScheduleItemId,
        item: UpdateScheduleItem,
    },
}

impl PlacementRequest {
    /// A create queued behind a request that bound the cell to `record`
    /// updates that record instead of adding a second one.
    fn against(self, record: Option<ScheduleItemId>) -> Self {
        match (self, record) {
            (PlacementRequest::Create(item), Some(id)) => PlacementRequest::Update {
                id,
                item: UpdateScheduleItem {
                    talk: item.talk,
                    page: item.page,
                },
            },
            (request, _) => request,
        }
    }
}

/// A drop shown on the page but not yet confirmed by the server.
///
/// Holds the exact cell it was dropped into, so reconciliation never has to
/// search the page for the cell a response belongs to.
#[derive(Debug, Clone)]
pub struct PendingPlacement<E> {
    pub cell: Cell<E>,
    pub request: PlacementRequest,
    label: String,
    ticket: Ticket,
}

impl<D: ScheduleDom, A: ScheduleApi> ScheduleEditor<D, A> {
    /// Feedback for `dragover`. The platform layer must also cancel the
    /// event's default action, or the browser never fires `drop`.
    pub fn drag_over(&self) -> DropEffect {
        DropEffect::Move
    }

    pub fn drag_enter(&self, target: &D::Element) {
        self.dom().add_class(target, class::OVER);
    }

    pub fn drag_leave(&self, target: &D::Element) {
        self.dom().remove_class(target, class::OVER);
    }

    /// Handle a drop of the chip named by `payload` onto `target`.
    ///
    /// Fails without touching the cell if the markup is incomplete.
    pub fn drop(
        &self,
        target: &D::Element,
        payload: &str,
    ) -> Result<PendingPlacement<D::Element>, EditorError> {
        let dom = self.dom();
        dom.remove_class(target, class::OVER);

        let cell = Cell::containing(dom, target)?;
        dom.remove_class(&cell.element, class::OVER);
        let chip = Chip::by_id(dom, payload)?;
        let prior = cell.schedule_item_id(dom)?;

        let ticket = self.begin(&cell, prior);
        cell.show_placement(dom, &chip, prior);

        let request = match prior {
            Some(id) => PlacementRequest::Update {
                id,
                item: UpdateScheduleItem::from(chip.item_ref()),
            },
            None => PlacementRequest::Create(CreateScheduleItem::new(
                chip.item_ref(),
                cell.venue(),
                cell.slot(),
            )),
        };

        tracing::debug!(
            cell = %cell.key,
            chip = %chip.id,
            kind = %chip.kind,
            ?prior,
            generation = ticket.generation,
            "drop"
        );

        Ok(PendingPlacement {
            cell,
            request,
            label: chip.title,
            ticket,
        })
    }

    /// Send a pending placement to the server and reconcile the cell.
    ///
    /// Waits for earlier requests on the same cell first. On failure the
    /// cell goes back to its last confirmed state and the user is notified,
    /// unless a newer request for the cell has been issued meanwhile.
    pub async fn persist(
        &self,
        pending: PendingPlacement<D::Element>,
    ) -> Result<SyncStatus, EditorError> {
        let PendingPlacement {
            cell,
            request,
            label,
            ticket,
        } = pending;
        let _turn = ticket.turn().await;

        let request = request.against(self.record(&cell.key));
        let result = match &request {
            PlacementRequest::Create(item) => self.api().create(item).await,
            PlacementRequest::Update { id, item } => self.api().update(*id, item).await,
        };
        let result = result.and_then(|response| Ok((response.item_id(), response.kind()?)));

        let confirmation = result.as_ref().ok().map(|&(id, kind)| Confirmation {
            record: Some(id),
            settled: Settled::Bound { id, kind, label },
        });
        let Some(rollback) = self.complete(&cell.key, ticket.generation, confirmation) else {
            tracing::warn!(
                cell = %cell.key,
                generation = ticket.generation,
                ok = result.is_ok(),
                "not showing response superseded by a later request"
            );
            return Ok(SyncStatus::Superseded);
        };

        match result {
            Ok((id, kind)) => {
                cell.bind(self.dom(), id, kind);
                tracing::debug!(cell = %cell.key, %id, "placement confirmed");
                Ok(SyncStatus::Confirmed(id))
            }
            Err(failure) => {
                tracing::error!(cell = %cell.key, error = %failure, "placement failed");
                rollback.restore(self.dom(), &cell);
                self.dom().notify(&failure.notice());
                Err(failure.into())
            }
        }
    }

    /// `drop` followed by `persist`.
    pub async fn handle_drop(
        &self,
        target: &D::Element,
        payload: &str,
    ) -> Result<SyncStatus, EditorError> {
        let pending = self.drop(target, payload)?;
        self.persist(pending).await
    }
}
