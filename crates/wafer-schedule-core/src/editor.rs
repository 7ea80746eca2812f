//! The schedule editor: one DOM, one API client, per-cell request sequencing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tokio::sync::{Mutex, MutexGuard};

use crate::dom::{Cell, CellSnapshot, ScheduleDom, Settled};
use crate::model::{CellKey, ScheduleItemId};
use crate::sync::ScheduleApi;

/// How a finished request left the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// The server accepted the change and the cell shows the record.
    Confirmed(ScheduleItemId),
    /// The server deleted the record; the cell stays empty.
    Deleted(ScheduleItemId),
    /// A later request for the same cell was issued while this one was
    /// waiting or in flight, so its outcome was not shown.
    Superseded,
}

/// Bookkeeping for one cell with requests outstanding.
struct CellSync<E> {
    generation: u64,
    in_flight: usize,
    /// Server record the cell is bound to, as of the last completed request.
    record: Option<ScheduleItemId>,
    /// What the cell goes back to if the latest request fails.
    settled: Settled<E>,
    queue: Rc<Mutex<()>>,
}

/// A request's place in its cell's queue.
#[derive(Debug, Clone)]
pub(crate) struct Ticket {
    pub(crate) generation: u64,
    queue: Rc<Mutex<()>>,
}

impl Ticket {
    /// Wait until every earlier request for the cell has completed.
    pub(crate) async fn turn(&self) -> MutexGuard<'_, ()> {
        self.queue.lock().await
    }
}

/// What a successful request left on the server.
pub(crate) struct Confirmation<E> {
    pub(crate) record: Option<ScheduleItemId>,
    pub(crate) settled: Settled<E>,
}

/// Drag-and-drop schedule editor.
///
/// Handlers read and write the DOM directly. Per cell, requests are sent
/// one at a time in the order they were issued, and only the most
/// recently issued one touches the DOM when it completes.
pub struct ScheduleEditor<D: ScheduleDom, A: ScheduleApi> {
    dom: D,
    api: A,
    cells: RefCell<HashMap<CellKey, CellSync<D::Element>>>,
}

impl<D: ScheduleDom, A: ScheduleApi> ScheduleEditor<D, A> {
    pub fn new(dom: D, api: A) -> Self {
        Self {
            dom,
            api,
            cells: RefCell::new(HashMap::new()),
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Queue a new request for `cell`.
    ///
    /// Must run before the optimistic mutation: when the cell is idle its
    /// current markup becomes the rollback state, and `record` (the id the
    /// markup shows) the record it is bound to.
    pub(crate) fn begin(
        &self,
        cell: &Cell<D::Element>,
        record: Option<ScheduleItemId>,
    ) -> Ticket {
        let mut cells = self.cells.borrow_mut();
        let sync = cells.entry(cell.key.clone()).or_insert_with(|| CellSync {
            generation: 0,
            in_flight: 0,
            record: None,
            settled: Settled::Empty,
            queue: Rc::new(Mutex::new(())),
        });
        if sync.in_flight == 0 {
            sync.record = record;
            sync.settled = Settled::Snapshot(CellSnapshot::capture(&self.dom, cell));
        }
        sync.in_flight += 1;
        sync.generation += 1;
        Ticket {
            generation: sync.generation,
            queue: sync.queue.clone(),
        }
    }

    /// Record the cell is bound to as of the last completed request.
    pub(crate) fn record(&self, key: &CellKey) -> Option<ScheduleItemId> {
        self.cells.borrow().get(key).and_then(|sync| sync.record)
    }

    /// Account for a completed request.
    ///
    /// Returns the state to roll back to if the request is still the latest
    /// for the cell, `None` if it was superseded.
    pub(crate) fn complete(
        &self,
        key: &CellKey,
        generation: u64,
        confirmation: Option<Confirmation<D::Element>>,
    ) -> Option<Settled<D::Element>> {
        let mut cells = self.cells.borrow_mut();
        let sync = cells.get_mut(key)?;
        sync.in_flight = sync.in_flight.saturating_sub(1);
        if let Some(confirmation) = confirmation {
            sync.record = confirmation.record;
            sync.settled = confirmation.settled;
        }
        (sync.generation == generation).then(|| sync.settled.clone())
    }
}
