//! Error types for the schedule editor.

use miette::Diagnostic;

/// Why a request to the schedule item resource did not take effect.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
#[non_exhaustive]
pub enum PersistenceFailure {
    /// The request never produced a response.
    #[error("network error: {0}")]
    #[diagnostic(code(wafer_schedule::network))]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {body}")]
    #[diagnostic(code(wafer_schedule::status))]
    Status { status: u16, body: String },

    /// The response body was not a schedule item.
    #[error("malformed response: {0}")]
    #[diagnostic(
        code(wafer_schedule::malformed_response),
        help("the server must answer with id, venue, slots, talk and page")
    )]
    MalformedResponse(String),
}

impl PersistenceFailure {
    /// Short message suitable for a transient notice on the page.
    pub fn notice(&self) -> String {
        match self {
            PersistenceFailure::Network(_) => {
                "Could not reach the server; the schedule change was undone.".to_string()
            }
            PersistenceFailure::Status { status, .. } => {
                format!("The server rejected the schedule change ({status}); it was undone.")
            }
            PersistenceFailure::MalformedResponse(_) => {
                "The server sent an unexpected reply; the schedule change was undone.".to_string()
            }
        }
    }
}

impl From<serde_json::Error> for PersistenceFailure {
    fn from(err: serde_json::Error) -> Self {
        PersistenceFailure::MalformedResponse(err.to_string())
    }
}

/// Main error type for editor operations.
///
/// Everything except `Persistence` is raised before any DOM mutation, so
/// handlers can log and carry on.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum EditorError {
    /// The drag payload names an element that is not on the page.
    #[error("no chip with id {0:?}")]
    #[diagnostic(code(wafer_schedule::missing_chip))]
    MissingChip(String),

    /// A required markup attribute is absent or empty.
    #[error("{element} has no {attribute} attribute")]
    #[diagnostic(code(wafer_schedule::missing_attribute))]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// `data-type` is neither `talk` nor `page`.
    #[error("unknown chip type {0:?}")]
    #[diagnostic(code(wafer_schedule::unknown_chip_kind))]
    UnknownChipKind(String),

    /// The event target is not inside a droppable cell.
    #[error("event target is not inside a droppable cell")]
    #[diagnostic(code(wafer_schedule::not_a_cell))]
    NotACell,

    /// A delete click did not come from a close control.
    #[error("event path contains no close control")]
    #[diagnostic(code(wafer_schedule::no_close_control))]
    NoCloseControl,

    /// A schedule item id that is not a positive integer.
    #[error("invalid schedule item id {0:?}")]
    #[diagnostic(code(wafer_schedule::invalid_id))]
    InvalidScheduleItemId(String),

    /// The server round trip failed and the cell was restored.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Persistence(#[from] PersistenceFailure),
}
