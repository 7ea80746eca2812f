//! Event path resolution.
//!
//! Browsers disagree on how an event exposes the chain of elements it
//! passed through: some have the non-standard `event.path`, standard ones
//! have `composedPath()`, and older ones only give the target. The platform
//! layer reports whichever it found and `resolve_event_path` turns all three
//! into the same innermost-first list.

use crate::dom::ScheduleDom;

/// The ancestor chain as the runtime exposed it.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPath<E> {
    /// Legacy `event.path`, innermost first.
    Path(Vec<E>),
    /// `event.composedPath()`, innermost first.
    Composed(Vec<E>),
    /// Only the target is known; ancestors must be walked by hand.
    Target(E),
}

/// Ordered element chain from the event target outwards.
pub fn resolve_event_path<D: ScheduleDom>(dom: &D, path: EventPath<D::Element>) -> Vec<D::Element> {
    match path {
        EventPath::Path(elements) | EventPath::Composed(elements) => elements,
        EventPath::Target(target) => {
            let mut chain = vec![target];
            while let Some(parent) = chain.last().and_then(|e| dom.parent(e)) {
                chain.push(parent);
            }
            chain
        }
    }
}
