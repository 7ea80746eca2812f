//! Browser layer for the wafer schedule editor.
//!
//! This crate provides the `web-sys` implementation of `ScheduleDom`, the
//! HTTP client for the schedule item resource, and DOM event wiring. It
//! assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`: `BrowserDom`, element access over `web_sys::Element`
//! - `http`: `HttpScheduleApi`, `reqwest` client with CSRF token injection
//! - `events`: event path extraction and drag/drop/click listeners
//! - `widgets`: markdown preview and admin time list setup
//!
//! # Re-exports
//!
//! This crate re-exports `wafer-schedule-core` for convenience, so consumers
//! only need to depend on `wafer-schedule-browser`.

// Re-export core crate
pub use wafer_schedule_core;
pub use wafer_schedule_core::*;

pub mod dom;
pub mod events;
pub mod http;
pub mod widgets;

pub use dom::BrowserDom;
pub use events::{BrowserEditor, MountedEditor, event_path, mount};
pub use http::HttpScheduleApi;
