//! WASM bindings for the wafer schedule editor.
//!
//! Mounts the drag-and-drop schedule grid editor on a server-rendered admin
//! page and exposes the small admin widget helpers to JavaScript.

mod editor;
mod widgets;

pub use editor::*;
pub use widgets::*;

use wasm_bindgen::prelude::*;

/// Install the panic hook and the console tracing subscriber.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
    {
        use tracing::Level;
        use tracing::subscriber::set_global_default;
        use tracing_subscriber::Registry;
        use tracing_subscriber::layer::SubscriberExt;

        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(console_level)
                .build(),
        );

        // A host page may already have installed one.
        let _ = set_global_default(Registry::default().with(wasm_layer));
    }
}
