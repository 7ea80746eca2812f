//! ScheduleEditorHandle - the mounted grid editor as seen from JavaScript.

use wasm_bindgen::prelude::*;
use wafer_schedule_browser::{MountedEditor, mount};
use wafer_schedule_core::EditorConfig;

/// A schedule editor wired into the page.
///
/// Listeners stay attached until `unmount` is called or the handle is freed.
#[wasm_bindgen]
pub struct ScheduleEditorHandle {
    mounted: Option<MountedEditor>,
}

#[wasm_bindgen]
impl ScheduleEditorHandle {
    /// Detach every listener. In-flight requests still reconcile their cells.
    pub fn unmount(&mut self) {
        if self.mounted.take().is_some() {
            tracing::info!("schedule editor unmounted");
        }
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }
}

/// Mount the editor on the schedule grid.
///
/// `config` is an optional object with `apiRoot`, `baseUrl`, `csrfCookie`,
/// `csrfHeader`, `noticeMs` and `gridSelector`; absent fields take their
/// defaults.
#[wasm_bindgen(js_name = mountScheduleEditor)]
pub fn mount_schedule_editor(config: JsValue) -> Result<ScheduleEditorHandle, JsError> {
    let config: EditorConfig = if config.is_null() || config.is_undefined() {
        EditorConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };

    let mounted = mount(config).map_err(|e| {
        JsError::new(&e.as_string().unwrap_or_else(|| "failed to mount schedule editor".into()))
    })?;
    Ok(ScheduleEditorHandle {
        mounted: Some(mounted),
    })
}
