use serde::{Deserialize, Serialize};

use crate::model::ScheduleItemId;

/// Editor configuration, read from the page at mount time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Collection URL of the schedule item resource.
    pub api_root: String,
    /// Origin to resolve `api_root` against. Defaults to the page origin.
    pub base_url: Option<String>,
    /// Cookie holding the CSRF token.
    pub csrf_cookie: String,
    /// Request header the token is sent in.
    pub csrf_header: String,
    /// How long failure notices stay on screen.
    pub notice_ms: u32,
    /// Root element whose chips, cells and close controls are wired up.
    pub grid_selector: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_root: "/schedule/api/scheduleitems/".to_owned(),
            base_url: None,
            csrf_cookie: "csrftoken".to_owned(),
            csrf_header: "X-CSRFToken".to_owned(),
            notice_ms: 4000,
            grid_selector: "body".to_owned(),
        }
    }
}

impl EditorConfig {
    /// Parse from JSON, filling in defaults for absent fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Path of the collection (`POST`).
    pub fn collection_path(&self) -> String {
        let root = self.api_root.trim_end_matches('/');
        format!("{root}/")
    }

    /// Path of one item (`PATCH`, `DELETE`).
    pub fn item_path(&self, id: ScheduleItemId) -> String {
        let root = self.api_root.trim_end_matches('/');
        format!("{root}/{id}/")
    }
}
