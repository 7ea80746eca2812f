//! HTTP client for the schedule item resource.

use reqwest::{Method, Url};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wafer_schedule_core::{
    CreateScheduleItem, CsrfPolicy, EditorConfig, PersistenceFailure, ScheduleApi,
    ScheduleItemId, ScheduleItemResponse, UpdateScheduleItem,
};

/// `ScheduleApi` over `fetch`, configured once at mount time.
///
/// Mutating requests carry the CSRF token and a JSON content type per the
/// `CsrfPolicy` it was built with.
pub struct HttpScheduleApi {
    client: reqwest::Client,
    base: Url,
    config: EditorConfig,
    csrf: CsrfPolicy,
}

impl HttpScheduleApi {
    pub fn new(config: EditorConfig, base: Url, csrf: CsrfPolicy) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
            config,
            csrf,
        }
    }

    /// Build from the current page: origin for the base URL, cookie for the
    /// CSRF token.
    pub fn from_page(config: EditorConfig, document: &web_sys::Document) -> Result<Self, JsValue> {
        let origin = match &config.base_url {
            Some(base) => base.clone(),
            None => web_sys::window()
                .ok_or_else(|| JsValue::from_str("no window"))?
                .location()
                .origin()?,
        };
        let base = Url::parse(&origin)
            .map_err(|e| JsValue::from_str(&format!("invalid base url {origin:?}: {e}")))?;

        let cookies = document
            .dyn_ref::<web_sys::HtmlDocument>()
            .and_then(|d| d.cookie().ok())
            .unwrap_or_default();
        let csrf = CsrfPolicy::from_cookies(config.csrf_header.clone(), &cookies, &config.csrf_cookie);

        Ok(Self::new(config, base, csrf))
    }

    fn url(&self, path: &str) -> Result<Url, PersistenceFailure> {
        self.base
            .join(path)
            .map_err(|e| PersistenceFailure::Network(format!("invalid url {path:?}: {e}")))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<String, PersistenceFailure> {
        let url = self.url(path)?;
        let mut request = self.client.request(method.clone(), url);
        for (name, value) in self.csrf.headers_for(method.as_str()) {
            request = request.header(name, value);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        tracing::debug!(%method, path, "schedule api request");
        let response = request
            .send()
            .await
            .map_err(|e| PersistenceFailure::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PersistenceFailure::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(PersistenceFailure::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

impl ScheduleApi for HttpScheduleApi {
    async fn create(
        &self,
        item: &CreateScheduleItem,
    ) -> Result<ScheduleItemResponse, PersistenceFailure> {
        let body = serde_json::to_string(item)?;
        let text = self
            .send(Method::POST, &self.config.collection_path(), Some(body))
            .await?;
        ScheduleItemResponse::from_json(&text)
    }

    async fn update(
        &self,
        id: ScheduleItemId,
        item: &UpdateScheduleItem,
    ) -> Result<ScheduleItemResponse, PersistenceFailure> {
        let body = serde_json::to_string(item)?;
        let text = self
            .send(Method::PATCH, &self.config.item_path(id), Some(body))
            .await?;
        ScheduleItemResponse::from_json(&text)
    }

    async fn delete(&self, id: ScheduleItemId) -> Result<(), PersistenceFailure> {
        self.send(Method::DELETE, &self.config.item_path(id), None)
            .await
            .map(|_| ())
    }
}
