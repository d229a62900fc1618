use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::SyncError;
use crate::core::normalize::normalize;
use crate::core::state::AppState;

pub const STATE_ROUTE: &str = "/api/state";

#[derive(Serialize)]
struct SaveRequest<'a> {
    state: &'a AppState,
}

/// Client for the document mirror: one JSON blob behind `GET/POST /api/state`.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    base_url: String,
    http: Client,
}

impl RemoteClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SyncError::Client)?;
        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn state_url(&self) -> String {
        format!("{}{}", self.base_url, STATE_ROUTE)
    }

    /// GET the stored document as-is.
    pub async fn fetch_raw(&self) -> Result<Value, SyncError> {
        let url = self.state_url();
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| SyncError::Request { url: url.clone(), source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Status { url, status: status.as_u16(), body });
        }

        let value: Value = resp.json().await.map_err(|e| SyncError::Decode {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        if !value.is_object() {
            return Err(SyncError::Decode {
                url,
                reason: "expected a JSON object".to_string(),
            });
        }
        Ok(value)
    }

    /// GET and normalize the stored document.
    pub async fn fetch_state(&self, today: NaiveDate) -> Result<AppState, SyncError> {
        let raw = self.fetch_raw().await?;
        Ok(normalize(Some(raw), today))
    }

    /// POST the whole document, replacing what the mirror holds.
    pub async fn push_state(&self, state: &AppState) -> Result<(), SyncError> {
        let url = self.state_url();
        let resp = self
            .http
            .post(&url)
            .json(&SaveRequest { state })
            .send()
            .await
            .map_err(|source| SyncError::Request { url: url.clone(), source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Status { url, status: status.as_u16(), body });
        }

        let ack: Value = resp.json().await.map_err(|e| SyncError::Decode {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        if ack.get("ok").and_then(Value::as_bool) != Some(true) {
            return Err(SyncError::Decode {
                url,
                reason: format!("save not acknowledged: {}", ack),
            });
        }
        log::debug!("Mirrored {} tasks to {}", state.tasks.len(), self.base_url);
        Ok(())
    }
}
