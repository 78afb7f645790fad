//! Practicum adapter (homework review statuses).
//!
//! Implements the `hwbot-core` [`HomeworkApi`] port over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;

use hwbot_core::{errors::Error, ports::HomeworkApi, Result};

const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Clone, Debug)]
pub struct PracticumClient {
    endpoint: String,
    http: reqwest::Client,
}

impl PracticumClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }
}

#[async_trait]
impl HomeworkApi for PracticumClient {
    async fn homework_statuses(&self, token: &str, from_date: i64) -> Result<serde_json::Value> {
        tracing::debug!(from_date, endpoint = %self.endpoint, "requesting homework statuses");

        let resp = self
            .http
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {token}"))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(map_request_err)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        let bytes = resp.bytes().await.map_err(map_request_err)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::Decode(format!("homework API returned invalid JSON: {e}")))
    }
}

fn map_request_err(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Transport(format!("homework API timed out: {e}"))
    } else {
        Error::Transport(format!("homework API request error: {e}"))
    }
}
