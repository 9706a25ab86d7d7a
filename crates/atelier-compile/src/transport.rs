//! Transport seam between the dispatcher and the network.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{CompileError, CompileResult};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const BODY_PREVIEW_CHARS: usize = 200;

/// Posts requests to compile services. Implemented over HTTP in production;
/// tests substitute scripted implementations.
#[async_trait]
pub trait ServiceTransport: Send + Sync {
    /// JSON envelope in, JSON document out.
    async fn post_json(&self, url: &str, body: Value) -> CompileResult<Value>;

    /// Raw string body posted as a form, response body returned verbatim.
    async fn post_form(&self, url: &str, body: String) -> CompileResult<String>;
}

/// The reqwest-backed transport.
pub struct RemoteTransport {
    client: reqwest::Client,
}

impl RemoteTransport {
    pub fn new() -> CompileResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    async fn check(response: reqwest::Response) -> CompileResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(CompileError::Service {
            status: status.as_u16(),
            message: preview(&message),
        })
    }
}

#[async_trait]
impl ServiceTransport for RemoteTransport {
    async fn post_json(&self, url: &str, body: Value) -> CompileResult<Value> {
        debug!(%url, "posting json request");
        let response = self.client.post(url).json(&body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_form(&self, url: &str, body: String) -> CompileResult<String> {
        debug!(%url, "posting form request");
        let response = self
            .client
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await?;
        Ok(Self::check(response).await?.text().await?)
    }
}

/// Caps error bodies so a misbehaving service cannot flood the diagnostic.
fn preview(body: &str) -> String {
    if body.chars().count() <= BODY_PREVIEW_CHARS {
        body.to_string()
    } else {
        let mut shortened: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
        shortened.push_str("...");
        shortened
    }
}
