use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;

use super::error::{ModelError, ModelResult};
use super::family::{GenerationParams, ModelFamily};

#[async_trait]
/// A text-generation endpoint: prompt in, free-form text out.
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, prompt: &str) -> ModelResult<String>;

    /// Identifier reported in logs.
    fn model_id(&self) -> &str;
}

/// Invokes a hosted model over HTTP (`POST {endpoint}/model/{model_id}/invoke`).
///
/// The request body and the response text path are chosen by the
/// [`ModelFamily`] inferred from the model identifier.
pub struct HttpModelInvoker {
    http: HttpClient,
    endpoint: String,
    model_id: String,
    family: ModelFamily,
    api_key: Option<String>,
    params: GenerationParams,
}

impl HttpModelInvoker {
    pub fn new(endpoint: impl Into<String>, model_id: impl Into<String>, timeout: Duration) -> Self {
        let model_id = model_id.into();
        Self {
            http: HttpClient::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            family: ModelFamily::from_model_id(&model_id),
            model_id,
            api_key: None,
            params: GenerationParams::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut invoker = Self::new(
            config.resolved_model_endpoint(),
            config.model_id.clone(),
            config.model_timeout,
        );
        invoker.api_key = config.model_api_key.clone();
        invoker
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    pub fn invoke_url(&self) -> String {
        format!("{}/model/{}/invoke", self.endpoint, self.model_id)
    }
}

#[async_trait]
impl ModelInvoker for HttpModelInvoker {
    async fn invoke(&self, prompt: &str) -> ModelResult<String> {
        let body = self.family.request_body(prompt, &self.params);

        debug!(
            model = %self.model_id,
            family = %self.family,
            prompt_len = prompt.len(),
            "Invoking model"
        );

        let mut req = self
            .http
            .post(self.invoke_url())
            .header("Accept", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Transport(format!("timed out: {e}"))
            } else {
                ModelError::Transport(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: Value = resp
            .json()
            .await
            .map_err(|e| ModelError::Decode(e.to_string()))?;

        self.family.extract_text(&decoded)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
