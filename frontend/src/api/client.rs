use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;

use crate::{
    api::types::*,
    config,
    utils::storage::{BrowserStorage, KeyValueStore},
};

pub const TOKEN_KEY: &str = "auth_token";

/// Status and JSON body of a finished request. Bodies that are not JSON come
/// back as `Value::Null`.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
    storage: Rc<dyn KeyValueStore>,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
            storage: Rc::new(BrowserStorage),
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>, storage: Rc<dyn KeyValueStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: Some(base_url.into()),
            storage,
        }
    }

    pub fn with_storage(mut self, storage: Rc<dyn KeyValueStore>) -> Self {
        self.storage = storage;
        self
    }

    pub fn storage(&self) -> Rc<dyn KeyValueStore> {
        Rc::clone(&self.storage)
    }

    pub(super) fn http_client(&self) -> &Client {
        &self.client
    }

    pub(super) async fn resolved_base_url(&self) -> String {
        if let Some(base) = &self.base_url {
            base.clone()
        } else {
            config::await_config().await.api_base_url
        }
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    pub(super) fn store_token(&self, token: &str) -> Result<(), ApiError> {
        self.storage
            .set(TOKEN_KEY, token)
            .map_err(ApiError::unknown)
    }

    pub fn clear_token(&self) {
        self.storage.remove(TOKEN_KEY);
    }

    pub(super) fn bearer(&self) -> Result<String, ApiError> {
        self.token()
            .map(|token| format!("Bearer {}", token))
            .ok_or_else(|| ApiError::from_status(401, Some("Token tidak ditemukan".into())))
    }

    pub(super) async fn send(&self, builder: RequestBuilder) -> Result<RawResponse, ApiError> {
        let request = builder
            .build()
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        log::debug!("{} {}", request.method(), request.url().path());

        #[cfg(test)]
        {
            if let Some(responder) = mock_registry::find_mock(request.url().as_str()) {
                let mock = responder.respond(&request)?;
                return Ok(RawResponse {
                    status: mock.status,
                    body: mock.body,
                });
            }
        }

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok(RawResponse { status, body })
    }

    pub(super) fn decode<T: DeserializeOwned>(raw: RawResponse) -> Result<T, ApiError> {
        if raw.is_success() {
            serde_json::from_value(raw.body)
                .map_err(|e| ApiError::unknown(format!("Failed to parse response: {}", e)))
        } else {
            let err = ApiError::from_response_body(raw.status, &raw.body);
            log::warn!("request failed with status {}: {}", raw.status, err.error);
            Err(err)
        }
    }
}

#[cfg(test)]
pub use mock_registry::{register_mock, MockResponse, TestResponder};
