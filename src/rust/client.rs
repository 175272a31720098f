use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::classifier::Metrics;
use crate::error::ClassifierError;
use crate::server::{ErrorBody, HealthResponse};
use crate::service::Classification;

/// Talks to a running classifier API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthResponse, ClassifierError> {
        let response = self.http.get(self.url("/health")).send().await.map_err(connection)?;
        decode(response).await
    }

    pub async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        debug!("POST {}/classify/ ({} chars)", self.base_url, text.len());
        let response = self
            .http
            .post(self.url("/classify/"))
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(connection)?;
        decode(response).await
    }

    pub async fn metrics(&self) -> Result<Metrics, ClassifierError> {
        let response = self.http.get(self.url("/metrics/")).send().await.map_err(connection)?;
        decode(response).await
    }
}

fn connection(err: reqwest::Error) -> ClassifierError {
    ClassifierError::ConnectionError(err.to_string())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClassifierError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(connection);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| format!("{}: {}", status, body));
    Err(status_error(status, message))
}

fn status_error(status: StatusCode, message: String) -> ClassifierError {
    if status.is_client_error() {
        ClassifierError::RequestError(message)
    } else {
        ClassifierError::PredictionError(message)
    }
}
