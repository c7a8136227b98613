//! Inference API Client
//!
//! HTTP client for one inference backend.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde_json::Value;

use super::config::ClientConfig;
use super::Backend;
use crate::error::{BackendError, ConfigError};
use crate::logic::features::PredictPayload;

/// Backend reached over HTTP
pub struct HttpBackend {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl HttpBackend {
    /// Create new backend client
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn health(&self) -> Result<Value, BackendError> {
        let url = self.config.health_url();

        let response = self.http_client
            .get(&url)
            .timeout(self.config.probe_timeout)
            .send()
            .await
            .map_err(network_error)?;

        read_json(response).await
    }

    async fn predict(&self, payload: &PredictPayload) -> Result<Value, BackendError> {
        let url = self.config.predict_url();
        log::debug!("POST {} ({})", url, self.config.domain);

        let response = self.http_client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(network_error)?;

        read_json(response).await
    }

    async fn fetch(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, BackendError> {
        let url = format!("{}{}", self.config.base_url, path);
        log::debug!("GET {} {:?}", url, query);

        let response = self.http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(network_error)?;

        read_json(response).await
    }
}

fn network_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::network("request timed out")
    } else {
        BackendError::network(e.to_string())
    }
}

/// 2xx → parsed JSON; anything else → error carrying the body's message if it has one
async fn read_json(response: Response) -> Result<Value, BackendError> {
    let status = response.status();
    let body = response.text().await.map_err(network_error)?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| {
            BackendError::http(status.as_u16(), format!("invalid JSON body: {}", e))
        });
    }

    let message = error_message(&body).unwrap_or_else(|| fallback_message(status));
    log::warn!("Backend returned {}: {}", status.as_u16(), message);
    Err(BackendError::http(status.as_u16(), message))
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

fn fallback_message(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("HTTP error").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::domain::Domain;
    use axum::{
        extract::{Path, Query},
        http::StatusCode as AxumStatus,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Serve `router` on an ephemeral port, return its base URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn backend(domain: Domain, base: &str) -> HttpBackend {
        let mut config = ClientConfig::new(domain, base).unwrap();
        config.request_timeout = Duration::from_secs(2);
        config.probe_timeout = Duration::from_millis(200);
        HttpBackend::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_payload() {
        let base = serve(Router::new().route(
            "/health",
            get(|| async { Json(json!({"status": "healthy", "model_loaded": true})) }),
        ))
        .await;

        let body = backend(Domain::Phishing, &base).health().await.unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_predict_posts_payload() {
        let base = serve(Router::new().route(
            "/predict",
            post(|Json(body): Json<Value>| async move { Json(json!({"echo": body})) }),
        ))
        .await;

        let payload = PredictPayload::Features { features: vec![1.0, 2.0] };
        let body = backend(Domain::Fraud, &base).predict(&payload).await.unwrap();
        assert_eq!(body["echo"], json!({"features": [1.0, 2.0]}));
    }

    #[tokio::test]
    async fn test_fetch_sends_path_and_query() {
        let base = serve(Router::new().route(
            "/api/historical/:symbol",
            get(|Path(symbol): Path<String>, Query(query): Query<HashMap<String, String>>| async move {
                Json(json!({"symbol": symbol, "period": query.get("period")}))
            }),
        ))
        .await;

        let body = backend(Domain::Stock, &base)
            .fetch("/api/historical/MSFT", &[("period", "6mo")])
            .await
            .unwrap();
        assert_eq!(body, json!({"symbol": "MSFT", "period": "6mo"}));
    }

    #[tokio::test]
    async fn test_non_2xx_uses_error_field() {
        let base = serve(Router::new().route(
            "/api/predict",
            post(|| async {
                (AxumStatus::BAD_REQUEST, Json(json!({"error": "Could not fetch data for ZZZZ"})))
            }),
        ))
        .await;

        let payload = PredictPayload::Symbol { symbol: "ZZZZ".into() };
        let err = backend(Domain::Stock, &base).predict(&payload).await.unwrap_err();
        assert_eq!(err, BackendError::http(400, "Could not fetch data for ZZZZ"));
    }

    #[tokio::test]
    async fn test_non_2xx_without_body_uses_reason() {
        let base = serve(Router::new().route(
            "/predict",
            post(|| async { AxumStatus::SERVICE_UNAVAILABLE }),
        ))
        .await;

        let payload = PredictPayload::Text { text: "hi".into() };
        let err = backend(Domain::Spam, &base).predict(&payload).await.unwrap_err();
        assert_eq!(err, BackendError::http(503, "Service Unavailable"));
    }

    #[tokio::test]
    async fn test_invalid_json_on_success() {
        let base = serve(Router::new().route("/", get(|| async { "<html>ok</html>" }))).await;

        let err = backend(Domain::Spam, &base).health().await.unwrap_err();
        assert_eq!(err.status, Some(200));
        assert!(err.message.starts_with("invalid JSON body"));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = backend(Domain::Spam, &format!("http://{}", addr)).health().await.unwrap_err();
        assert_eq!(err.status, None);
    }

    #[tokio::test]
    async fn test_probe_timeout() {
        let base = serve(Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"status": "ok"}))
            }),
        ))
        .await;

        let err = backend(Domain::Spam, &base).health().await.unwrap_err();
        assert_eq!(err, BackendError::network("request timed out"));
    }
}
