//! Where the CSV document comes from

use async_trait::async_trait;
use rates_core::{Error, Result};

/// Fetches the raw CSV text for a resource locator
#[async_trait]
pub trait CsvSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET against a published sheet export.
///
/// No retries; the request timeout is whatever `reqwest` defaults to.
#[derive(Debug, Clone, Default)]
pub struct HttpCsvSource {
    client: reqwest::Client,
}

impl HttpCsvSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CsvSource for HttpCsvSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| Error::Fetch(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::net::SocketAddr;

    const BODY: &str = "Timestamp,05 Marla\n2024-01-15 10:00,52\n";

    async fn spawn_sheet_server() -> SocketAddr {
        let app = Router::new()
            .route("/rates.csv", get(|| async { BODY }))
            .route("/missing.csv", get(|| async { (StatusCode::NOT_FOUND, "gone") }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    /// Direct connections only, whatever proxy the environment sets
    fn local_source() -> HttpCsvSource {
        let client = reqwest::Client::builder()
            .no_proxy()
            .user_agent("rates-board-test")
            .build()
            .unwrap();
        HttpCsvSource::with_client(client)
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let addr = spawn_sheet_server().await;
        let text = local_source()
            .fetch(&format!("http://{}/rates.csv", addr))
            .await
            .unwrap();
        assert_eq!(text, BODY);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let addr = spawn_sheet_server().await;
        let url = format!("http://{}/missing.csv", addr);

        let err = local_source().fetch(&url).await.unwrap_err();
        match err {
            Error::HttpStatus { status, url: got } => {
                assert_eq!(status, 404);
                assert_eq!(got, url);
            }
            other => panic!("expected HttpStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_error() {
        // bind then drop so nothing is listening on the port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = local_source()
            .fetch(&format!("http://{}/rates.csv", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fetch(_)), "got {:?}", err);
    }
}
