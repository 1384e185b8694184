use std::time::Duration;

use api_types::{error::ErrorResponse, expense::ExpenseByCategorySummary};
use reqwest::Url;
use thiserror::Error;

use crate::error::{AppError, Result};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("endpoint not found")]
    NotFound,
    #[error("not authorized")]
    Unauthorized,
    #[error("server error: {0}")]
    Server(String),
    #[error("unexpected response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("server unreachable: {0}")]
    Transport(#[source] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, expenses_path: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|err| AppError::InvalidUrl(format!("base_url: {err}")))?;
        // `join` replaces the last path segment unless the base ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let endpoint = base_url
            .join(expenses_path.trim_start_matches('/'))
            .map_err(|err| AppError::InvalidUrl(format!("expenses_path: {err}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches the per-category expense summaries.
    pub async fn fetch_expenses_by_category(
        &self,
    ) -> std::result::Result<Vec<ExpenseByCategorySummary>, ClientError> {
        tracing::debug!("GET {}", self.endpoint);

        let res = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = res.status();
        let body = res.bytes().await.map_err(ClientError::Transport)?;

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(ClientError::Decode);
        }

        let message = serde_json::from_slice::<ErrorResponse>(&body)
            .map(|err| err.error)
            .unwrap_or_else(|_| status.to_string());

        let err = match status.as_u16() {
            401 | 403 => ClientError::Unauthorized,
            404 => ClientError::NotFound,
            _ => ClientError::Server(message),
        };
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Serves a single canned HTTP response on a random local port.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[test]
    fn endpoint_joins_base_and_path() {
        let client =
            Client::new("http://127.0.0.1:8000/", "/expenses", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:8000/expenses");
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client =
            Client::new("http://127.0.0.1:8000/api", "expenses", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://127.0.0.1:8000/api/expenses"
        );

        let client =
            Client::new("http://127.0.0.1:8000/api/", "/expenses", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://127.0.0.1:8000/api/expenses"
        );
    }

    #[test]
    fn decode_error_keeps_its_source() {
        let err = ClientError::Decode(serde_json::from_str::<u8>("x").unwrap_err());
        assert!(err.to_string().starts_with("unexpected response: "));
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&ClientError::NotFound).is_none());
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(Client::new("not a url", "expenses", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn decodes_successful_response() {
        let base = serve_once(
            "200 OK",
            r#"[{"category":"Office","amount":"10.50","date":"2024-01-05"}]"#,
        )
        .await;
        let client = Client::new(&base, "expenses", Duration::from_secs(5)).unwrap();

        let rows = client.fetch_expenses_by_category().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Office");
    }

    #[tokio::test]
    async fn maps_error_body() {
        let base = serve_once("500 Internal Server Error", r#"{"error":"db down"}"#).await;
        let client = Client::new(&base, "expenses", Duration::from_secs(5)).unwrap();

        match client.fetch_expenses_by_category().await {
            Err(ClientError::Server(message)) => assert_eq!(message, "db down"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn maps_not_found() {
        let base = serve_once("404 Not Found", "").await;
        let client = Client::new(&base, "expenses", Duration::from_secs(5)).unwrap();

        assert!(matches!(
            client.fetch_expenses_by_category().await,
            Err(ClientError::NotFound)
        ));
    }
}
