//! reqwestによるHTTP送信
//!
//! リトライ・タイムアウト・TLSはreqwestのデフォルトのまま使用する。

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};

use super::{HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    fn build_client() -> Client {
        Client::builder()
            .user_agent(concat!("account-tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    }

    pub fn new() -> Self {
        Self {
            client: Self::build_client(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = Url::parse(&request.url).map_err(|e| TransportError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;

        let request_reads_body = request.read_body;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, request.content_type)
            .body(request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !request_reads_body {
            return Ok(HttpResponse { status, body: None });
        }

        let body = match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!("Failed to read response body: {}", e);
                None
            }
        };

        Ok(HttpResponse { status, body })
    }
}
