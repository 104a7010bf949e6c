/// reqwest-backed transport
///
/// Status handling follows the database's conventions: anything outside 2xx
/// is reported with its status and body (TMDB puts `status_message` there),
/// and the body of a successful response is decoded as JSON.
use crate::{
    error::{AppError, AppResult},
    request_id::RequestId,
    services::{providers::HttpTransport, query_builder::redact_api_key},
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const USER_AGENT: &str = concat!("cinesearch/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: HttpClient,
}

impl ReqwestTransport {
    /// Creates a transport whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http_client })
    }

    fn decode_body(request_id: RequestId, body: &str) -> AppResult<serde_json::Value> {
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                "Failed to decode movie database response"
            );
            AppError::Decode(e)
        })
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, url: &str) -> AppResult<serde_json::Value> {
        let request_id = RequestId::new();
        tracing::debug!(
            request_id = %request_id,
            url = %redact_api_key(url),
            transport = self.name(),
            "Dispatching request"
        );

        let response = self.http_client.get(url).send().await.map_err(|e| {
            tracing::warn!(request_id = %request_id, error = %e, "Request failed");
            AppError::HttpClient(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                request_id = %request_id,
                status = status.as_u16(),
                "Movie database returned an error status"
            );
            return Err(AppError::ExternalApi(format!(
                "Movie database returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        tracing::debug!(
            request_id = %request_id,
            status = status.as_u16(),
            bytes = body.len(),
            "Response received"
        );

        Self::decode_body(request_id, &body)
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}
