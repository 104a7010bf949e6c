/// Transport abstraction for talking to the movie database
///
/// Controllers never touch reqwest directly. They hand a fully built URL to an
/// `HttpTransport` and get back the decoded JSON body, which keeps them
/// testable with a mock and lets the front end swap the HTTP stack.
use crate::error::AppResult;

pub mod http;

pub use http::ReqwestTransport;

/// Issues GET requests and yields decoded JSON bodies
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetch `url` and decode the body as JSON
    ///
    /// Non-2xx responses and connection failures are errors; the body shape
    /// is not checked here.
    async fn get_json(&self, url: &str) -> AppResult<serde_json::Value>;

    /// Transport name for logging and debugging
    fn name(&self) -> &'static str;
}
