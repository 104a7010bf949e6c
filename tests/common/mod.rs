#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::Notify;

use cinesearch::{
    error::{AppError, AppResult},
    services::{HttpTransport, Notifier, QueryBuilder},
};

pub const API_URL: &str = "http://test.local/3";
pub const API_KEY: &str = "test_key";

pub fn query_builder() -> QueryBuilder {
    QueryBuilder::new(API_URL, API_KEY)
}

/// Canned reply for requests whose URL contains a marker
struct Route {
    marker: String,
    reply: Result<Value, String>,
    gate: Option<Arc<Notify>>,
}

/// Transport serving canned JSON. A route can be gated so its response is
/// held back until the test releases it.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<String>>,
    dispatched: Notify,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, marker: &str, body: Value) -> Self {
        self.routes.lock().unwrap().push(Route {
            marker: marker.to_string(),
            reply: Ok(body),
            gate: None,
        });
        self
    }

    pub fn fail(self, marker: &str, message: &str) -> Self {
        self.routes.lock().unwrap().push(Route {
            marker: marker.to_string(),
            reply: Err(message.to_string()),
            gate: None,
        });
        self
    }

    /// Like `respond`, but the reply waits for `gate.notify_one()`
    pub fn respond_gated(self, marker: &str, body: Value, gate: Arc<Notify>) -> Self {
        self.routes.lock().unwrap().push(Route {
            marker: marker.to_string(),
            reply: Ok(body),
            gate: Some(gate),
        });
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Resolves once `count` requests in total have reached the transport
    pub async fn wait_for_requests(&self, count: usize) {
        loop {
            let notified = self.dispatched.notified();
            if self.requests.lock().unwrap().len() >= count {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeTransport {
    async fn get_json(&self, url: &str) -> AppResult<Value> {
        self.requests.lock().unwrap().push(url.to_string());

        let (reply, gate) = {
            let routes = self.routes.lock().unwrap();
            let route = routes
                .iter()
                .find(|r| url.contains(&r.marker))
                .unwrap_or_else(|| panic!("no canned reply for {}", url));
            (route.reply.clone(), route.gate.clone())
        };

        self.dispatched.notify_waiters();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        reply.map_err(AppError::ExternalApi)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Notifier that remembers every message
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, Duration)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }

    pub fn durations(&self) -> Vec<Duration> {
        self.messages.lock().unwrap().iter().map(|(_, d)| *d).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, duration: Duration) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), duration));
    }
}

/// A search page with `count` movies whose ids start at `first_id`
pub fn search_page(page: u32, count: u64, total_pages: u32, first_id: u64) -> Value {
    let results: Vec<Value> = (0..count)
        .map(|i| json!({"id": first_id + i, "title": format!("Result {}", first_id + i)}))
        .collect();
    json!({
        "page": page,
        "results": results,
        "total_results": total_pages as u64 * 20,
        "total_pages": total_pages
    })
}
