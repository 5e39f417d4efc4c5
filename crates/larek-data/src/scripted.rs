//! In-memory API client with canned responses.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::{ApiClient, FetchError, Method};

/// A request observed by [`ScriptedApiClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: Method,
    /// Path as passed by the caller.
    pub path: String,
    /// JSON body for `POST` requests.
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
struct Script {
    responses: HashMap<(Method, String), VecDeque<Result<Value, FetchError>>>,
    sticky: HashMap<(Method, String), Result<Value, FetchError>>,
    requests: Vec<RecordedRequest>,
}

/// API client that answers from a script instead of the network.
///
/// Queued responses are consumed in order; once a queue is empty the sticky
/// response for that route (if any) answers every further call. Routes with
/// nothing scripted fail with a 404 [`FetchError::HttpError`].
#[derive(Debug, Default)]
pub struct ScriptedApiClient {
    script: Mutex<Script>,
}

impl ScriptedApiClient {
    /// Create a client with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a single response for a route.
    pub fn enqueue(&self, method: Method, path: &str, response: Result<Value, FetchError>) {
        self.lock()
            .responses
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Answer every call to a route with the same response.
    pub fn always(&self, method: Method, path: &str, response: Result<Value, FetchError>) {
        self.lock()
            .sticky
            .insert((method, path.to_string()), response);
    }

    /// Queue a successful `GET` response.
    pub fn on_get(self, path: &str, value: Value) -> Self {
        self.enqueue(Method::Get, path, Ok(value));
        self
    }

    /// Queue a successful `POST` response.
    pub fn on_post(self, path: &str, value: Value) -> Self {
        self.enqueue(Method::Post, path, Ok(value));
        self
    }

    /// Queue a failing `GET`.
    pub fn fail_get(self, path: &str, error: FetchError) -> Self {
        self.enqueue(Method::Get, path, Err(error));
        self
    }

    /// Queue a failing `POST`.
    pub fn fail_post(self, path: &str, error: FetchError) -> Self {
        self.enqueue(Method::Post, path, Err(error));
        self
    }

    /// All requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Number of calls made to a route.
    pub fn call_count(&self, method: Method, path: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn answer(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, FetchError> {
        let mut script = self.lock();
        script.requests.push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        });

        let key = (method, path.to_string());
        if let Some(response) = script.responses.get_mut(&key).and_then(VecDeque::pop_front) {
            return response;
        }
        script.sticky.get(&key).cloned().unwrap_or_else(|| {
            Err(FetchError::HttpError {
                status: 404,
                message: format!("no scripted response for {} {}", method, path),
            })
        })
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ApiClient for ScriptedApiClient {
    async fn get(&self, path: &str) -> Result<Value, FetchError> {
        self.answer(Method::Get, path, None)
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, FetchError> {
        self.answer(Method::Post, path, Some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_queued_then_sticky() {
        let client = ScriptedApiClient::new().on_get("/product/", json!({"total": 0, "items": []}));
        client.always(Method::Get, "/product/", Ok(json!({"total": 1, "items": []})));

        assert_eq!(client.get("/product/").await.unwrap()["total"], 0);
        assert_eq!(client.get("/product/").await.unwrap()["total"], 1);
        assert_eq!(client.get("/product/").await.unwrap()["total"], 1);
    }

    #[tokio::test]
    async fn test_unscripted_route_is_404() {
        let client = ScriptedApiClient::new();
        let err = client.post("/order", json!({})).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_records_requests() {
        let client = ScriptedApiClient::new().on_post("/order", json!({"id": "o1", "total": 10}));
        client.post("/order", json!({"total": 10})).await.unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].body, Some(json!({"total": 10})));
        assert_eq!(client.call_count(Method::Post, "/order"), 1);
    }
}
