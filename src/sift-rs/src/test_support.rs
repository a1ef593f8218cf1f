//! Scripted in-memory transport for unit tests

use reqwest::Method;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use crate::request::{HttpRequest, HttpResponse, Transport};
use crate::{Client, Result};
use sift_core::ClientConfig;

type Handler = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync>;

pub(crate) struct MockTransport {
    handler: Handler,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new(
        handler: impl Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    /// Number of requests sent with this method to this path
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.url.path() == path)
            .count()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = (self.handler)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }
}

pub(crate) fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string(),
    }
}

pub(crate) fn client(transport: Arc<MockTransport>) -> Client {
    Client::with_transport(ClientConfig::new("http://localhost:7700"), transport).unwrap()
}

pub(crate) fn task_json(uid: u64, status: &str) -> Value {
    json!({
        "uid": uid,
        "indexUid": "movies",
        "status": status,
        "type": "documentAdditionOrUpdate",
        "canceledBy": null,
        "details": { "receivedDocuments": 1, "indexedDocuments": null },
        "error": null,
        "duration": null,
        "enqueuedAt": "2024-01-01T00:00:00Z",
        "startedAt": null,
        "finishedAt": null
    })
}

pub(crate) fn enqueued_json(uid: u64, kind: &str) -> Value {
    json!({
        "taskUid": uid,
        "indexUid": "movies",
        "status": "enqueued",
        "type": kind,
        "enqueuedAt": "2024-01-01T00:00:00Z"
    })
}

/// Task uid from a `/tasks/{uid}` request path
pub(crate) fn task_uid_from_path(request: &HttpRequest) -> Option<u64> {
    request
        .url
        .path()
        .strip_prefix("/tasks/")
        .and_then(|uid| uid.parse().ok())
}
