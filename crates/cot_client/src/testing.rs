//! In-memory transport for unit tests.

use async_trait::async_trait;
use common::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::transport::{HttpRequest, HttpResponse, Transport};

pub(crate) const BASE: &str = "http://cot.test";

#[derive(Clone)]
enum Reply {
    Body { status: u16, body: Vec<u8> },
    Fail(String),
}

/// Scripted transport. Routes are keyed by URL without its query string;
/// unknown routes answer 404.
#[derive(Default)]
pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn set(&self, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("{BASE}{path}"), reply);
    }

    pub(crate) fn json(&self, path: &str, body: Value) {
        self.set(
            path,
            Reply::Body {
                status: 200,
                body: body.to_string().into_bytes(),
            },
        );
    }

    pub(crate) fn status(&self, path: &str, status: u16) {
        self.set(path, Reply::Body { status, body: Vec::new() });
    }

    pub(crate) fn raw(&self, path: &str, body: &str) {
        self.set(
            path,
            Reply::Body {
                status: 200,
                body: body.as_bytes().to_vec(),
            },
        );
    }

    pub(crate) fn fail(&self, path: &str, message: &str) {
        self.set(path, Reply::Fail(message.to_string()));
    }

    /// Every response waits this long before it is delivered.
    pub(crate) fn delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn calls_to(&self, path: &str) -> usize {
        let target = format!("{BASE}{path}");
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| strip_query(&r.url) == target)
            .count()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .routes
            .lock()
            .unwrap()
            .get(strip_query(&request.url))
            .cloned();

        match reply {
            Some(Reply::Body { status, body }) => Ok(HttpResponse { status, body }),
            Some(Reply::Fail(message)) => Err(Error::Transport(message)),
            None => Ok(HttpResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}
