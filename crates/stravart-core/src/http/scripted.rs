//! Scripted transport for unit tests: replays queued outcomes in order and
//! records every request it receives.

use super::{HttpRequest, HttpResponse, Transport, TransportError};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, response: HttpResponse) -> &Self {
        self.script.lock().unwrap().push_back(Ok(response));
        self
    }

    pub(crate) fn respond_json(&self, status: u32, body: &str) -> &Self {
        self.respond(
            HttpResponse::new(status)
                .with_header("Content-Type", "application/json")
                .with_body(body),
        )
    }

    pub(crate) fn fail(&self, reason: &str) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(TransportError::Connection(reason.to_string())));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of recorded requests whose URL contains `needle`.
    pub(crate) fn count(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.contains(needle))
            .count()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        self.requests.lock().unwrap().push(request);
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("script exhausted".to_string())));
        async move { next }
    }
}
