use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::FlowError;

use super::{HttpResponse, RequestInput, Transport};

/// Scripted transport: hands out queued replies in order and records every
/// request it was given.
#[derive(Default)]
pub(crate) struct FakeTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, FlowError>>>,
    requests: Mutex<Vec<RequestInput>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, status: u16, body: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub(crate) fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(FlowError::Transport(message.to_string())));
        self
    }

    pub(crate) fn requests(&self) -> Vec<RequestInput> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: RequestInput) -> Result<HttpResponse, FlowError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FlowError::Transport("no scripted reply".into())))
    }
}
