//! Scripted game service for tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::api::{
    AnswerForm, AnswerResponse, BeginForm, BeginPage, CancelForm, CancelResponse, GameService,
};
use crate::error::{Error, Result};

/// A request received by the mock, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRequest {
    Begin(BeginForm),
    Answer(AnswerForm),
    Cancel(CancelForm),
}

/// Game service replaying queued responses.
///
/// Responses are returned in order per endpoint. Calling an endpoint whose
/// queue is empty fails as if the service had sent an unusable response.
#[derive(Debug, Default)]
pub struct MockGameService {
    begins: Mutex<VecDeque<BeginPage>>,
    answers: Mutex<VecDeque<AnswerResponse>>,
    cancels: Mutex<VecDeque<CancelResponse>>,
    request_log: Mutex<Vec<MockRequest>>,
}

impl MockGameService {
    /// Create a mock with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a begin page.
    pub fn with_begin(self, page: BeginPage) -> Self {
        self.begins.lock().push_back(page);
        self
    }

    /// Queue an answer response.
    pub fn with_answer(self, response: AnswerResponse) -> Self {
        self.answers.lock().push_back(response);
        self
    }

    /// Queue a cancel response.
    pub fn with_cancel(self, response: CancelResponse) -> Self {
        self.cancels.lock().push_back(response);
        self
    }

    /// Get all requests that were made to this service.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.request_log.lock().clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        self.request_log.lock().len()
    }

    fn exhausted(endpoint: &str) -> Error {
        Error::MalformedResponse(format!("no mock {} response queued", endpoint))
    }
}

#[async_trait]
impl GameService for MockGameService {
    async fn begin(&self, form: &BeginForm) -> Result<BeginPage> {
        self.request_log.lock().push(MockRequest::Begin(form.clone()));
        self.begins
            .lock()
            .pop_front()
            .ok_or_else(|| Self::exhausted("begin"))
    }

    async fn answer(&self, form: &AnswerForm) -> Result<AnswerResponse> {
        self.request_log.lock().push(MockRequest::Answer(form.clone()));
        self.answers
            .lock()
            .pop_front()
            .ok_or_else(|| Self::exhausted("answer"))
    }

    async fn cancel(&self, form: &CancelForm) -> Result<CancelResponse> {
        self.request_log.lock().push(MockRequest::Cancel(form.clone()));
        self.cancels
            .lock()
            .pop_front()
            .ok_or_else(|| Self::exhausted("cancel"))
    }
}
