//! `MockTransport` — a test double for [`Transport`].
//!
//! Useful wherever a real HTTP round-trip is either unavailable or
//! irrelevant: replies are scripted in call order and every request is
//! recorded for assertions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::transport::{Method, Query, Transport};
use crate::ClientError;

/// What the mock will answer for one call, in queue order.
pub enum MockReply {
    /// Succeed with this JSON value.
    Value(Value),
    /// Fail with a [`ClientError::Api`] carrying this status and message.
    ApiError { status: u16, message: String },
}

/// One request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub endpoint: String,
    pub query: Option<Query>,
    pub body: Option<Value>,
}

/// A mock transport that records every call it receives and answers from a
/// scripted reply queue.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next reply (builder style).
    pub fn reply(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Queue a successful JSON reply.
    pub fn reply_value(self, value: Value) -> Self {
        self.reply(MockReply::Value(value))
    }

    /// Queue an API error reply.
    pub fn reply_api_error(self, status: u16, message: impl Into<String>) -> Self {
        self.reply(MockReply::ApiError {
            status,
            message: message.into(),
        })
    }

    /// Number of requests issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All requests seen, in call order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: Option<Query>,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            endpoint: endpoint.to_owned(),
            query,
            body,
        });

        match self.replies.lock().unwrap().pop_front() {
            Some(MockReply::Value(value)) => Ok(value),
            Some(MockReply::ApiError { status, message }) => {
                Err(ClientError::Api { status, message })
            }
            None => panic!("MockTransport: no reply queued for '{endpoint}'"),
        }
    }
}
