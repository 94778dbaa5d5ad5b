use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use plateread_core::{RelayError, VisionProvider, VisionReply, VisionRequest};

/// A mock vision provider that returns a canned reply and counts its calls.
pub struct MockVisionProvider {
    name: String,
    outcome: MockOutcome,
    calls: AtomicUsize,
}

enum MockOutcome {
    Reply(String),
    Reject { status: u16, message: Option<String> },
}

impl MockVisionProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: MockOutcome::Reply(r#"{"results": []}"#.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.outcome = MockOutcome::Reply(response.into());
        self
    }

    /// Make every call fail as if the provider answered with `status`.
    pub fn with_rejection(mut self, status: u16, message: Option<&str>) -> Self {
        self.outcome = MockOutcome::Reject {
            status,
            message: message.map(str::to_string),
        };
        self
    }

    /// Number of times `complete` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &VisionRequest) -> Result<VisionReply, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            MockOutcome::Reply(content) => Ok(VisionReply {
                content: content.clone(),
                model: request.model.clone(),
                latency_ms: 0,
            }),
            MockOutcome::Reject { status, message } => {
                Err(RelayError::upstream(*status, message.clone()))
            }
        }
    }
}
