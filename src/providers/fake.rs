//! Scripted completion provider for tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::providers::traits::{CompletionProvider, CompletionRequest, ProviderError};

/// Returns the same scripted outcome for every call and records each request.
pub struct FakeProvider {
    outcome: Result<String, ProviderError>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeProvider {
    pub fn with_response(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: ProviderError) -> Self {
        Self {
            outcome: Err(err),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.requests.lock().push(request.clone());
        self.outcome.clone()
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}
