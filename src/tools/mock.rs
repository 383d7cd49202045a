use super::runner::{RawOutput, ToolError, ToolRequest, ToolRunner};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

/// Scripted [`ToolRunner`] that replays queued responses in order and records requests
pub struct MockToolRunner {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<ToolRequest>>,
}

#[derive(Debug, Clone)]
pub enum MockResponse {
    Output(RawOutput),
    SpawnError(String),
}

impl MockResponse {
    pub fn stdout(content: impl Into<String>) -> Self {
        Self::Output(RawOutput::ok(content))
    }

    pub fn stderr(content: impl Into<String>) -> Self {
        Self::Output(RawOutput {
            success: true,
            code: Some(0),
            stdout: String::new(),
            stderr: content.into(),
        })
    }

    pub fn exit(code: i32, stderr: impl Into<String>) -> Self {
        Self::Output(RawOutput {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        })
    }

    pub fn spawn_error(message: impl Into<String>) -> Self {
        Self::SpawnError(message.into())
    }
}

impl MockToolRunner {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        let runner = Self::new();
        runner.add_responses(responses);
        runner
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        self.responses.lock().unwrap().extend(responses);
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<ToolRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockToolRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolRunner for MockToolRunner {
    async fn run(&self, request: &ToolRequest) -> Result<RawOutput, ToolError> {
        self.requests.lock().unwrap().push(request.clone());

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(MockResponse::Output(output)) => Ok(output),
            Some(MockResponse::SpawnError(message)) => Err(ToolError::Spawn {
                program: request.program_name(),
                source: io::Error::new(io::ErrorKind::NotFound, message),
            }),
            None => Err(ToolError::Spawn {
                program: request.program_name(),
                source: io::Error::new(io::ErrorKind::Other, "no scripted response left"),
            }),
        }
    }
}
