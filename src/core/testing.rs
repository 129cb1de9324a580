use crate::core::Executor;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn(&str) -> i32 + Send + Sync>;

/// Records every line it is asked to run and answers with a scripted exit code.
pub struct RecordingExecutor {
    lines: Arc<Mutex<Vec<String>>>,
    responder: Responder,
}

impl RecordingExecutor {
    pub fn succeeding() -> Self {
        Self::with_responder(|_| 0)
    }

    /// The responder may also touch the filesystem to stand in for `rm` or `unzip`.
    pub fn with_responder(responder: impl Fn(&str) -> i32 + Send + Sync + 'static) -> Self {
        Self {
            lines: Arc::new(Mutex::new(Vec::new())),
            responder: Box::new(responder),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn execute(&self, shell_line: &str) -> Result<i32> {
        self.lines.lock().unwrap().push(shell_line.to_string());
        Ok((self.responder)(shell_line))
    }
}
