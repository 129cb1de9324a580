use crate::utils::error::Result;
use async_trait::async_trait;

/// Runs one shell line to completion and yields its exit code.
///
/// Implementations must forward the child's output and block until it exits.
/// A nonzero exit code is returned as `Ok`; deciding whether it is fatal is the
/// caller's job. Spawn and wait failures are errors.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, shell_line: &str) -> Result<i32>;
}
