//! Handle for an in-flight asynchronous launch.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::encoding::Encoding;
use crate::error::Error;
use crate::result::ProcessResult;

type Assembly = Pin<Box<dyn Future<Output = Result<ProcessResult, Error>> + Send>>;

/// An eventual [`ProcessResult`].
///
/// Await it to get the result itself, or call [`get_result`](Self::get_result)
/// / [`get_result_as`](Self::get_result_as) to go straight to the decoded
/// stdout. Start and stream failures surface either way.
#[must_use = "a pending result does nothing unless awaited"]
pub struct PendingResult {
    assembly: Assembly,
}

impl PendingResult {
    /// Wraps a future producing a process result.
    pub fn new<F>(assembly: F) -> Self
    where
        F: Future<Output = Result<ProcessResult, Error>> + Send + 'static,
    {
        Self { assembly: Box::pin(assembly) }
    }

    /// Waits for the result and returns its stdout.
    ///
    /// # Errors
    ///
    /// Returns the launch failure, or [`Error::NonZeroExit`] when the
    /// process exited with a non-zero status.
    pub async fn get_result(self) -> Result<Vec<u8>, Error> {
        self.await?.into_result()
    }

    /// Waits for the result and returns its stdout decoded as text.
    ///
    /// # Errors
    ///
    /// Returns the launch failure, or [`Error::NonZeroExit`] when the
    /// process exited with a non-zero status.
    pub async fn get_result_as(self, encoding: Encoding) -> Result<String, Error> {
        self.await?.get_result_as(encoding)
    }
}

impl Future for PendingResult {
    type Output = Result<ProcessResult, Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.assembly.as_mut().poll(cx)
    }
}

impl fmt::Debug for PendingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingResult").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    fn ready(status: i32) -> PendingResult {
        PendingResult::new(async move {
            Ok(ProcessResult::new("tool", None, b"hello".to_vec(), b"world".to_vec(), Some(status)))
        })
    }

    #[tokio::test]
    async fn awaiting_yields_the_result() {
        let result = ready(1).await.unwrap();
        assert_eq!(result.status(), Some(1));
        assert_eq!(result.stderr(), b"world");
    }

    #[tokio::test]
    async fn forwards_accessors() {
        assert_eq!(ready(0).get_result().await.unwrap(), b"hello");
        assert_eq!(ready(0).get_result_as(Encoding::Utf8).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn forwarded_accessor_raises_non_zero_exit() {
        let err = ready(2).get_result_as(Encoding::Utf8).await.unwrap_err();
        assert_eq!(err.to_string(), "tool exited with code 2:\nworld");
    }

    #[tokio::test]
    async fn launch_failure_passes_through() {
        let pending = PendingResult::new(async {
            Err(Error::Start { command: "x".into(), source: io::Error::from(io::ErrorKind::NotFound) })
        });
        assert_eq!(pending.get_result().await.unwrap_err().kind(), "START_FAILURE");
    }
}
