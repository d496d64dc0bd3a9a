//! Render backend trait and shared error type.
//!
//! A [`RenderBackend`] opens one [`RenderSession`] per poster request; the
//! session is reused for every aspect ratio and released when dropped. The
//! production backend is [`ChromeBackend`](super::chrome::ChromeBackend).
//! Tests substitute backends that record calls and return canned bytes.

use super::targets::AspectTarget;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Browser launch failed: {0}")]
    Launch(String),
    #[error("Page load failed: {0}")]
    Load(String),
    #[error("Capture failed: {0}")]
    Capture(String),
    #[error("Render task failed: {0}")]
    Task(String),
}

/// Source of render sessions.
pub trait RenderBackend: Send + Sync {
    /// Acquire a session (browser + page). Called once per poster request.
    fn open_session(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// One open rendering surface. Dropping it releases the browser.
pub trait RenderSession {
    /// Size the surface for `target`, load `markup`, wait for it to settle,
    /// and return a PNG captured at the target's output pixel size.
    fn capture(&mut self, markup: &str, target: AspectTarget) -> Result<Vec<u8>, RenderError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Minimal valid-looking PNG header; enough for file-presence checks.
    pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Open,
        Capture { target: AspectTarget, markup_len: usize },
        Close,
    }

    /// Mock backend that records operations without launching a browser.
    #[derive(Default, Clone)]
    pub struct MockBackend {
        pub operations: Arc<Mutex<Vec<RecordedOp>>>,
        /// Fail when opening the session.
        pub fail_open: bool,
        /// Fail the capture with this zero-based index.
        pub fail_capture_at: Option<usize>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl RenderBackend for MockBackend {
        fn open_session(&self) -> Result<Box<dyn RenderSession>, RenderError> {
            if self.fail_open {
                return Err(RenderError::Launch("no browser in tests".into()));
            }
            self.operations.lock().unwrap().push(RecordedOp::Open);
            Ok(Box::new(MockSession {
                operations: self.operations.clone(),
                fail_capture_at: self.fail_capture_at,
                captures: 0,
            }))
        }
    }

    struct MockSession {
        operations: Arc<Mutex<Vec<RecordedOp>>>,
        fail_capture_at: Option<usize>,
        captures: usize,
    }

    impl RenderSession for MockSession {
        fn capture(&mut self, markup: &str, target: AspectTarget) -> Result<Vec<u8>, RenderError> {
            let index = self.captures;
            self.captures += 1;
            if self.fail_capture_at == Some(index) {
                return Err(RenderError::Capture(format!("capture {index} failed")));
            }
            self.operations.lock().unwrap().push(RecordedOp::Capture {
                target,
                markup_len: markup.len(),
            });
            Ok(FAKE_PNG.to_vec())
        }
    }

    impl Drop for MockSession {
        fn drop(&mut self) {
            self.operations.lock().unwrap().push(RecordedOp::Close);
        }
    }
}
