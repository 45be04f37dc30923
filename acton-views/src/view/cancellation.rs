//! Request-scoped cancellation for view resolution

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// A cancellation token tied to the lifetime of one request.
///
/// The view engine checks the token before each page load and abandons any
/// in-flight load once it fires. Clones share the same signal.
///
/// # Examples
///
/// ```rust
/// use acton_views::view::CancellationToken;
///
/// let token = CancellationToken::new();
/// let child = token.clone();
/// token.cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    state: Arc<CancellationState>,
}

#[derive(Debug)]
struct CancellationState {
    tx: watch::Sender<bool>,
    rx: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Create a new, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            state: Arc::new(CancellationState { tx, rx }),
        }
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.state.rx.borrow()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        let _ = self.state.tx.send(true);
        debug!("View resolution cancellation requested");
    }

    /// Wait for the cancellation signal.
    ///
    /// Returns immediately if already cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.state.rx.clone();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }

    /// Run a future unless the token fires first.
    ///
    /// Returns `None` if cancelled; the future is dropped in that case.
    pub async fn run_until_cancelled<F, T>(&self, future: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            biased;
            () = self.cancelled() => None,
            result = future => Some(result),
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
