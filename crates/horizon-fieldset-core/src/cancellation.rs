//! Cooperative cancellation tokens.
//!
//! Suggestion retrieval is the one asynchronous operation in Horizon
//! Fieldset: a widget hands a [`CancellationToken`] to the host's suggestion
//! provider and cancels it when a newer request supersedes the pending one or
//! the widget unmounts. Result delivery checks the token before committing,
//! so stale responses are dropped without the widget ever blocking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable handle for requesting and observing cancellation.
///
/// All clones share the same state: cancelling any clone cancels them all.
///
/// # Example
///
/// ```
/// use horizon_fieldset_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
///
/// assert!(!observer.is_cancelled());
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, un-cancelled token.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }

    /// Request cancellation.
    ///
    /// Idempotent; later calls are no-ops.
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::Release);
    }

    /// Whether two tokens share the same underlying state.
    ///
    /// Result delivery uses this to verify a response belongs to the request
    /// the widget is still waiting on.
    pub fn same_token(&self, other: &CancellationToken) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(CancellationToken: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();

        assert!(!token.is_cancelled());
        assert!(!clone.is_cancelled());

        clone.cancel();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_token_identity() {
        let a = CancellationToken::new();
        let b = a.clone();
        let c = CancellationToken::new();

        assert!(a.same_token(&b));
        assert!(!a.same_token(&c));
    }
}
