use crate::transport::TransportManager;
use std::fmt;
use std::sync::Arc;

/// Decides, from the numeric HTTP status, whether a failed call is worth one
/// replay over a freshly built transport.
pub type RetryPredicate = Arc<dyn Fn(u16) -> bool + Send + Sync>;

/// Per-call bookkeeping. A call is replayed at most once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub retried: bool,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone, Default)]
pub struct RetryController {
    predicate: Option<RetryPredicate>,
}

impl fmt::Debug for RetryController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryController")
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

impl RetryController {
    pub fn new(predicate: Option<RetryPredicate>) -> Self {
        Self { predicate }
    }

    pub fn disabled() -> Self {
        Self { predicate: None }
    }

    /// Returns true when the caller should replay the request. A positive
    /// answer means the transport has already been rotated.
    pub fn should_retry(
        &self,
        status: u16,
        state: &mut RetryState,
        transport: &TransportManager,
    ) -> bool {
        if state.retried {
            return false;
        }
        let Some(predicate) = &self.predicate else {
            return false;
        };
        if !predicate(status) {
            return false;
        }
        match transport.rotate() {
            Ok(generation) => {
                log::info!(
                    "status {status} is retryable; rotated transport to generation {generation}"
                );
                state.retried = true;
                true
            }
            Err(err) => {
                log::warn!("transport rotation after status {status} failed: {err}");
                false
            }
        }
    }
}
