use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// One progress observation: how many molecules are done, whether the
/// run has entered its persistence phase, and the soft-error messages
/// accumulated so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub processed: usize,
    pub total: usize,
    pub saving: bool,
    pub messages: Vec<String>,
}

pub type ProgressCallback<'a> = Box<dyn Fn(ProgressSnapshot) + Send + Sync + 'a>;

/// Best-effort synchronous progress push. Snapshots are delivered in
/// the order generated; a panicking listener is contained and logged so
/// observation can never abort generation.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn report(&self, snapshot: ProgressSnapshot) {
        if let Some(cb) = &self.callback
            && catch_unwind(AssertUnwindSafe(|| cb(snapshot))).is_err()
        {
            warn!("progress listener panicked; continuing");
        }
    }
}

/// Cooperative cancellation flag, polled once per molecule.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn snapshots_reach_the_listener_in_order() {
        let seen: Mutex<Vec<usize>> = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|s: ProgressSnapshot| {
            seen.lock().unwrap().push(s.processed);
        }));
        for processed in 0..3 {
            reporter.report(ProgressSnapshot {
                processed,
                total: 3,
                ..Default::default()
            });
        }
        drop(reporter);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn panicking_listener_does_not_abort() {
        let reporter = ProgressReporter::with_callback(Box::new(|_| panic!("listener bug")));
        reporter.report(ProgressSnapshot::default());
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
