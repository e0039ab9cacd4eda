//! Progress reporting and cooperative cancellation for an export.

use crate::error::ExportError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives progress updates while an export runs. Reports never influence
/// the export itself.
pub trait ProgressObserver {
    /// `percent` is in `0..=100`; `phase` names the running stage
    fn report(&self, percent: u8, phase: &str);
}

impl<F> ProgressObserver for F
where
    F: Fn(u8, &str),
{
    fn report(&self, percent: u8, phase: &str) {
        self(percent, phase)
    }
}

/// Forwards progress to the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn report(&self, percent: u8, phase: &str) {
        log::info!("{percent:>3}% {phase}");
    }
}

/// Ignores every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn report(&self, _percent: u8, _phase: &str) {}
}

/// Maps a stage's own 0–100 onto a slice of the overall progress
pub(crate) struct ProgressRange<'a> {
    pub observer: &'a dyn ProgressObserver,
    pub start: u8,
    pub end: u8,
}

impl ProgressObserver for ProgressRange<'_> {
    fn report(&self, percent: u8, phase: &str) {
        let span = self.end.saturating_sub(self.start) as u32;
        let mapped = self.start as u32 + span * percent.min(100) as u32 / 100;
        self.observer.report(mapped as u8, phase);
    }
}

/// Shared flag to abort a running export from another thread
#[derive(Debug, Default, Clone)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once [`cancel`](CancellationToken::cancel) was called
    pub fn check(&self) -> Result<(), ExportError> {
        if self.is_cancelled() {
            Err(ExportError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn closures_observe_progress() {
        let seen = RefCell::new(Vec::new());
        let observer = |percent: u8, phase: &str| seen.borrow_mut().push((percent, phase.to_string()));
        observer.report(40, "layout");
        assert_eq!(seen.borrow().as_slice(), &[(40, "layout".to_string())]);
    }

    #[test]
    fn ranges_map_into_their_slice() {
        let seen = RefCell::new(Vec::new());
        let observer = |percent: u8, _: &str| seen.borrow_mut().push(percent);
        let range = ProgressRange {
            observer: &observer,
            start: 10,
            end: 60,
        };
        range.report(0, "layout");
        range.report(50, "layout");
        range.report(100, "layout");
        assert_eq!(seen.borrow().as_slice(), &[10, 35, 60]);
    }

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let handle = token.clone();
        assert!(token.check().is_ok());
        handle.cancel();
        assert!(matches!(token.check(), Err(ExportError::Cancelled)));
    }
}
