use super::tokens::Token;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result returned by observers; failures are logged by the compressor and
/// otherwise ignored.
pub type ObserverResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Snapshot handed to a [`ProgressObserver`] after each emitted token
#[derive(Debug)]
pub struct Progress<'a, S> {
    /// The first `cursor` symbols, i.e. everything the tokens so far rebuild
    pub reconstructed: &'a [S],
    pub tokens: &'a [Token<S>],
    /// Length of the whole input stream
    pub total: usize,
}

impl<S> Progress<'_, S> {
    /// Fraction of the input covered so far (1.0 for empty input)
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.reconstructed.len() as f64 / self.total as f64
        }
    }
}

/// Receives incremental compression state
pub trait ProgressObserver<S> {
    fn on_progress(&mut self, progress: &Progress<'_, S>) -> ObserverResult;
}

/// Observer that ignores every update
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl<S> ProgressObserver<S> for NoProgress {
    fn on_progress(&mut self, _progress: &Progress<'_, S>) -> ObserverResult {
        Ok(())
    }
}

/// Adapter turning a closure into a [`ProgressObserver`], see [`observer_fn`]
pub struct FnObserver<F>(F);

/// Wrap a closure as an observer
pub fn observer_fn<S, F>(f: F) -> FnObserver<F>
where
    F: FnMut(&Progress<'_, S>) -> ObserverResult,
{
    FnObserver(f)
}

impl<S, F> ProgressObserver<S> for FnObserver<F>
where
    F: FnMut(&Progress<'_, S>) -> ObserverResult,
{
    fn on_progress(&mut self, progress: &Progress<'_, S>) -> ObserverResult {
        (self.0)(progress)
    }
}

/// Shared flag used to stop a compression run between tokens
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
