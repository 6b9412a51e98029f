//! Progress reporting and cancellation.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Conversion stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Opening the document
    Reading,
    /// Reconstructing page layout
    Analyzing,
    /// Assembling and serializing the output
    Building,
    /// Finished
    Complete,
}

impl Stage {
    /// Lowercase stage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Reading => "reading",
            Stage::Analyzing => "analyzing",
            Stage::Building => "building",
            Stage::Complete => "complete",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A progress event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub stage: Stage,
    /// 0-100, never decreasing within one conversion
    pub percent: u8,
    pub message: String,
}

/// First percent of the analyzing band.
pub const ANALYZING_START: u8 = 15;
/// Last percent of the analyzing band.
pub const ANALYZING_END: u8 = 65;

/// Percent reported after `done` of `total` pages have been analyzed.
pub fn analyzing_percent(done: u32, total: u32) -> u8 {
    if total == 0 {
        return ANALYZING_END;
    }
    let band = (ANALYZING_END - ANALYZING_START) as u64;
    let step = band * done.min(total) as u64 / total as u64;
    ANALYZING_START + step as u8
}

/// Forwards progress to a callback, clamping percentages so they never
/// go backwards.
pub(crate) struct ProgressReporter<'a> {
    sink: &'a mut dyn FnMut(&Progress),
    last: u8,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn new(sink: &'a mut dyn FnMut(&Progress)) -> Self {
        Self { sink, last: 0 }
    }

    pub(crate) fn report(&mut self, stage: Stage, percent: u8, message: impl Into<String>) {
        let percent = percent.clamp(self.last, 100);
        self.last = percent;
        let progress = Progress {
            stage,
            percent,
            message: message.into(),
        };
        log::info!("[{}] {}% {}", progress.stage, progress.percent, progress.message);
        (self.sink)(&progress);
    }
}

/// Cooperative cancellation flag shared between a caller and a conversion.
///
/// The converter checks the flag before each page.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzing_percent_band() {
        assert_eq!(analyzing_percent(0, 4), 15);
        assert_eq!(analyzing_percent(2, 4), 40);
        assert_eq!(analyzing_percent(4, 4), 65);
        assert_eq!(analyzing_percent(0, 0), 65);
    }

    #[test]
    fn test_reporter_is_monotonic() {
        let mut seen = Vec::new();
        let mut sink = |p: &Progress| seen.push(p.percent);
        let mut reporter = ProgressReporter::new(&mut sink);
        reporter.report(Stage::Reading, 10, "a");
        reporter.report(Stage::Analyzing, 5, "b");
        reporter.report(Stage::Complete, 120, "c");
        drop(reporter);
        assert_eq!(seen, vec![10, 10, 100]);
    }

    #[test]
    fn test_stage_serde_lowercase() {
        let json = serde_json::to_string(&Stage::Analyzing).unwrap();
        assert_eq!(json, "\"analyzing\"");
        assert_eq!(Stage::Complete.to_string(), "complete");
    }

    #[test]
    fn test_cancellation_token_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
