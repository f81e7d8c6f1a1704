//! Progress reporting utilities using indicatif.
//!
//! The pipeline reports its hashing phases through the [`ProgressCallback`]
//! trait rather than touching any process-global UI state; [`Progress`]
//! renders the callbacks as terminal progress bars and [`NoopProgress`]
//! swallows them for tests and quiet runs.

use std::sync::Mutex;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress callback for the duplicate detection pipeline.
///
/// Implement this trait to receive progress updates from the hashing
/// phases ("chunk-hash" and "full-hash").
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts, with the number of files it will hash.
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called per file processed, with a 1-based counter and the path.
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Progress callback that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_phase_start(&self, _phase: &str, _total: usize) {}
    fn on_progress(&self, _current: usize, _path: &str) {}
    fn on_phase_end(&self, _phase: &str) {}
}

/// Progress reporter using indicatif.
///
/// Manages one bar per hashing phase under a shared [`MultiProgress`] so
/// the bars coexist with log lines on stderr.
pub struct Progress {
    multi: MultiProgress,
    chunk_hash: Mutex<Option<ProgressBar>>,
    full_hash: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// With `quiet` set, no bars are displayed.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            chunk_hash: Mutex::new(None),
            full_hash: Mutex::new(None),
            quiet,
        }
    }

    fn bar_style(template: &str) -> ProgressStyle {
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█>-")
    }

    fn slot(&self, phase: &str) -> Option<&Mutex<Option<ProgressBar>>> {
        match phase {
            "chunk-hash" => Some(&self.chunk_hash),
            "full-hash" => Some(&self.full_hash),
            _ => None,
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }
        let Some(slot) = self.slot(phase) else {
            return;
        };

        let pb = self.multi.add(ProgressBar::new(total as u64));
        let (template, message) = if phase == "chunk-hash" {
            (
                "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
                "Prefix hashing",
            )
        } else {
            (
                "[{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} ({percent}%) {msg}",
                "Full hashing",
            )
        };
        pb.set_style(Self::bar_style(template));
        pb.set_message(message);
        *slot.lock().unwrap() = Some(pb);
    }

    fn on_progress(&self, _current: usize, _path: &str) {
        if self.quiet {
            return;
        }
        for slot in [&self.chunk_hash, &self.full_hash] {
            if let Some(pb) = slot.lock().unwrap().as_ref() {
                if !pb.is_finished() {
                    pb.inc(1);
                }
            }
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }
        let Some(slot) = self.slot(phase) else {
            return;
        };
        if let Some(pb) = slot.lock().unwrap().take() {
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_progress_accepts_all_calls() {
        let progress = NoopProgress;
        progress.on_phase_start("chunk-hash", 10);
        progress.on_progress(1, "/a");
        progress.on_phase_end("chunk-hash");
    }

    #[test]
    fn test_progress_phase_lifecycle() {
        let progress = Progress::new(false);
        progress.on_phase_start("chunk-hash", 2);
        assert!(progress.chunk_hash.lock().unwrap().is_some());

        progress.on_progress(1, "/a");
        progress.on_progress(2, "/b");
        progress.on_phase_end("chunk-hash");
        assert!(progress.chunk_hash.lock().unwrap().is_none());
    }

    #[test]
    fn test_progress_quiet_creates_no_bars() {
        let progress = Progress::new(true);
        progress.on_phase_start("full-hash", 5);
        assert!(progress.full_hash.lock().unwrap().is_none());
    }

    #[test]
    fn test_unknown_phase_ignored() {
        let progress = Progress::new(false);
        progress.on_phase_start("walking", 5);
        progress.on_phase_end("walking");
        assert!(progress.chunk_hash.lock().unwrap().is_none());
        assert!(progress.full_hash.lock().unwrap().is_none());
    }
}
