// src/progress.rs
//! Progress reporting for long listings.
//!
//! Observers are told `(items_processed, total)` after every page or
//! message. They must not fail and cannot influence the fetch.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Receives progress updates for one kind of item (`photo`, `post`, `message`).
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, unit: &str, processed: u64, total: u64);
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {
    fn on_progress(&self, _unit: &str, _processed: u64, _total: u64) {}
}

/// Terminal progress bars, one per unit while a listing is in flight.
pub struct ProgressBars {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl ProgressBars {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn create_bar(&self, unit: &str, total: u64) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new(total));
        let style = ProgressStyle::default_bar()
            .template("{msg:>8} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message(format!("{}s", unit));
        pb
    }
}

impl Default for ProgressBars {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ProgressBars {
    fn on_progress(&self, unit: &str, processed: u64, total: u64) {
        let mut bars = self.bars.lock();
        let bar = bars
            .entry(unit.to_string())
            .or_insert_with(|| self.create_bar(unit, total));
        bar.set_length(total);
        bar.set_position(processed);

        if processed >= total {
            bar.finish();
            bars.remove(unit);
        }
    }
}
