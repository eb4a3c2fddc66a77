//! Leak event detection
//!
//! Every sample with a nonzero leak amount becomes a leak event. Events
//! keep series order, so the most recent event is always last.

use crate::models::{LeakEvent, SeriesStore};

/// Number of latest leaks shown as alerts
pub const DEFAULT_RECENT_LEAKS: usize = 3;

/// Scans a series for nonzero leak amounts
#[derive(Debug, Clone, Copy, Default)]
pub struct LeakDetector;

impl LeakDetector {
    pub fn new() -> Self {
        Self
    }

    /// All leak events in chronological order
    pub fn detect(&self, series: &SeriesStore) -> Vec<LeakEvent> {
        series
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_leak())
            .map(|(index, s)| LeakEvent {
                index,
                timestamp: s.timestamp(),
                extra_usage: s.leak(),
            })
            .collect()
    }

    /// The last `n` leak events, most recent last
    pub fn recent(&self, series: &SeriesStore, n: usize) -> Vec<LeakEvent> {
        let mut events = self.detect(series);
        let start = events.len().saturating_sub(n);
        events.split_off(start)
    }

    /// Total liters lost across all leak events
    pub fn total_loss(&self, series: &SeriesStore) -> f64 {
        self.detect(series).iter().map(|e| e.extra_usage).sum()
    }
}
