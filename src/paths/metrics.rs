//! Path resolution counters.
//!
//! Every resolution attempt ends in exactly one terminal outcome, so
//! `attempts` always equals the sum of the outcome counters once recording
//! threads are quiescent. Counters use relaxed atomics and never feed back into
//! resolution.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::resolver::SkipReason;

/// Terminal outcome of one resolution attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionOutcome {
    FastPathHit,
    CompiledHit,
    LegacyHit,
    /// No tier produced a path; carries the fast path's skip reason.
    Skipped(SkipReason),
}

/// Live counters, shared by reference.
#[derive(Debug, Default)]
pub struct PathMetrics {
    attempts: AtomicU64,
    fast_path_hits: AtomicU64,
    compiled_hits: AtomicU64,
    legacy_hits: AtomicU64,
    skipped_no_services: AtomicU64,
    skipped_not_slider: AtomicU64,
    skipped_ray_miss: AtomicU64,
    skipped_reconstruction: AtomicU64,
}

impl PathMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one attempt and its outcome.
    pub fn record(&self, outcome: ResolutionOutcome) {
        let counter = match outcome {
            ResolutionOutcome::FastPathHit => &self.fast_path_hits,
            ResolutionOutcome::CompiledHit => &self.compiled_hits,
            ResolutionOutcome::LegacyHit => &self.legacy_hits,
            ResolutionOutcome::Skipped(SkipReason::NoServices) => &self.skipped_no_services,
            ResolutionOutcome::Skipped(SkipReason::NotSlider) => &self.skipped_not_slider,
            ResolutionOutcome::Skipped(SkipReason::RayMiss) => &self.skipped_ray_miss,
            ResolutionOutcome::Skipped(SkipReason::ReconstructionFailure) => &self.skipped_reconstruction,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counts.
    #[must_use]
    pub fn snapshot(&self) -> PathMetricsSnapshot {
        PathMetricsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            fast_path_hits: self.fast_path_hits.load(Ordering::Relaxed),
            compiled_hits: self.compiled_hits.load(Ordering::Relaxed),
            legacy_hits: self.legacy_hits.load(Ordering::Relaxed),
            skipped_no_services: self.skipped_no_services.load(Ordering::Relaxed),
            skipped_not_slider: self.skipped_not_slider.load(Ordering::Relaxed),
            skipped_ray_miss: self.skipped_ray_miss.load(Ordering::Relaxed),
            skipped_reconstruction: self.skipped_reconstruction.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.attempts,
            &self.fast_path_hits,
            &self.compiled_hits,
            &self.legacy_hits,
            &self.skipped_no_services,
            &self.skipped_not_slider,
            &self.skipped_ray_miss,
            &self.skipped_reconstruction,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time copy of [`PathMetrics`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMetricsSnapshot {
    pub attempts: u64,
    pub fast_path_hits: u64,
    pub compiled_hits: u64,
    pub legacy_hits: u64,
    pub skipped_no_services: u64,
    pub skipped_not_slider: u64,
    pub skipped_ray_miss: u64,
    pub skipped_reconstruction: u64,
}

impl PathMetricsSnapshot {
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.fast_path_hits + self.compiled_hits + self.legacy_hits
    }

    #[must_use]
    pub fn skips(&self) -> u64 {
        self.skipped_no_services + self.skipped_not_slider + self.skipped_ray_miss + self.skipped_reconstruction
    }

    /// `attempts == hits + skips`.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.attempts == self.hits() + self.skips()
    }

    /// Fraction of attempts answered by the fast path.
    #[must_use]
    pub fn fast_path_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.fast_path_hits as f64 / self.attempts as f64
        }
    }
}
