//! Temporal smoother - running mean over the most recent raw scores
//!
//! Per-frame scores jitter with detector noise. The displayed score is
//! the mean of a short FIFO window; the oldest score is evicted once the
//! window is full.

use std::collections::VecDeque;

use crate::{unit_score, MissPolicy, SmoothingConfig};

/// Bounded history of raw similarity scores for one comparison session
#[derive(Debug, Clone)]
pub struct SimilarityHistory {
    window: VecDeque<f32>,
    capacity: usize,
    miss_policy: MissPolicy,
}

impl SimilarityHistory {
    /// Create a history with the default window (3 scores, skip on miss)
    pub fn new() -> Self {
        Self::with_config(&SmoothingConfig::default())
    }

    pub fn with_config(config: &SmoothingConfig) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity + 1),
            capacity,
            miss_policy: config.miss_policy,
        }
    }

    /// Append a raw score, evicting the oldest when over capacity
    ///
    /// Scores are clamped to [0, 1]; a non-finite score counts as 0.
    pub fn push(&mut self, score: f32) {
        self.window.push_back(unit_score(score));
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }
    }

    /// Apply the miss policy for a step with no comparable pose
    pub fn record_miss(&mut self) {
        match self.miss_policy {
            MissPolicy::Skip => {}
            MissPolicy::Reset => self.window.clear(),
        }
    }

    /// Mean of the window, 0 when empty
    pub fn current(&self) -> f32 {
        if self.window.is_empty() {
            return 0.0;
        }
        let mean = self.window.iter().sum::<f32>() / self.window.len() as f32;
        mean.clamp(0.0, 1.0)
    }

    pub fn clear(&mut self) {
        self.window.clear();
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn miss_policy(&self) -> MissPolicy {
        self.miss_policy
    }

    /// Scores oldest first
    pub fn scores(&self) -> impl Iterator<Item = f32> + '_ {
        self.window.iter().copied()
    }
}

impl Default for SimilarityHistory {
    fn default() -> Self {
        Self::new()
    }
}
