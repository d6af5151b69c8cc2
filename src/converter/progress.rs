//! Completed/total bookkeeping for a conversion run.

/// Running count of finished jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressTracker {
    total: usize,
    completed: usize,
}

impl ProgressTracker {
    /// Start tracking a run of `total` jobs.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn remaining(&self) -> usize {
        self.total - self.completed
    }

    /// Count one finished job, successful or not. Saturates at `total`.
    pub fn record(&mut self) {
        if self.completed < self.total {
            self.completed += 1;
        } else {
            log::warn!("Progress already at {}/{}", self.completed, self.total);
        }
    }

    /// Percentage complete (0.0 - 100.0). Zero for an empty run.
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f32 / self.total as f32 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}
