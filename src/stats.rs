use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a tower, as it appears in the second CSV column.
pub type TowerId = String;

/// Accumulated statistics per tower.
pub type TowerMap = HashMap<TowerId, TowerStats>;

/// Running RSSI sum and sample count for one tower.
///
/// Entries are created lazily when the first matching row is seen, so any
/// value stored in a [`TowerMap`] has `sample_count >= 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TowerStats {
    pub sum_signal: f64,
    pub sample_count: u64,
}

impl TowerStats {
    pub fn add_reading(&mut self, reading: f64) {
        self.sum_signal += reading;
        self.sample_count += 1;
    }

    /// Folds another accumulator for the same tower into this one.
    pub fn absorb(&mut self, other: &TowerStats) {
        self.sum_signal += other.sum_signal;
        self.sample_count += other.sample_count;
    }

    /// Mean reading, or `None` if nothing has been folded in yet.
    pub fn average(&self) -> Option<f64> {
        if self.sample_count == 0 {
            None
        } else {
            Some(self.sum_signal / self.sample_count as f64)
        }
    }
}

/// URL of one remotely hosted CSV resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ResourceLocator(String);

impl ResourceLocator {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
