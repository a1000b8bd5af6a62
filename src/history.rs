use std::collections::BTreeMap;

use crate::mac::MacAddr;
use crate::radiotap::SIGNAL_UNKNOWN;

/// Per-address signal samples in arrival order.
///
/// Sequences grow without bound; nothing is ever evicted.
#[derive(Debug, Clone, Default)]
pub struct SignalHistory {
    samples: BTreeMap<MacAddr, Vec<i32>>,
}

impl SignalHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample. Unknown (0) samples are dropped.
    pub fn append(&mut self, address: MacAddr, signal_dbm: i32) {
        if signal_dbm == SIGNAL_UNKNOWN {
            return;
        }
        self.samples.entry(address).or_default().push(signal_dbm);
    }

    /// Copy of the samples for `address`, empty if never seen.
    pub fn query(&self, address: &MacAddr) -> Vec<i32> {
        self.samples.get(address).cloned().unwrap_or_default()
    }

    pub fn addresses(&self) -> Vec<MacAddr> {
        self.samples.keys().copied().collect()
    }

    /// Weakest and strongest sample seen for `address`.
    pub fn range(&self, address: &MacAddr) -> Option<(i32, i32)> {
        let samples = self.samples.get(address)?;
        let min = samples.iter().copied().min()?;
        let max = samples.iter().copied().max()?;
        Some((min, max))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
