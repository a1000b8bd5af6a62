use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::mac::MacAddr;
use crate::radiotap::SIGNAL_UNKNOWN;

/// Aggregated statistics for one transmitter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApRecord {
    pub beacon_count: u64,
    pub data_count: u64,
    /// Reserved, always empty.
    pub encryption: String,
    pub ssid: Option<String>,
    /// Last known signal in dBm, 0 when never reported.
    pub last_signal_dbm: i32,
}

impl ApRecord {
    fn refresh_signal(&mut self, signal_dbm: i32) {
        if signal_dbm != SIGNAL_UNKNOWN {
            self.last_signal_dbm = signal_dbm;
        }
    }
}

/// Address-keyed store of per-transmitter statistics. Records are never removed.
#[derive(Debug, Clone, Default)]
pub struct ApRegistry {
    records: BTreeMap<MacAddr, ApRecord>,
}

impl ApRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a beacon. The SSID is only recorded when the record is created.
    pub fn on_beacon(&mut self, bssid: MacAddr, ssid: Option<&str>, signal_dbm: i32) {
        match self.records.get_mut(&bssid) {
            Some(record) => {
                record.beacon_count = record.beacon_count.saturating_add(1);
                record.refresh_signal(signal_dbm);
            }
            None => {
                debug!("new access point {} ({})", bssid, ssid.unwrap_or("<hidden>"));
                self.records.insert(
                    bssid,
                    ApRecord {
                        beacon_count: 1,
                        ssid: ssid.map(str::to_string),
                        last_signal_dbm: signal_dbm,
                        ..ApRecord::default()
                    },
                );
            }
        }
    }

    /// Registers a probe responder without touching any counter.
    pub fn on_probe_response(&mut self, bssid: MacAddr, ssid: Option<&str>, signal_dbm: i32) {
        match self.records.get_mut(&bssid) {
            Some(record) => record.refresh_signal(signal_dbm),
            None => {
                debug!("new access point {} ({}) from probe response", bssid, ssid.unwrap_or("<hidden>"));
                self.records.insert(
                    bssid,
                    ApRecord {
                        ssid: ssid.map(str::to_string),
                        last_signal_dbm: signal_dbm,
                        ..ApRecord::default()
                    },
                );
            }
        }
    }

    /// Counts a data frame for one endpoint. Broadcast is never recorded.
    pub fn on_data(&mut self, address: MacAddr, signal_dbm: i32) {
        if address.is_broadcast() {
            return;
        }
        let record = self.records.entry(address).or_default();
        record.data_count = record.data_count.saturating_add(1);
        record.refresh_signal(signal_dbm);
    }

    pub fn get(&self, address: &MacAddr) -> Option<&ApRecord> {
        self.records.get(address)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Copy of every record in ascending address order.
    pub fn snapshot(&self) -> Vec<(MacAddr, ApRecord)> {
        self.records
            .iter()
            .map(|(addr, record)| (*addr, record.clone()))
            .collect()
    }
}
