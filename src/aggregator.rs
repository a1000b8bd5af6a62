//! Per-frame pipeline: radiotap, classification, registry updates.
//!
//! The [`Aggregator`] is the single writer and lives on the capture thread.
//! Readers hold a [`MonitorHandle`] and only ever get copies, taken under the
//! same lock that guards both registries.

use log::trace;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::DecodeError;
use crate::history::SignalHistory;
use crate::mac::MacAddr;
use crate::parser::{classify, ClassifiedFrame, FrameKind};
use crate::radiotap::parse_radiotap;
use crate::registry::{ApRecord, ApRegistry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub frames: u64,
    pub dropped: u64,
    pub beacons: u64,
    pub probe_responses: u64,
    pub data: u64,
    pub other: u64,
}

#[derive(Debug, Default)]
struct MonitorState {
    aps: ApRegistry,
    history: SignalHistory,
    stats: IngestStats,
}

fn lock(state: &Mutex<MonitorState>) -> MutexGuard<'_, MonitorState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct Aggregator {
    state: Arc<Mutex<MonitorState>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view for the presentation side.
    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Decodes one captured frame and applies it to the registries.
    ///
    /// On `Err` the frame was dropped and no registry was touched.
    pub fn handle_frame(&mut self, raw: &[u8]) -> Result<FrameKind, DecodeError> {
        let decoded = parse_radiotap(raw).and_then(|rtap| {
            let frame = classify(&raw[rtap.payload_offset..])?;
            Ok((frame, rtap.signal_dbm))
        });

        let mut state = lock(&self.state);
        state.stats.frames += 1;

        let (frame, signal) = match decoded {
            Ok(decoded) => decoded,
            Err(e) => {
                state.stats.dropped += 1;
                trace!("dropped frame of {} bytes: {}", raw.len(), e);
                return Err(e);
            }
        };

        let kind = frame.kind();
        let MonitorState {
            aps,
            history,
            stats,
        } = &mut *state;

        match frame {
            ClassifiedFrame::Beacon {
                bssid,
                transmitter,
                ssid,
            } => {
                stats.beacons += 1;
                aps.on_beacon(bssid, ssid.as_deref(), signal);
                history.append(transmitter, signal);
            }
            ClassifiedFrame::ProbeResponse {
                bssid,
                transmitter,
                ssid,
            } => {
                stats.probe_responses += 1;
                aps.on_probe_response(bssid, ssid.as_deref(), signal);
                history.append(transmitter, signal);
            }
            ClassifiedFrame::Data {
                destination,
                source,
            } => {
                stats.data += 1;
                aps.on_data(destination, signal);
                aps.on_data(source, signal);
                history.append(source, signal);
            }
            ClassifiedFrame::Other => stats.other += 1,
        }

        Ok(kind)
    }
}

/// Cloneable reader over the aggregator's state.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    state: Arc<Mutex<MonitorState>>,
}

impl MonitorHandle {
    /// Every access point record, ascending by address.
    pub fn snapshot(&self) -> Vec<(MacAddr, ApRecord)> {
        lock(&self.state).aps.snapshot()
    }

    pub fn record(&self, address: &MacAddr) -> Option<ApRecord> {
        lock(&self.state).aps.get(address).cloned()
    }

    pub fn query(&self, address: &MacAddr) -> Vec<i32> {
        lock(&self.state).history.query(address)
    }

    pub fn range(&self, address: &MacAddr) -> Option<(i32, i32)> {
        lock(&self.state).history.range(address)
    }

    /// Addresses that have at least one signal sample.
    pub fn addresses(&self) -> Vec<MacAddr> {
        lock(&self.state).history.addresses()
    }

    pub fn stats(&self) -> IngestStats {
        lock(&self.state).stats
    }
}
