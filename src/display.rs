use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::aggregator::{IngestStats, MonitorHandle};
use crate::error::Result;
use crate::mac::MacAddr;
use crate::registry::ApRecord;

#[derive(Serialize)]
struct SnapshotLine<'a> {
    timestamp: u64,
    stats: IngestStats,
    access_points: Vec<SnapshotEntry<'a>>,
}

#[derive(Serialize)]
struct SnapshotEntry<'a> {
    bssid: MacAddr,
    #[serde(flatten)]
    record: &'a ApRecord,
}

pub fn render_table(snapshot: &[(MacAddr, ApRecord)], stats: &IngestStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<17}  {:>7}  {:>4}  {:>5}  {:<4}  {}",
        "BSSID", "Beacons", "PWR", "#Data", "ENC", "ESSID"
    );
    let _ = writeln!(out);
    for (bssid, ap) in snapshot {
        let _ = writeln!(
            out,
            "{:<17}  {:>7}  {:>4}  {:>5}  {:<4}  {}",
            bssid,
            ap.beacon_count,
            ap.last_signal_dbm,
            ap.data_count,
            ap.encryption,
            ap.ssid.as_deref().unwrap_or("")
        );
    }
    let _ = writeln!(
        out,
        "\nframes {}  dropped {}  beacons {}  probe-resp {}  data {}  other {}",
        stats.frames, stats.dropped, stats.beacons, stats.probe_responses, stats.data, stats.other
    );
    out
}

pub fn render_addresses(addresses: &[MacAddr]) -> String {
    let list: Vec<String> = addresses.iter().map(MacAddr::to_string).collect();
    format!("Tracked: {}", list.join(" "))
}

pub fn render_history(target: &MacAddr, samples: &[i32], range: Option<(i32, i32)>) -> String {
    match range {
        Some((min, max)) => {
            let list: Vec<String> = samples.iter().map(i32::to_string).collect();
            format!(
                "Signal PWR(dBm) {}: {} samples, min {} max {}\n{}",
                target,
                samples.len(),
                min,
                max,
                list.join(" ")
            )
        }
        None => format!("Signal PWR(dBm) {}: no samples yet", target),
    }
}

/// Clears the terminal and prints the current state.
pub fn refresh(handle: &MonitorHandle, target: Option<&MacAddr>) {
    let snapshot = handle.snapshot();
    let stats = handle.stats();

    print!("\x1B[2J\x1B[H");
    println!("{}", render_table(&snapshot, &stats));
    println!("{}", render_addresses(&handle.addresses()));
    if let Some(target) = target {
        println!("{}", render_history(target, &handle.query(target), handle.range(target)));
    }
}

/// Appends the current snapshot to `path` as one JSON line.
pub fn log_snapshot(path: &Path, handle: &MonitorHandle) -> Result<()> {
    let snapshot = handle.snapshot();
    let line = SnapshotLine {
        timestamp: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
        stats: handle.stats(),
        access_points: snapshot
            .iter()
            .map(|(bssid, record)| SnapshotEntry {
                bssid: *bssid,
                record,
            })
            .collect(),
    };

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    serde_json::to_writer(&mut file, &line)?;
    writeln!(file)?;
    Ok(())
}

pub fn display_error(message: &str) {
    eprintln!("Error: {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_row() {
        let record = ApRecord {
            beacon_count: 3,
            data_count: 7,
            ssid: Some("net1".to_string()),
            last_signal_dbm: -48,
            ..ApRecord::default()
        };
        let table = render_table(&[(MacAddr([0xaa; 6]), record)], &IngestStats::default());
        let row = table.lines().find(|l| l.starts_with("aa:aa")).unwrap();
        assert!(row.contains("-48"));
        assert!(row.ends_with("net1"));
        assert!(table.starts_with("BSSID"));
    }

    #[test]
    fn test_history_without_samples() {
        let text = render_history(&MacAddr::ZERO, &[], None);
        assert!(text.ends_with("no samples yet"));

        let text = render_history(&MacAddr::ZERO, &[-50, -60], Some((-60, -50)));
        assert!(text.contains("min -60 max -50"));
        assert!(text.ends_with("-50 -60"));
    }
}
