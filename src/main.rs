use log::{error, info, warn};
use std::env;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use signal_strength::config::{usage, MonitorConfig};
use signal_strength::display::{display_error, log_snapshot, refresh};
use signal_strength::{capture, Aggregator};

#[cfg(unix)]
extern crate libc;

fn check_root_privileges() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let config = match MonitorConfig::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            display_error(&e.to_string());
            eprintln!("{}", usage());
            process::exit(1);
        }
    };

    if !check_root_privileges() {
        warn!("not running as root, opening {} may fail", config.interface);
    }

    let mut cap = match capture::open(&config) {
        Ok(cap) => cap,
        Err(e) => {
            error!("failed to open {}: {}", config.interface, e);
            process::exit(1);
        }
    };

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || {
        handler_stop.store(true, Ordering::Relaxed);
    }) {
        warn!("failed to install Ctrl+C handler: {}", e);
    }

    let mut aggregator = Aggregator::new();
    let handle = aggregator.handle();

    let capture_stop = Arc::clone(&stop);
    let mut capture_task = tokio::task::spawn_blocking(move || {
        capture::run(&mut cap, &mut aggregator, &capture_stop)
    });

    info!("pcap loop started, refreshing every {:?}", config.refresh);
    let mut ticker = tokio::time::interval(config.refresh);
    let outcome = loop {
        tokio::select! {
            _ = ticker.tick() => {
                refresh(&handle, config.target.as_ref());
                if let Some(path) = &config.log_path {
                    if let Err(e) = log_snapshot(path, &handle) {
                        warn!("failed to log snapshot to {}: {}", path.display(), e);
                    }
                }
            }
            joined = &mut capture_task => break joined,
        }
    };

    // Last consistent state stays visible after capture ends.
    refresh(&handle, config.target.as_ref());

    match outcome {
        Ok(Ok(frames)) => info!("stopped after {} frames", frames),
        Ok(Err(e)) => {
            error!("capture ended: {}", e);
            process::exit(1);
        }
        Err(e) => {
            error!("capture thread failed: {}", e);
            process::exit(1);
        }
    }
}
