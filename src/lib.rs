//! # signal-strength
//!
//! Decodes radiotap-wrapped 802.11 frames from a monitor-mode capture and
//! keeps per-transmitter statistics plus a signal-strength history per
//! address.
//!
//! [`Aggregator::handle_frame`] is the only entry point on the ingestion
//! side; presentation reads through a [`MonitorHandle`].

pub mod aggregator;
pub mod capture;
pub mod config;
pub mod display;
pub mod error;
pub mod history;
pub mod mac;
pub mod parser;
pub mod radiotap;
pub mod registry;

pub use aggregator::{Aggregator, IngestStats, MonitorHandle};
pub use config::MonitorConfig;
pub use error::{DecodeError, Error, Result};
pub use history::SignalHistory;
pub use mac::MacAddr;
pub use parser::{classify, ClassifiedFrame, FrameKind};
pub use radiotap::{parse_radiotap, RadiotapInfo};
pub use registry::{ApRecord, ApRegistry};
