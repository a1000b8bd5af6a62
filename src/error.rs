//! Error types for the signal monitor

use thiserror::Error;

/// Why a captured frame was dropped. Never fatal: the frame is skipped and
/// ingestion continues with the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("radiotap header too short: {len} bytes")]
    RadiotapTooShort { len: usize },

    #[error("radiotap header length {header_len} exceeds captured {available} bytes")]
    RadiotapLength { header_len: usize, available: usize },

    #[error("radiotap field at offset {offset} lies outside header of {header_len} bytes")]
    RadiotapFieldOutOfBounds { offset: usize, header_len: usize },

    #[error("{kind} frame needs {needed} bytes, got {available}")]
    FrameTooShort {
        kind: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("SSID element declares {len} bytes, field holds at most 32")]
    SsidTooLong { len: usize },

    #[error("SSID element declares {len} bytes, only {available} remain")]
    SsidOverrun { len: usize, available: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("address '{input}' has {found} octets, expected 6")]
    OctetCount { input: String, found: usize },

    #[error("address '{input}' has invalid octet '{octet}'")]
    Octet { input: String, octet: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing capture interface")]
    MissingInterface,

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("invalid target address: {0}")]
    Target(#[from] AddressParseError),

    #[error("refresh interval must be greater than zero")]
    ZeroRefresh,
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("pcap error: {0}")]
    Pcap(#[from] pcap::Error),

    #[error("interface {interface} delivers link type {linktype}, expected radiotap (127)")]
    LinkType { interface: String, linktype: i32 },
}

/// Crate-level error for the binary and fallible setup paths
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
