use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::mac::MacAddr;

/// Snapshot log path, when set.
pub const LOG_PATH_ENV: &str = "SIGNAL_STRENGTH_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub interface: String,
    pub snaplen: i32,
    pub promisc: bool,
    pub timeout_ms: i32,
    pub refresh: Duration,
    /// Address whose signal history is printed every refresh.
    pub target: Option<MacAddr>,
    pub log_path: Option<PathBuf>,
}

impl MonitorConfig {
    pub fn new(interface: &str) -> Self {
        MonitorConfig {
            interface: interface.to_string(),
            snaplen: 8192,
            promisc: true,
            timeout_ms: 1000,
            refresh: Duration::from_secs(1),
            target: None,
            log_path: None,
        }
    }

    /// Builds the config from `<interface> [mac]`, program name excluded.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let interface = args.next().ok_or(ConfigError::MissingInterface)?;
        let mut config = MonitorConfig::new(interface.as_ref());

        if let Some(mac) = args.next() {
            config.target = Some(mac.as_ref().parse()?);
        }
        if let Some(extra) = args.next() {
            return Err(ConfigError::UnexpectedArgument(extra.as_ref().to_string()));
        }

        config.log_path = std::env::var_os(LOG_PATH_ENV).map(PathBuf::from);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interface.is_empty() {
            return Err(ConfigError::MissingInterface);
        }
        if self.refresh.is_zero() {
            return Err(ConfigError::ZeroRefresh);
        }
        Ok(())
    }
}

pub fn usage() -> &'static str {
    "syntax : signal-strength <interface> [mac]\n\
     sample : signal-strength mon0 00:11:22:33:44:55\n\
     sample : signal-strength mon0"
}
