use log::{info, trace};
use pcap::{Active, Capture, Linktype};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::aggregator::Aggregator;
use crate::config::MonitorConfig;
use crate::error::CaptureError;

/// DLT_IEEE802_11_RADIO
pub const LINKTYPE_RADIOTAP: Linktype = Linktype(127);

/// What the capture loop does after a `next_packet` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    /// Poll timeout, keep reading.
    Continue,
    /// Source exhausted, end without error.
    Finish,
    /// Terminal failure, report upward.
    Fail,
}

pub fn loop_action(err: &pcap::Error) -> LoopAction {
    match err {
        pcap::Error::TimeoutExpired => LoopAction::Continue,
        pcap::Error::NoMorePackets => LoopAction::Finish,
        _ => LoopAction::Fail,
    }
}

/// Opens a live, radiotap-framed capture on the configured interface.
pub fn open(config: &MonitorConfig) -> Result<Capture<Active>, CaptureError> {
    let cap = Capture::from_device(config.interface.as_str())?
        .promisc(config.promisc)
        .snaplen(config.snaplen)
        .timeout(config.timeout_ms)
        .open()?;

    let linktype = cap.get_datalink();
    if linktype != LINKTYPE_RADIOTAP {
        return Err(CaptureError::LinkType {
            interface: config.interface.clone(),
            linktype: linktype.0,
        });
    }

    info!("capturing on {} (snaplen {}, promisc {})", config.interface, config.snaplen, config.promisc);
    Ok(cap)
}

/// Feeds every captured frame to `aggregator` until `stop` is set, the
/// source runs dry, or a terminal error occurs. Returns the frame count.
pub fn run(
    cap: &mut Capture<Active>,
    aggregator: &mut Aggregator,
    stop: &AtomicBool,
) -> Result<u64, CaptureError> {
    let mut delivered = 0u64;

    while !stop.load(Ordering::Relaxed) {
        match cap.next_packet() {
            Ok(packet) => {
                delivered += 1;
                if let Ok(kind) = aggregator.handle_frame(packet.data) {
                    trace!("frame {}: {:?}", delivered, kind);
                }
            }
            Err(e) => match loop_action(&e) {
                LoopAction::Continue => continue,
                LoopAction::Finish => break,
                LoopAction::Fail => return Err(e.into()),
            },
        }
    }

    info!("capture finished after {} frames", delivered);
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_action() {
        assert_eq!(loop_action(&pcap::Error::TimeoutExpired), LoopAction::Continue);
        assert_eq!(loop_action(&pcap::Error::NoMorePackets), LoopAction::Finish);
        assert_eq!(
            loop_action(&pcap::Error::PcapError("device gone".into())),
            LoopAction::Fail
        );
    }
}
