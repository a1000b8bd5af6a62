//! 802.11 MAC frame classification
//!
//! Only the fields the aggregator consumes are decoded: the frame control
//! byte, the addresses of management and data headers, and the SSID element
//! of beacons and probe responses. Data frames are always read with the
//! 2-address layout; QoS and 4-address variants are not distinguished.

use crate::error::DecodeError;
use crate::mac::MacAddr;

pub const TYPE_MANAGEMENT: u8 = 0b00;
pub const TYPE_CONTROL: u8 = 0b01;
pub const TYPE_DATA: u8 = 0b10;

pub const SUBTYPE_BEACON: u8 = 0b1000;
pub const SUBTYPE_PROBE_RESPONSE: u8 = 0b0101;
pub const SUBTYPE_NULL: u8 = 0b0100;
pub const SUBTYPE_QOS_NULL: u8 = 0b1100;

/// Frame control, duration, three addresses, sequence control.
pub const MGMT_HEADER_LEN: usize = 24;
/// Timestamp, beacon interval, capability info.
pub const FIXED_PARAMS_LEN: usize = 12;
/// Frame control, duration, two addresses.
pub const DATA_HEADER_LEN: usize = 16;

pub const TAG_SSID: u8 = 0;
pub const SSID_MAX_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Management,
    Control,
    Data,
    Extension,
}

impl From<u8> for FrameType {
    fn from(bits: u8) -> Self {
        match bits & 0b11 {
            TYPE_MANAGEMENT => FrameType::Management,
            TYPE_CONTROL => FrameType::Control,
            TYPE_DATA => FrameType::Data,
            _ => FrameType::Extension,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameControl {
    pub version: u8,
    pub frame_type: FrameType,
    pub subtype: u8,
    pub flags: u8,
}

impl FrameControl {
    pub fn from_bytes(frame_data: &[u8]) -> Result<Self, DecodeError> {
        if frame_data.len() < 2 {
            return Err(DecodeError::FrameTooShort {
                kind: "any",
                needed: 2,
                available: frame_data.len(),
            });
        }
        let fc = frame_data[0];
        Ok(FrameControl {
            version: fc & 0x03,
            frame_type: FrameType::from((fc & 0x0C) >> 2),
            subtype: (fc & 0xF0) >> 4,
            flags: frame_data[1],
        })
    }

    pub fn is_beacon(&self) -> bool {
        self.frame_type == FrameType::Management && self.subtype == SUBTYPE_BEACON
    }

    pub fn is_probe_response(&self) -> bool {
        self.frame_type == FrameType::Management && self.subtype == SUBTYPE_PROBE_RESPONSE
    }

    /// Data frames that carry a payload; null and QoS-null are excluded.
    pub fn is_data(&self) -> bool {
        self.frame_type == FrameType::Data
            && self.subtype != SUBTYPE_NULL
            && self.subtype != SUBTYPE_QOS_NULL
    }
}

/// Header shared by beacons and probe responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagementHeader {
    pub duration: u16,
    pub receiver: MacAddr,
    pub transmitter: MacAddr,
    pub bssid: MacAddr,
    pub sequence: u16,
    pub fragment: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedFrame {
    Beacon {
        bssid: MacAddr,
        transmitter: MacAddr,
        ssid: Option<String>,
    },
    ProbeResponse {
        bssid: MacAddr,
        transmitter: MacAddr,
        ssid: Option<String>,
    },
    Data {
        destination: MacAddr,
        source: MacAddr,
    },
    Other,
}

/// Payload-free tag of a classified frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Beacon,
    ProbeResponse,
    Data,
    Other,
}

impl ClassifiedFrame {
    pub fn kind(&self) -> FrameKind {
        match self {
            ClassifiedFrame::Beacon { .. } => FrameKind::Beacon,
            ClassifiedFrame::ProbeResponse { .. } => FrameKind::ProbeResponse,
            ClassifiedFrame::Data { .. } => FrameKind::Data,
            ClassifiedFrame::Other => FrameKind::Other,
        }
    }
}

fn mac_at(frame_data: &[u8], pos: usize) -> MacAddr {
    let mut octets = [0u8; 6];
    octets.copy_from_slice(&frame_data[pos..pos + MacAddr::LEN]);
    MacAddr(octets)
}

fn require(frame_data: &[u8], kind: &'static str, needed: usize) -> Result<(), DecodeError> {
    if frame_data.len() < needed {
        return Err(DecodeError::FrameTooShort {
            kind,
            needed,
            available: frame_data.len(),
        });
    }
    Ok(())
}

/// Classifies the MAC frame starting at `frame_data[0]`.
pub fn classify(frame_data: &[u8]) -> Result<ClassifiedFrame, DecodeError> {
    let fc = FrameControl::from_bytes(frame_data)?;

    if fc.is_beacon() || fc.is_probe_response() {
        let kind = if fc.is_beacon() { "beacon" } else { "probe response" };
        let header = parse_management_header(frame_data, kind)?;
        let ssid = extract_ssid(frame_data, kind)?;
        return Ok(if fc.is_beacon() {
            ClassifiedFrame::Beacon {
                bssid: header.bssid,
                transmitter: header.transmitter,
                ssid,
            }
        } else {
            ClassifiedFrame::ProbeResponse {
                bssid: header.bssid,
                transmitter: header.transmitter,
                ssid,
            }
        });
    }

    if fc.is_data() {
        require(frame_data, "data", DATA_HEADER_LEN)?;
        return Ok(ClassifiedFrame::Data {
            destination: mac_at(frame_data, 4),
            source: mac_at(frame_data, 10),
        });
    }

    Ok(ClassifiedFrame::Other)
}

pub fn parse_management_header(
    frame_data: &[u8],
    kind: &'static str,
) -> Result<ManagementHeader, DecodeError> {
    require(frame_data, kind, MGMT_HEADER_LEN)?;
    let seq_ctrl = u16::from_le_bytes([frame_data[22], frame_data[23]]);
    Ok(ManagementHeader {
        duration: u16::from_le_bytes([frame_data[2], frame_data[3]]),
        receiver: mac_at(frame_data, 4),
        transmitter: mac_at(frame_data, 10),
        bssid: mac_at(frame_data, 16),
        sequence: seq_ctrl >> 4,
        fragment: (seq_ctrl & 0x0F) as u8,
    })
}

/// Reads the first information element after the fixed parameters.
///
/// Returns `None` when that element is not an SSID or is empty (hidden
/// network). The SSID ends at the first NUL inside the declared length.
fn extract_ssid(frame_data: &[u8], kind: &'static str) -> Result<Option<String>, DecodeError> {
    let tag_pos = MGMT_HEADER_LEN + FIXED_PARAMS_LEN;
    require(frame_data, kind, tag_pos + 2)?;

    let tag_number = frame_data[tag_pos];
    let tag_length = usize::from(frame_data[tag_pos + 1]);
    if tag_number != TAG_SSID {
        return Ok(None);
    }
    if tag_length > SSID_MAX_LEN {
        return Err(DecodeError::SsidTooLong { len: tag_length });
    }

    let start = tag_pos + 2;
    let available = frame_data.len() - start;
    if tag_length > available {
        return Err(DecodeError::SsidOverrun {
            len: tag_length,
            available,
        });
    }

    let raw = &frame_data[start..start + tag_length];
    let raw = raw.split(|&b| b == 0).next().unwrap_or(raw);
    if raw.is_empty() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(raw).into_owned()))
}
