//! Radiotap PHY header decoding
//!
//! Only the fields in front of the dBm antenna signal are walked; everything
//! after it is skipped by jumping straight to `header_len`, which is the
//! authoritative start of the 802.11 frame.

use crate::error::DecodeError;

/// Radiotap header present flags (bit positions in a presence word)
pub mod present_flags {
    pub const TSFT: u32 = 1 << 0;
    pub const FLAGS: u32 = 1 << 1;
    pub const RATE: u32 = 1 << 2;
    pub const CHANNEL: u32 = 1 << 3;
    pub const FHSS: u32 = 1 << 4;
    pub const DBM_ANTSIGNAL: u32 = 1 << 5;
    pub const EXT: u32 = 1 << 31;
}

/// Fixed part: revision, pad, length, first presence word.
pub const FIXED_HEADER_LEN: usize = 8;

/// Signal value meaning "not reported".
pub const SIGNAL_UNKNOWN: i32 = 0;

// Fields preceding the antenna signal, in wire order, with their widths.
const WALKED_FIELDS: [(u32, usize); 5] = [
    (present_flags::TSFT, 8),
    (present_flags::FLAGS, 1),
    (present_flags::RATE, 1),
    (present_flags::CHANNEL, 4),
    (present_flags::FHSS, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiotapHeader {
    pub revision: u8,
    pub pad: u8,
    pub header_len: u16,
    pub present: u32,
    /// Second presence word, read only when `present` has the extension bit.
    pub present_ext: Option<u32>,
}

impl RadiotapHeader {
    pub fn has_ext(&self) -> bool {
        self.present & present_flags::EXT != 0
    }
}

/// What the rest of the pipeline needs from the PHY header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiotapInfo {
    pub header: RadiotapHeader,
    /// Start of the 802.11 frame within the captured buffer.
    pub payload_offset: usize,
    /// Received signal in dBm, `SIGNAL_UNKNOWN` when absent.
    pub signal_dbm: i32,
}

/// Converts the raw antenna signal byte to dBm.
pub fn decode_signal(raw: u8) -> i32 {
    (-(i32::from(raw) - 1)) ^ 0xFF
}

fn read_u16_le(data: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([data[pos], data[pos + 1]])
}

fn read_u32_le(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}

/// Decodes the radiotap header at the start of `data`.
pub fn parse_radiotap(data: &[u8]) -> Result<RadiotapInfo, DecodeError> {
    if data.len() < FIXED_HEADER_LEN {
        return Err(DecodeError::RadiotapTooShort { len: data.len() });
    }

    let header_len = read_u16_le(data, 2);
    let end = usize::from(header_len);
    if end < FIXED_HEADER_LEN {
        return Err(DecodeError::RadiotapTooShort { len: end });
    }
    if end > data.len() {
        return Err(DecodeError::RadiotapLength {
            header_len: end,
            available: data.len(),
        });
    }

    let mut header = RadiotapHeader {
        revision: data[0],
        pad: data[1],
        header_len,
        present: read_u32_le(data, 4),
        present_ext: None,
    };

    let mut pos = FIXED_HEADER_LEN;
    if header.has_ext() {
        if pos + 4 > end {
            return Err(DecodeError::RadiotapFieldOutOfBounds {
                offset: pos,
                header_len: end,
            });
        }
        header.present_ext = Some(read_u32_le(data, pos));
        pos += 4;
    }

    let word0 = header.present;
    for (bit, width) in WALKED_FIELDS {
        if word0 & bit != 0 {
            pos += width;
        }
    }

    let mut signal_dbm = SIGNAL_UNKNOWN;
    if word0 & present_flags::DBM_ANTSIGNAL != 0 {
        signal_dbm = read_signal(data, pos, end)?;
    }

    // At most one extension word is honored. Fields already counted from
    // the first word are not counted again.
    if let Some(word1) = header.present_ext {
        for (bit, width) in WALKED_FIELDS {
            if word1 & bit != 0 && word0 & bit == 0 {
                pos += width;
            }
        }
        if (word0 | word1) & present_flags::DBM_ANTSIGNAL != 0 {
            signal_dbm = read_signal(data, pos, end)?;
        }
    }

    Ok(RadiotapInfo {
        header,
        payload_offset: end,
        signal_dbm,
    })
}

fn read_signal(data: &[u8], pos: usize, end: usize) -> Result<i32, DecodeError> {
    if pos >= end {
        return Err(DecodeError::RadiotapFieldOutOfBounds {
            offset: pos,
            header_len: end,
        });
    }
    Ok(decode_signal(data[pos]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(present: u32, fields: &[u8]) -> Vec<u8> {
        let len = (FIXED_HEADER_LEN + fields.len()) as u16;
        let mut buf = vec![0, 0];
        buf.extend_from_slice(&len.to_le_bytes());
        buf.extend_from_slice(&present.to_le_bytes());
        buf.extend_from_slice(fields);
        buf
    }

    #[test]
    fn test_signal_only() {
        let buf = header(present_flags::DBM_ANTSIGNAL, &[0xCE]);
        let info = parse_radiotap(&buf).unwrap();
        assert_eq!(info.signal_dbm, (-(0xCE_i32 - 1)) ^ 0xFF);
        assert_eq!(info.signal_dbm, -52);
        assert_eq!(info.payload_offset, 9);
        assert_eq!(info.header.present_ext, None);
    }

    #[test]
    fn test_no_signal_is_unknown() {
        let buf = header(present_flags::FLAGS | present_flags::RATE, &[0x10, 0x02]);
        let info = parse_radiotap(&buf).unwrap();
        assert_eq!(info.signal_dbm, SIGNAL_UNKNOWN);
        assert_eq!(info.payload_offset, 10);
    }

    #[test]
    fn test_walks_preceding_fields() {
        let present = present_flags::TSFT
            | present_flags::FLAGS
            | present_flags::RATE
            | present_flags::CHANNEL
            | present_flags::FHSS
            | present_flags::DBM_ANTSIGNAL;
        let mut fields = vec![0u8; 8 + 1 + 1 + 4 + 1];
        fields.push(0xC0);
        let buf = header(present, &fields);
        let info = parse_radiotap(&buf).unwrap();
        assert_eq!(info.signal_dbm, decode_signal(0xC0));
    }

    #[test]
    fn test_extension_word_skips_counted_fields() {
        // Word 0: flags + ext. Word 1: flags again (ignored) + rate + signal.
        let word0 = present_flags::FLAGS | present_flags::EXT;
        let word1 = present_flags::FLAGS | present_flags::RATE | present_flags::DBM_ANTSIGNAL;
        let mut fields = word1.to_le_bytes().to_vec();
        fields.extend_from_slice(&[0x10, 0x02, 0xB5]);
        let buf = header(word0, &fields);

        let info = parse_radiotap(&buf).unwrap();
        assert_eq!(info.header.present_ext, Some(word1));
        assert_eq!(info.signal_dbm, decode_signal(0xB5));
        assert_eq!(info.payload_offset, buf.len());
    }

    #[test]
    fn test_header_length_beyond_buffer() {
        let mut buf = header(0, &[]);
        buf[2] = 64;
        assert_eq!(
            parse_radiotap(&buf),
            Err(DecodeError::RadiotapLength {
                header_len: 64,
                available: 8
            })
        );
    }

    #[test]
    fn test_signal_outside_header() {
        // Signal bit set, but header_len stops before the sample.
        let buf = header(present_flags::DBM_ANTSIGNAL, &[]);
        assert!(matches!(
            parse_radiotap(&buf),
            Err(DecodeError::RadiotapFieldOutOfBounds { offset: 8, .. })
        ));
    }

    #[test]
    fn test_too_short() {
        assert_eq!(
            parse_radiotap(&[0, 0, 8, 0]),
            Err(DecodeError::RadiotapTooShort { len: 4 })
        );
    }
}
