// Parser tests built from hand-assembled frames, no capture device needed.

use proptest::prelude::*;
use signal_strength::error::DecodeError;
use signal_strength::radiotap::{decode_signal, present_flags, SIGNAL_UNKNOWN};
use signal_strength::{classify, parse_radiotap, ClassifiedFrame, MacAddr};

const BSSID: MacAddr = MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
const STATION: MacAddr = MacAddr([0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb]);

fn management(fc: u8, transmitter: MacAddr, bssid: MacAddr, body: &[u8]) -> Vec<u8> {
    let mut frame = vec![fc, 0x00, 0x00, 0x00];
    frame.extend_from_slice(&MacAddr::BROADCAST.octets());
    frame.extend_from_slice(&transmitter.octets());
    frame.extend_from_slice(&bssid.octets());
    frame.extend_from_slice(&[0x10, 0x00]);
    frame.extend_from_slice(&[0u8; 12]);
    frame.extend_from_slice(body);
    frame
}

fn ssid_element(ssid: &[u8]) -> Vec<u8> {
    let mut element = vec![0x00, ssid.len() as u8];
    element.extend_from_slice(ssid);
    element
}

#[test]
fn test_parse_rssi() {
    let buf = [0x00, 0x00, 0x09, 0x00, 0x20, 0x00, 0x00, 0x00, 0xCE];
    let info = parse_radiotap(&buf).unwrap();
    assert_eq!(info.signal_dbm, (-(0xCE_i32 - 1)) ^ 0xFF);
    assert_eq!(info.payload_offset, 9);
    assert_eq!(info.header.present, present_flags::DBM_ANTSIGNAL);
}

#[test]
fn test_parse_rssi_after_tsft_and_channel() {
    let present = present_flags::TSFT | present_flags::CHANNEL | present_flags::DBM_ANTSIGNAL;
    let mut buf = vec![0x00, 0x00, 0x15, 0x00];
    buf.extend_from_slice(&present.to_le_bytes());
    buf.extend_from_slice(&[0u8; 8]);
    buf.extend_from_slice(&[0x6c, 0x09, 0xa0, 0x00]);
    buf.push(0xB0);
    assert_eq!(buf.len(), 0x15);

    let info = parse_radiotap(&buf).unwrap();
    assert_eq!(info.signal_dbm, decode_signal(0xB0));
}

#[test]
fn test_payload_offset_uses_header_length() {
    // Signal followed by fields the walker ignores; the MAC frame starts
    // at header_len, not after the signal byte.
    let present = present_flags::DBM_ANTSIGNAL | (1 << 6) | (1 << 11);
    let mut buf = vec![0x00, 0x00, 0x0c, 0x00];
    buf.extend_from_slice(&present.to_le_bytes());
    buf.extend_from_slice(&[0xC4, 0xA0, 0x01, 0x00]);
    buf.extend_from_slice(&[0x80, 0x00]);

    let info = parse_radiotap(&buf).unwrap();
    assert_eq!(info.payload_offset, 12);
    assert_eq!(&buf[info.payload_offset..], &[0x80, 0x00]);
}

#[test]
fn test_missing_signal_is_sentinel() {
    let buf = [0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
    assert_eq!(parse_radiotap(&buf).unwrap().signal_dbm, SIGNAL_UNKNOWN);
}

#[test]
fn test_parse_mac_address() {
    let frame = management(0x80, STATION, BSSID, &ssid_element(b"net1"));
    match classify(&frame).unwrap() {
        ClassifiedFrame::Beacon {
            bssid,
            transmitter,
            ssid,
        } => {
            assert_eq!(bssid, BSSID);
            assert_eq!(transmitter, STATION);
            assert_eq!(bssid.to_string(), "00:11:22:33:44:55");
            assert_eq!(ssid.as_deref(), Some("net1"));
        }
        other => panic!("expected beacon, got {:?}", other),
    }
}

#[test]
fn test_parse_ssid() {
    let mut body = ssid_element(b"coffee shop");
    // DS parameter set after the SSID is ignored.
    body.extend_from_slice(&[0x03, 0x01, 0x06]);
    let frame = management(0x50, STATION, BSSID, &body);

    assert_eq!(
        classify(&frame).unwrap(),
        ClassifiedFrame::ProbeResponse {
            bssid: BSSID,
            transmitter: STATION,
            ssid: Some("coffee shop".to_string()),
        }
    );
}

#[test]
fn test_ssid_stops_at_nul() {
    let frame = management(0x80, STATION, BSSID, &ssid_element(b"ab\0cd"));
    match classify(&frame).unwrap() {
        ClassifiedFrame::Beacon { ssid, .. } => assert_eq!(ssid.as_deref(), Some("ab")),
        other => panic!("expected beacon, got {:?}", other),
    }
}

#[test]
fn test_hidden_and_non_ssid_elements() {
    let hidden = management(0x80, STATION, BSSID, &ssid_element(b""));
    let rates = management(0x80, STATION, BSSID, &[0x01, 0x02, 0x82, 0x84]);
    for frame in [hidden, rates] {
        match classify(&frame).unwrap() {
            ClassifiedFrame::Beacon { ssid, .. } => assert_eq!(ssid, None),
            other => panic!("expected beacon, got {:?}", other),
        }
    }
}

#[test]
fn test_ssid_longer_than_field_rejected() {
    let mut body = vec![0x00, 40];
    body.extend_from_slice(&[b'x'; 40]);
    let frame = management(0x80, STATION, BSSID, &body);
    assert_eq!(classify(&frame), Err(DecodeError::SsidTooLong { len: 40 }));
}

#[test]
fn test_ssid_beyond_buffer_rejected() {
    let mut body = vec![0x00, 20];
    body.extend_from_slice(b"short");
    let frame = management(0x50, STATION, BSSID, &body);
    assert_eq!(
        classify(&frame),
        Err(DecodeError::SsidOverrun {
            len: 20,
            available: 5
        })
    );
}

#[test]
fn test_management_without_tag_header_rejected() {
    let frame = management(0x80, STATION, BSSID, &[]);
    assert!(matches!(
        classify(&frame),
        Err(DecodeError::FrameTooShort { needed: 38, available: 36, .. })
    ));
    assert!(matches!(
        classify(&frame[..20]),
        Err(DecodeError::FrameTooShort { needed: 24, .. })
    ));
}

#[test]
fn test_data_frame_addresses() {
    let mut frame = vec![0x08, 0x01, 0x2c, 0x00];
    frame.extend_from_slice(&BSSID.octets());
    frame.extend_from_slice(&STATION.octets());
    assert_eq!(
        classify(&frame).unwrap(),
        ClassifiedFrame::Data {
            destination: BSSID,
            source: STATION,
        }
    );
    assert!(matches!(
        classify(&frame[..15]),
        Err(DecodeError::FrameTooShort { needed: 16, .. })
    ));
}

proptest! {
    #[test]
    fn classify_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..96)) {
        let _ = classify(&bytes);
    }

    #[test]
    fn radiotap_offset_within_buffer(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        if let Ok(info) = parse_radiotap(&bytes) {
            prop_assert!(info.payload_offset <= bytes.len());
        }
    }
}
