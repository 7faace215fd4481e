//! Dotted-quad IPv4 parsing into 32-bit ordinals
//!
//! The dataset keys every range by the big-endian integer form of an IPv4
//! address, so lookups start by converting the caller's text into that form.

use std::net::Ipv4Addr;
use thiserror::Error;

/// Why an address string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid IP format: expected 4 octets, got {0}")]
    SegmentCount(usize),
    #[error("invalid octet {position}: {segment:?} is not a decimal number")]
    InvalidOctet { position: usize, segment: String },
    #[error("octet {position} out of range: {value} (must be 0-255)")]
    OctetOutOfRange { position: usize, value: u64 },
}

/// Convert a dotted-quad IPv4 address into its ordinal
///
/// Surrounding whitespace is ignored and leading zeros inside an octet are
/// accepted (`"010.0.0.1"` is `10.0.0.1`).
pub fn ip_to_ordinal(address: &str) -> Result<u32, AddressError> {
    let segments: Vec<&str> = address.trim().split('.').collect();
    if segments.len() != 4 {
        return Err(AddressError::SegmentCount(segments.len()));
    }

    let mut octets = [0u32; 4];
    for (i, segment) in segments.iter().enumerate() {
        octets[i] = parse_octet(i + 1, segment)?;
    }

    Ok(16_777_216 * octets[0] + 65_536 * octets[1] + 256 * octets[2] + octets[3])
}

/// Inverse of [`ip_to_ordinal`]
pub fn ordinal_to_ip(ordinal: u32) -> Ipv4Addr {
    Ipv4Addr::from(ordinal)
}

fn parse_octet(position: usize, segment: &str) -> Result<u32, AddressError> {
    // str::parse accepts a leading '+', which is not valid in an address
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressError::InvalidOctet {
            position,
            segment: segment.to_string(),
        });
    }

    let value = segment
        .parse::<u64>()
        .map_err(|_| AddressError::InvalidOctet {
            position,
            segment: segment.to_string(),
        })?;

    if value > 255 {
        return Err(AddressError::OctetOutOfRange { position, value });
    }

    Ok(value as u32)
}
