//! C1: locate record boundaries, resolve endianness, validate the
//! start/stop/checksum envelope (§4.1).
use std::io::Read;

use emdg_core::store::Statistics;
use emdg_core::{EmdgError, EndianPolarity};

/// Datagram ids the framer recognises as valid labels (§6.1). Several ids
/// are overloaded between two logical kinds (`0x30`: Stop2/PuId, `0x31`:
/// Off/PuStatus); disambiguating those is [`crate::decode`]'s job, not
/// the framer's — here only the id byte's membership in this set matters.
const VALID_IDS: [u8; 26] = [
    0x30, 0x31, 0x32, 0x41, 0x43, 0x44, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x4E, 0x50, 0x52, 0x54, 0x55,
    0x56, 0x58, 0x59, 0x68, 0x69, 0x6B, 0x6E, 0x33, 0xE5, 0xE4,
];

/// A record whose envelope has been validated and whose payload has been
/// extracted, but which has not yet been decoded into a typed record.
pub struct RawRecord {
    pub id: u8,
    pub model: u16,
    pub swap: bool,
    pub payload: Vec<u8>,
    /// `false` when the byte immediately before the checksum was not
    /// `0x03` (§4.1 point 6): `payload` has already been truncated at the
    /// nearest `0x03` found scanning forward from the start of the
    /// record body, so decoders don't need to re-discover the trailer
    /// themselves — this flag is purely informational, surfaced for
    /// statistics/logging.
    pub stop_ok: bool,
}

/// Sanity bound on `len` so a corrupt length field cannot trigger an
/// unbounded allocation; comfortably above any real datagram (the
/// largest, `WaterColumn`, pages at a few kilobytes per record).
const MAX_RECORD_LEN: u32 = 4 * 1024 * 1024;

pub struct Framer {
    polarity: EndianPolarity,
}

impl Framer {
    pub fn new() -> Self {
        Framer { polarity: EndianPolarity::Unknown }
    }

    pub fn polarity(&self) -> EndianPolarity {
        self.polarity
    }

    fn read_one<R: Read>(stream: &mut R) -> Result<u8, EmdgError> {
        let mut b = [0u8; 1];
        stream.read_exact(&mut b)?;
        Ok(b[0])
    }

    fn decode_u32(b: [u8; 4], swap: bool) -> u32 {
        if swap { u32::from_be_bytes(b) } else { u32::from_le_bytes(b) }
    }

    fn decode_u16(b: [u8; 2], swap: bool) -> u16 {
        if swap { u16::from_be_bytes(b) } else { u16::from_le_bytes(b) }
    }

    /// Validates a label under a fixed swap assumption, returning
    /// `(len, id, model)` on success.
    fn validate_with_swap(window: &[u8; 8], swap: bool) -> Option<(u32, u8, u16)> {
        let len = Self::decode_u32([window[0], window[1], window[2], window[3]], swap);
        let start = window[4];
        let id = window[5];
        let model = Self::decode_u16([window[6], window[7]], swap);
        if start != 0x02 {
            return None;
        }
        if !VALID_IDS.contains(&id) {
            return None;
        }
        if emdg_core::SonarModel::new(model).is_none() {
            return None;
        }
        if len < 4 || len > MAX_RECORD_LEN {
            return None;
        }
        Some((len, id, model))
    }

    /// Validates under the frozen polarity if known, otherwise tries
    /// native first, then swapped.
    fn validate_label(window: &[u8; 8], polarity: EndianPolarity) -> Option<(u32, u8, u16, bool)> {
        match polarity {
            EndianPolarity::Native => {
                Self::validate_with_swap(window, false).map(|(l, i, m)| (l, i, m, false))
            }
            EndianPolarity::Swapped => {
                Self::validate_with_swap(window, true).map(|(l, i, m)| (l, i, m, true))
            }
            EndianPolarity::Unknown => Self::validate_with_swap(window, false)
                .map(|(l, i, m)| (l, i, m, false))
                .or_else(|| Self::validate_with_swap(window, true).map(|(l, i, m)| (l, i, m, true))),
        }
    }

    /// If exactly one of (native, swapped) validates the current window,
    /// the polarity is unambiguous and gets frozen (§4.1 point 5).
    fn resolve_unambiguous(window: &[u8; 8]) -> Option<EndianPolarity> {
        let native_ok = Self::validate_with_swap(window, false).is_some();
        let swapped_ok = Self::validate_with_swap(window, true).is_some();
        match (native_ok, swapped_ok) {
            (true, false) => Some(EndianPolarity::Native),
            (false, true) => Some(EndianPolarity::Swapped),
            _ => None,
        }
    }

    /// Reads one record from `stream`, resyncing over garbage bytes as
    /// needed. Returns `Err` with [`EmdgError::is_eof`] true when the
    /// stream ends cleanly before a new record begins.
    pub fn next_record<R: Read>(
        &mut self,
        stream: &mut R,
        stats: &mut Statistics,
    ) -> Result<RawRecord, EmdgError> {
        let mut window = [0u8; 8];
        stream.read_exact(&mut window)?;
        let mut skipped = 0u64;
        loop {
            if let Some((len, id, model, swap)) = Self::validate_label(&window, self.polarity) {
                if skipped > 0 {
                    stats.bytes_skipped_total += skipped;
                    if !stats.bytes_skipped_warned {
                        log::warn!("bytes skipped between records: {}", skipped);
                        stats.bytes_skipped_warned = true;
                    }
                }
                if !self.polarity.is_resolved() {
                    if let Some(resolved) = Self::resolve_unambiguous(&window) {
                        self.polarity = resolved;
                    }
                }
                return self.read_body(stream, len, id, model, swap);
            }
            for i in 0..7 {
                window[i] = window[i + 1];
            }
            window[7] = Self::read_one(stream)?;
            skipped += 1;
        }
    }

    fn read_body<R: Read>(
        &mut self,
        stream: &mut R,
        len: u32,
        id: u8,
        model: u16,
        swap: bool,
    ) -> Result<RawRecord, EmdgError> {
        let rest_len = (len - 4) as usize; // len counts the label's 4 bytes (already read) + payload + stop + checksum
        let mut rest = vec![0u8; rest_len];
        stream.read_exact(&mut rest)?;
        if rest.len() < 3 {
            return Err(EmdgError::BadDatagram { msg: "record shorter than trailer".into() });
        }
        // §4.1 point 6: the trailer should sit right before the checksum;
        // if it isn't there, scan forward for it instead of trusting the
        // announced length, discarding whatever lands between the real
        // `0x03` and the checksum.
        let expected_at = rest.len() - 3;
        let stop_at = if rest[expected_at] == 0x03 {
            Some(expected_at)
        } else {
            rest[..expected_at].iter().position(|&b| b == 0x03)
        };
        let stop_ok = stop_at == Some(expected_at);
        let payload = rest[..stop_at.unwrap_or(expected_at)].to_vec();
        Ok(RawRecord { id, model, swap, payload, stop_ok })
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}
