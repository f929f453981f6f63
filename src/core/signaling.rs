// CTCSS/DCS signaling codes and their u16 wire encoding

use crate::bitwise::bcd::{pack_bcd_u16, unpack_bcd_u16};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 50 standard CTCSS tones in deci-hertz (67.0 Hz = 670)
pub const CTCSS_TONES: [u16; 50] = [
    670, 693, 719, 744, 770, 797, 825, 854, 885, 915, 948, 974, 1000, 1035, 1072, 1109, 1148,
    1188, 1230, 1273, 1318, 1365, 1413, 1462, 1514, 1567, 1598, 1622, 1655, 1679, 1713, 1738,
    1773, 1799, 1835, 1862, 1899, 1928, 1966, 1995, 2035, 2065, 2107, 2181, 2257, 2291, 2336,
    2418, 2503, 2541,
];

/// 104 standard DCS codes (octal-digit values)
pub const DCS_CODES: [u16; 104] = [
    23, 25, 26, 31, 32, 36, 43, 47, 51, 53, 54, 65, 71, 72, 73, 74, 114, 115, 116, 122, 125, 131,
    132, 134, 143, 145, 152, 155, 156, 162, 165, 172, 174, 205, 212, 223, 225, 226, 243, 244, 245,
    246, 251, 252, 255, 261, 263, 265, 266, 271, 274, 306, 311, 315, 325, 331, 332, 343, 346, 351,
    356, 364, 365, 371, 411, 412, 413, 423, 431, 432, 445, 446, 452, 454, 455, 462, 464, 465, 466,
    503, 506, 516, 523, 526, 532, 546, 565, 606, 612, 624, 627, 631, 632, 654, 662, 664, 703, 712,
    723, 731, 732, 734, 743, 754,
];

/// Wire value for "no tone configured"
pub const WIRE_NONE: u16 = 0xFFFF;

/// DCS marker bits in the wire value
const DCS_NORMAL: u16 = 0x4000;
const DCS_INVERTED: u16 = 0x8000;
const DCS_MASK: u16 = 0xC000;

#[derive(Error, Debug)]
pub enum SignalingError {
    #[error("Not a standard CTCSS tone: {0} deci-Hz")]
    UnknownTone(u16),

    #[error("Not a standard DCS code: {0:03}")]
    UnknownDcsCode(u16),

    #[error("Undecodable signaling wire value: {0:#06x}")]
    InvalidWireValue(u16),
}

pub type Result<T> = std::result::Result<T, SignalingError>;

/// A CTCSS tone or DCS code. A disabled tone is modeled as
/// `Option<Code>::None` throughout the configuration graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Code {
    /// CTCSS sub-audible tone in deci-hertz (e.g. 885 = 88.5 Hz)
    Ctcss(u16),
    /// DCS code with normal or inverted polarity
    Dcs { code: u16, inverted: bool },
}

impl Code {
    /// Standard CTCSS tone constructor; fails for off-table frequencies
    pub fn ctcss(deci_hz: u16) -> Result<Self> {
        if !CTCSS_TONES.contains(&deci_hz) {
            return Err(SignalingError::UnknownTone(deci_hz));
        }
        Ok(Code::Ctcss(deci_hz))
    }

    /// Standard DCS code constructor; fails for off-table codes
    pub fn dcs(code: u16, inverted: bool) -> Result<Self> {
        if !DCS_CODES.contains(&code) {
            return Err(SignalingError::UnknownDcsCode(code));
        }
        Ok(Code::Dcs { code, inverted })
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Ctcss(d) => write!(f, "{}.{} Hz", d / 10, d % 10),
            Code::Dcs { code, inverted } => {
                write!(f, "D{:03}{}", code, if *inverted { "I" } else { "N" })
            }
        }
    }
}

/// Encode a tone setting to the u16 wire value:
/// - `None` -> 0xFFFF
/// - CTCSS  -> 4-digit BCD of the deci-hertz value
/// - DCS    -> 0x4000 | BCD(code), 0x8000 | BCD(code) when inverted
///
/// Off-table codes fail; they indicate a configuration error upstream.
pub fn encode_tone(code: Option<Code>) -> Result<u16> {
    match code {
        None => Ok(WIRE_NONE),
        Some(Code::Ctcss(deci_hz)) => {
            if !CTCSS_TONES.contains(&deci_hz) {
                return Err(SignalingError::UnknownTone(deci_hz));
            }
            // Max tone 2541 packs below the DCS marker bits
            Ok(pack_bcd_u16(deci_hz).expect("tone table value packs as BCD"))
        }
        Some(Code::Dcs { code, inverted }) => {
            if !DCS_CODES.contains(&code) {
                return Err(SignalingError::UnknownDcsCode(code));
            }
            let marker = if inverted { DCS_INVERTED } else { DCS_NORMAL };
            Ok(marker | pack_bcd_u16(code).expect("DCS table value packs as BCD"))
        }
    }
}

/// Decode a u16 wire value. `Ok(None)` is a disabled tone; an error marks
/// an undecodable value, which callers must treat as "tone disabled"
/// rather than aborting the surrounding record decode.
pub fn decode_tone(wire: u16) -> Result<Option<Code>> {
    if wire == WIRE_NONE {
        return Ok(None);
    }

    match wire & DCS_MASK {
        0x0000 => {
            let deci_hz =
                unpack_bcd_u16(wire).map_err(|_| SignalingError::InvalidWireValue(wire))?;
            if !CTCSS_TONES.contains(&deci_hz) {
                return Err(SignalingError::InvalidWireValue(wire));
            }
            Ok(Some(Code::Ctcss(deci_hz)))
        }
        DCS_NORMAL | DCS_INVERTED => {
            let code = unpack_bcd_u16(wire & !DCS_MASK)
                .map_err(|_| SignalingError::InvalidWireValue(wire))?;
            if !DCS_CODES.contains(&code) {
                return Err(SignalingError::InvalidWireValue(wire));
            }
            Ok(Some(Code::Dcs {
                code,
                inverted: wire & DCS_INVERTED != 0,
            }))
        }
        _ => Err(SignalingError::InvalidWireValue(wire)),
    }
}
