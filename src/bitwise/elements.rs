// Field accessors for fixed-layout binary elements: little-endian
// integers, sub-byte bit fields and fixed-width string fields

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ElementError {
    #[error("Insufficient data: expected {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, ElementError>;

/// Read a u16 in little-endian format
pub fn read_u16_le(data: &[u8]) -> Result<u16> {
    if data.len() < 2 {
        return Err(ElementError::InsufficientData {
            expected: 2,
            actual: data.len(),
        });
    }
    Ok(u16::from_le_bytes([data[0], data[1]]))
}

/// Read a u24 (3 bytes) in little-endian format
pub fn read_u24_le(data: &[u8]) -> Result<u32> {
    if data.len() < 3 {
        return Err(ElementError::InsufficientData {
            expected: 3,
            actual: data.len(),
        });
    }
    Ok(u32::from_le_bytes([data[0], data[1], data[2], 0]))
}

/// Read a u32 in little-endian format
pub fn read_u32_le(data: &[u8]) -> Result<u32> {
    if data.len() < 4 {
        return Err(ElementError::InsufficientData {
            expected: 4,
            actual: data.len(),
        });
    }
    Ok(u32::from_le_bytes([data[0], data[1], data[2], data[3]]))
}

/// Write a u16 in little-endian format
pub fn write_u16_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// Write a u24 in little-endian format
pub fn write_u24_le(value: u32) -> [u8; 3] {
    let bytes = value.to_le_bytes();
    [bytes[0], bytes[1], bytes[2]]
}

/// Write a u32 in little-endian format
pub fn write_u32_le(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Read `width` bits of a byte starting at `offset` (LSB first).
/// Example: get_bits(0b0011_0100, 2, 3) == 0b101
pub fn get_bits(byte: u8, offset: u8, width: u8) -> u8 {
    debug_assert!(offset + width <= 8);
    (byte >> offset) & ((1u16 << width) - 1) as u8
}

/// Write `width` bits of `value` into a byte at `offset` (LSB first),
/// leaving the other bits untouched.
pub fn set_bits(byte: &mut u8, offset: u8, width: u8, value: u8) {
    debug_assert!(offset + width <= 8);
    let mask = (((1u16 << width) - 1) as u8) << offset;
    *byte = (*byte & !mask) | ((value << offset) & mask);
}

/// Decode a fixed-width zero-terminated UTF-16LE name field.
/// 0xFFFF units (cleared record fill) terminate like 0x0000.
pub fn read_utf16(data: &[u8]) -> String {
    let mut units = Vec::with_capacity(data.len() / 2);
    for pair in data.chunks_exact(2) {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        if unit == 0x0000 || unit == 0xFFFF {
            break;
        }
        units.push(unit);
    }
    String::from_utf16_lossy(&units)
}

/// Encode a string into a fixed-width UTF-16LE field of `data.len() / 2`
/// code units, zero-terminated and truncated if over-length. Characters
/// outside the BMP are replaced, the format has no surrogate support.
pub fn write_utf16(data: &mut [u8], value: &str) {
    let max_units = data.len() / 2;
    data.fill(0);

    let mut i = 0;
    for ch in value.chars() {
        // Leave room for the terminator
        if i + 1 >= max_units {
            break;
        }
        let unit = if (ch as u32) <= 0xFFFF {
            ch as u16
        } else {
            b'?' as u16
        };
        data[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
        i += 1;
    }
}

/// Decode a fixed-width zero-terminated ASCII field (callsign database).
pub fn read_ascii(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    data[..end]
        .iter()
        .map(|&b| {
            if (0x20..0x7F).contains(&b) {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}

/// Encode a string into a fixed-width zero-terminated ASCII field,
/// truncated if over-length. Non-ASCII characters become '?'.
pub fn write_ascii(data: &mut [u8], value: &str) {
    data.fill(0);

    let end = data.len() - 1;
    for (slot, ch) in data[..end].iter_mut().zip(value.chars()) {
        *slot = if ch.is_ascii() { ch as u8 } else { b'?' };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_le_integers() {
        let data = [0x34, 0x12];
        assert_eq!(read_u16_le(&data).unwrap(), 0x1234);
        assert_eq!(write_u16_le(0x1234), data);

        let data = [0x56, 0x34, 0x12];
        assert_eq!(read_u24_le(&data).unwrap(), 0x123456);
        assert_eq!(write_u24_le(0x123456), data);

        let data = [0x78, 0x56, 0x34, 0x12];
        assert_eq!(read_u32_le(&data).unwrap(), 0x12345678);
        assert_eq!(write_u32_le(0x12345678), data);
    }

    #[test]
    fn test_insufficient_data() {
        let data = [0x12];
        assert!(read_u16_le(&data).is_err());
        assert!(read_u24_le(&data).is_err());
        assert!(read_u32_le(&data).is_err());
    }

    #[test]
    fn test_bit_fields() {
        assert_eq!(get_bits(0b0011_0100, 2, 3), 0b101);
        assert_eq!(get_bits(0xFF, 0, 2), 0b11);
        assert_eq!(get_bits(0xFF, 6, 2), 0b11);

        let mut byte = 0xFF;
        set_bits(&mut byte, 0, 2, 0b10);
        assert_eq!(byte, 0xFE);
        set_bits(&mut byte, 4, 4, 0x5);
        assert_eq!(byte, 0x5E);

        // Over-wide value is masked, neighbours untouched
        let mut byte = 0x00;
        set_bits(&mut byte, 2, 2, 0xFF);
        assert_eq!(byte, 0b0000_1100);
    }

    #[test]
    fn test_utf16_field() {
        let mut field = [0u8; 32];
        write_utf16(&mut field, "Simplex 2m");
        assert_eq!(&field[..4], &[b'S', 0, b'i', 0]);
        assert_eq!(read_utf16(&field), "Simplex 2m");

        // Truncated to 15 units plus terminator
        write_utf16(&mut field, "a channel name that is too long");
        assert_eq!(read_utf16(&field), "a channel name ");

        // Cleared (0xFF) field reads as empty
        assert_eq!(read_utf16(&[0xFF; 32]), "");
    }

    #[test]
    fn test_ascii_field() {
        let mut field = [0u8; 16];
        write_ascii(&mut field, "DL1ABC");
        assert_eq!(&field[..7], b"DL1ABC\0");
        assert_eq!(read_ascii(&field), "DL1ABC");

        write_ascii(&mut field, "0123456789ABCDEFGH");
        assert_eq!(read_ascii(&field), "0123456789ABCDE");
    }
}
