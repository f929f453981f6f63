// Packed binary-coded-decimal encoding, including the fixed-point
// frequency words used by the channel and GPS elements

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BcdError {
    #[error("Invalid BCD digit: {0:#x}")]
    InvalidDigit(u8),

    #[error("Value too large for BCD field: {0}")]
    ValueTooLarge(u64),

    #[error("Frequency not representable: {0} Hz")]
    FrequencyNotRepresentable(u64),
}

pub type Result<T> = std::result::Result<T, BcdError>;

/// Split a BCD byte into its two decimal digits (tens, ones).
/// Example: 0x12 -> (1, 2), 0x95 -> (9, 5)
pub fn bcd_byte_to_digits(byte: u8) -> Result<(u8, u8)> {
    let tens = (byte & 0xF0) >> 4;
    let ones = byte & 0x0F;

    if tens > 9 || ones > 9 {
        return Err(BcdError::InvalidDigit(byte));
    }

    Ok((tens, ones))
}

/// Pack two decimal digits into a BCD byte.
/// Example: (1, 2) -> 0x12, (9, 5) -> 0x95
pub fn digits_to_bcd_byte(tens: u8, ones: u8) -> Result<u8> {
    if tens > 9 || ones > 9 {
        return Err(BcdError::InvalidDigit((tens << 4) | ones));
    }

    Ok((tens << 4) | ones)
}

/// Convert a little-endian BCD array to an integer.
/// Example: [0x56, 0x34, 0x12] -> 123456
pub fn bcd_to_int(bcd_array: &[u8]) -> Result<u64> {
    let mut value: u64 = 0;

    for &byte in bcd_array.iter().rev() {
        let (tens, ones) = bcd_byte_to_digits(byte)?;
        value = value
            .checked_mul(100)
            .ok_or(BcdError::ValueTooLarge(value))?;
        value = value
            .checked_add((tens * 10 + ones) as u64)
            .ok_or(BcdError::ValueTooLarge(value))?;
    }

    Ok(value)
}

/// Convert an integer to a little-endian BCD array of `num_bytes` bytes.
/// Example: 123456 -> [0x56, 0x34, 0x12]
pub fn int_to_bcd(value: u64, num_bytes: usize) -> Result<Vec<u8>> {
    let mut result = vec![0u8; num_bytes];
    let mut remaining = value;

    for slot in result.iter_mut() {
        let two_digits = (remaining % 100) as u8;
        remaining /= 100;
        *slot = digits_to_bcd_byte(two_digits / 10, two_digits % 10)?;
    }

    if remaining > 0 {
        return Err(BcdError::ValueTooLarge(value));
    }

    Ok(result)
}

/// Pack a value <= 9999 into a 4-nibble BCD word.
/// Used by the signaling codec for tone/DCS wire values.
pub fn pack_bcd_u16(value: u16) -> Result<u16> {
    if value > 9999 {
        return Err(BcdError::ValueTooLarge(value as u64));
    }

    Ok((value % 10)
        | ((value / 10 % 10) << 4)
        | ((value / 100 % 10) << 8)
        | ((value / 1000) << 12))
}

/// Unpack a 4-nibble BCD word. All four nibbles must be decimal digits.
pub fn unpack_bcd_u16(word: u16) -> Result<u16> {
    let mut value: u16 = 0;
    for shift in [12u16, 8, 4, 0] {
        let digit = (word >> shift) & 0x0F;
        if digit > 9 {
            return Err(BcdError::InvalidDigit((word >> shift) as u8 & 0x0F));
        }
        value = value * 10 + digit;
    }
    Ok(value)
}

/// Encode a frequency in Hz into the 4-byte element field: 8 BCD digits of
/// (Hz / 10), little-endian byte order. The 10 Hz resolution is exact for
/// frequencies specified to 4 decimal places of MHz.
pub fn encode_frequency(hz: u64) -> Result<[u8; 4]> {
    if hz % 10 != 0 || hz / 10 > 99_999_999 {
        return Err(BcdError::FrequencyNotRepresentable(hz));
    }

    let bytes = int_to_bcd(hz / 10, 4)?;
    Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Decode a 4-byte BCD frequency field to Hz. An 0xFF-filled field fails
/// with `InvalidDigit`, which the channel decoder treats as "slot unused".
pub fn decode_frequency(field: &[u8; 4]) -> Result<u64> {
    Ok(bcd_to_int(field)? * 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcd_byte_conversion() {
        assert_eq!(bcd_byte_to_digits(0x12).unwrap(), (1, 2));
        assert_eq!(bcd_byte_to_digits(0x95).unwrap(), (9, 5));
        assert_eq!(bcd_byte_to_digits(0x00).unwrap(), (0, 0));

        assert!(bcd_byte_to_digits(0xAB).is_err()); // Invalid BCD

        assert_eq!(digits_to_bcd_byte(1, 2).unwrap(), 0x12);
        assert_eq!(digits_to_bcd_byte(9, 5).unwrap(), 0x95);
    }

    #[test]
    fn test_bcd_array_roundtrip() {
        assert_eq!(bcd_to_int(&[0x56, 0x34, 0x12]).unwrap(), 123456);
        assert_eq!(int_to_bcd(123456, 3).unwrap(), vec![0x56, 0x34, 0x12]);

        // Value too large for the field
        assert!(int_to_bcd(1234567, 3).is_err());

        // 0xFF fill is not valid BCD
        assert!(bcd_to_int(&[0xFF, 0xFF, 0xFF]).is_err());
    }

    #[test]
    fn test_bcd_u16() {
        assert_eq!(pack_bcd_u16(670).unwrap(), 0x0670);
        assert_eq!(pack_bcd_u16(2541).unwrap(), 0x2541);
        assert_eq!(unpack_bcd_u16(0x0670).unwrap(), 670);
        assert_eq!(unpack_bcd_u16(0x2541).unwrap(), 2541);

        assert!(pack_bcd_u16(10_000).is_err());
        assert!(unpack_bcd_u16(0x06A0).is_err());
    }

    #[test]
    fn test_frequency_roundtrip() {
        // The negative-offset repeater pair from the test plan
        let rx = encode_frequency(145_600_000).unwrap();
        assert_eq!(rx, [0x00, 0x00, 0x56, 0x14]);
        assert_eq!(decode_frequency(&rx).unwrap(), 145_600_000);

        let tx = encode_frequency(145_000_000).unwrap();
        assert_eq!(decode_frequency(&tx).unwrap(), 145_000_000);

        // 70 cm pair
        let rx = encode_frequency(438_600_000).unwrap();
        assert_eq!(decode_frequency(&rx).unwrap(), 438_600_000);
        let tx = encode_frequency(430_000_000).unwrap();
        assert_eq!(decode_frequency(&tx).unwrap(), 430_000_000);

        // 4 decimal places of MHz survive exactly
        let f = encode_frequency(145_123_400).unwrap();
        assert_eq!(decode_frequency(&f).unwrap(), 145_123_400);
    }

    #[test]
    fn test_frequency_limits() {
        // Sub-10 Hz precision is not representable
        assert!(encode_frequency(145_000_005).is_err());
        // Above 999.99999 MHz
        assert!(encode_frequency(1_000_000_000).is_err());
        // 0xFF fill decodes as an error, not as a frequency
        assert!(decode_frequency(&[0xFF; 4]).is_err());
    }
}
