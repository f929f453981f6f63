// Byte and bit level primitives shared by all element codecs

pub mod bcd;
pub mod elements;

pub use bcd::{
    bcd_to_int, decode_frequency, encode_frequency, int_to_bcd, pack_bcd_u16, unpack_bcd_u16,
    BcdError,
};
pub use elements::{
    get_bits, read_ascii, read_u16_le, read_u24_le, read_u32_le, read_utf16, set_bits, write_ascii,
    write_u16_le, write_u24_le, write_u32_le, write_utf16, ElementError,
};
