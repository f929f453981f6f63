// DMRPLUG: binary codeplug encoder/decoder for DMR radios
// Copyright 2025 - Licensed under GPLv3

pub mod bitwise;
pub mod core;
pub mod device;
pub mod formats;
pub mod memmap;

// Re-export commonly used types
pub use bitwise::{decode_frequency, encode_frequency};
pub use crate::core::{
    channel::{Channel, ChannelMode},
    config::Config,
    power::Power,
    signaling::Code,
    userdb::UserDatabase,
};
pub use device::{
    uv390::Uv390Codeplug, uv390_callsign::CallsignDb, CodecError, CodecWarning, DecodeResult,
    DeviceCodec, EncodeResult,
};
pub use formats::{load_rdt, save_rdt, Metadata};
pub use memmap::MemoryMap;

/// dmrplug version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
