// Device codecs: per-family binary codeplug encoders/decoders

pub mod context;
pub mod registry;
pub mod uv390;
pub mod uv390_callsign;

use crate::bitwise::{BcdError, ElementError};
use crate::core::config::Config;
use crate::core::signaling::SignalingError;
use crate::memmap::{MemoryMap, MemoryMapError};
use std::fmt;
use thiserror::Error;

pub use context::Context;
pub use registry::{list_devices, DeviceInfo};

/// Fatal codec conditions. Any of these aborts the encode or decode call;
/// no partial image or configuration is returned.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Table \"{table}\" exceeds its capacity: {count} > {capacity}")]
    CapacityExceeded {
        table: &'static str,
        capacity: usize,
        count: usize,
    },

    #[error("{entity} \"{name}\": field {field} out of range: {value} (max {max})")]
    FieldOutOfRange {
        entity: &'static str,
        name: String,
        field: &'static str,
        value: u64,
        max: u64,
    },

    #[error("{entity} name must not be empty, the slot would read back as unused")]
    EmptyName { entity: &'static str },

    #[error("Malformed image: {0}")]
    MalformedImage(String),

    #[error("Signaling error: {0}")]
    Signaling(#[from] SignalingError),

    #[error("BCD error: {0}")]
    Bcd(#[from] BcdError),

    #[error("Element error: {0}")]
    Element(#[from] ElementError),

    #[error("Memory map error: {0}")]
    Memory(#[from] MemoryMapError),
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Recoverable conditions accumulated alongside a best-effort result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecWarning {
    /// A record failed its validity predicate and was skipped or a field
    /// was defaulted
    InvalidRecord {
        table: &'static str,
        index: usize,
        reason: String,
    },

    /// A cross-reference index points outside its target table; the
    /// reference resolves to none
    UnresolvedReference {
        table: &'static str,
        field: &'static str,
        value: usize,
    },

    /// A logical list was longer than its binary capacity and was cut
    Truncated {
        table: &'static str,
        capacity: usize,
        count: usize,
    },

    /// A configuration feature this device family cannot represent
    Unsupported { reason: String },
}

impl fmt::Display for CodecWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecWarning::InvalidRecord {
                table,
                index,
                reason,
            } => {
                write!(f, "invalid record in {} at {}: {}", table, index, reason)
            }
            CodecWarning::UnresolvedReference {
                table,
                field,
                value,
            } => write!(
                f,
                "{} points outside {} (index {}), resolved to none",
                field, table, value
            ),
            CodecWarning::Truncated {
                table,
                capacity,
                count,
            } => write!(f, "{} truncated to {} of {} entries", table, capacity, count),
            CodecWarning::Unsupported { reason } => write!(f, "unsupported: {}", reason),
        }
    }
}

/// Result of encoding a configuration into a binary image
#[derive(Debug)]
pub struct EncodeResult {
    pub image: MemoryMap,
    pub warnings: Vec<CodecWarning>,
}

/// Result of decoding a binary image into a configuration
#[derive(Debug)]
pub struct DecodeResult {
    pub config: Config,
    pub warnings: Vec<CodecWarning>,
}

/// A binary codeplug codec for one device family
pub trait DeviceCodec {
    /// Device vendor name
    fn vendor(&self) -> &str;

    /// Device model name
    fn model(&self) -> &str;

    /// Size of the complete binary image in bytes
    fn image_size(&self) -> usize;

    /// Encode the configuration into a fresh binary image
    fn encode(&self, config: &Config) -> CodecResult<EncodeResult>;

    /// Decode a binary image into a configuration graph
    fn decode(&self, image: &MemoryMap) -> CodecResult<DecodeResult>;

    /// Printable device name
    fn name(&self) -> String {
        format!("{} {}", self.vendor(), self.model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_table_and_field() {
        let err = CodecError::CapacityExceeded {
            table: "zones",
            capacity: 250,
            count: 251,
        };
        let msg = err.to_string();
        assert!(msg.contains("zones"));
        assert!(msg.contains("250"));

        let err = CodecError::FieldOutOfRange {
            entity: "channel",
            name: "TG9".into(),
            field: "color_code",
            value: 16,
            max: 15,
        };
        let msg = err.to_string();
        assert!(msg.contains("color_code"));
        assert!(msg.contains("TG9"));
    }

    #[test]
    fn test_warning_display() {
        let warning = CodecWarning::Truncated {
            table: "callsign db",
            capacity: 122197,
            count: 200000,
        };
        assert!(warning.to_string().contains("122197"));
    }
}
