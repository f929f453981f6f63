// .rdt file format handler: the raw binary image followed by a magic
// separator and a base64-encoded JSON metadata trailer. A file without
// the separator loads as a bare image with default metadata.

use super::metadata::Metadata;
use crate::memmap::MemoryMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RdtError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode metadata: {0}")]
    MetadataDecode(String),

    #[error("Failed to parse metadata JSON: {0}")]
    MetadataJson(#[from] serde_json::Error),

    #[error("Failed to decode base64 metadata: {0}")]
    Base64Decode(String),
}

pub type Result<T> = std::result::Result<T, RdtError>;

/// Magic bytes that separate binary data from metadata in .rdt files
pub const MAGIC: &[u8] = b"\x00\xffdmrplug\xeerdt\x00\x01";

/// Load a .rdt file and return the memory map and metadata
pub fn load_rdt(filename: impl AsRef<Path>) -> Result<(MemoryMap, Metadata)> {
    let mut file = File::open(filename)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    if let Some(idx) = find_magic(&data) {
        let binary_data = data[..idx].to_vec();
        let metadata = decode_metadata(&data[idx + MAGIC.len()..])?;
        Ok((MemoryMap::new(binary_data), metadata))
    } else {
        // No trailer, just a raw binary image
        Ok((MemoryMap::new(data), Metadata::default()))
    }
}

/// Save a memory map and metadata to a .rdt file
pub fn save_rdt(filename: impl AsRef<Path>, mmap: &MemoryMap, metadata: &Metadata) -> Result<()> {
    let mut file = File::create(filename)?;

    file.write_all(mmap.as_bytes())?;
    file.write_all(MAGIC)?;

    let metadata_json = metadata.to_json()?;
    let metadata_base64 = BASE64.encode(metadata_json.as_bytes());
    file.write_all(metadata_base64.as_bytes())?;

    Ok(())
}

/// Find the position of MAGIC in the data
fn find_magic(data: &[u8]) -> Option<usize> {
    data.windows(MAGIC.len()).position(|window| window == MAGIC)
}

/// Decode the base64-encoded JSON metadata trailer
fn decode_metadata(encoded: &[u8]) -> Result<Metadata> {
    let decoded = BASE64
        .decode(encoded)
        .map_err(|e| RdtError::Base64Decode(e.to_string()))?;

    let json_str =
        String::from_utf8(decoded).map_err(|e| RdtError::MetadataDecode(e.to_string()))?;

    Metadata::from_json(&json_str).map_err(RdtError::MetadataJson)
}
