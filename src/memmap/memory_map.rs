// Byte buffer holding a complete binary codeplug image

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryMapError {
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),
}

pub type Result<T> = std::result::Result<T, MemoryMapError>;

/// Byte buffer for a binary codeplug image. Tables are addressed by fixed
/// byte offsets; the fill byte of unused space is format specific and
/// chosen by the device codec at allocation time.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryMap {
    data: Vec<u8>,
}

impl MemoryMap {
    /// Create a memory map from existing bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Create a memory map of `size` bytes, every byte set to `fill`
    pub fn new_filled(size: usize, fill: u8) -> Self {
        Self {
            data: vec![fill; size],
        }
    }

    /// Get the size of the memory map
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the memory map is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get `length` bytes starting at `start`
    pub fn get(&self, start: usize, length: usize) -> Result<&[u8]> {
        let end = start
            .checked_add(length)
            .ok_or(MemoryMapError::IndexOutOfBounds(start))?;
        if end > self.data.len() {
            return Err(MemoryMapError::IndexOutOfBounds(end));
        }
        Ok(&self.data[start..end])
    }

    /// Get a mutable slice of `length` bytes starting at `start`
    pub fn get_mut(&mut self, start: usize, length: usize) -> Result<&mut [u8]> {
        let end = start
            .checked_add(length)
            .ok_or(MemoryMapError::IndexOutOfBounds(start))?;
        if end > self.data.len() {
            return Err(MemoryMapError::IndexOutOfBounds(end));
        }
        Ok(&mut self.data[start..end])
    }

    /// Copy `bytes` into the map starting at `pos`
    pub fn set_bytes(&mut self, pos: usize, bytes: &[u8]) -> Result<()> {
        self.get_mut(pos, bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Fill `length` bytes starting at `pos` with `fill`
    pub fn fill_range(&mut self, pos: usize, length: usize, fill: u8) -> Result<()> {
        self.get_mut(pos, length)?.fill(fill);
        Ok(())
    }

    /// Get the entire memory map as raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the entire memory map as an owned Vec<u8>
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Hex dump of the byte range, for the inspection utility
    pub fn printable(&self, start: usize, end: usize) -> String {
        hexdump(&self.data[start.min(self.data.len())..end.min(self.data.len())])
    }
}

impl From<Vec<u8>> for MemoryMap {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for MemoryMap {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl AsRef<[u8]> for MemoryMap {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for MemoryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryMap({} bytes)", self.data.len())
    }
}

/// Create a hex dump of bytes (similar to hexdump -C)
fn hexdump(data: &[u8]) -> String {
    let mut output = String::new();

    for (i, chunk) in data.chunks(16).enumerate() {
        output.push_str(&format!("{:08x}  ", i * 16));

        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                output.push(' ');
            }
            output.push_str(&format!("{:02x} ", byte));
        }

        if chunk.len() < 16 {
            for j in chunk.len()..16 {
                if j == 8 {
                    output.push(' ');
                }
                output.push_str("   ");
            }
        }

        output.push_str(" |");
        for byte in chunk {
            if *byte >= 0x20 && *byte <= 0x7e {
                output.push(*byte as char);
            } else {
                output.push('.');
            }
        }
        output.push_str("|\n");
    }

    output
}
