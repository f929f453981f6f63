// Callsign database image for the MD-UV390 family: a fixed 14 MiB block
// the radio searches offline to show callsign and name for a received
// DMR ID. Entries are sorted ascending by ID; a 4096-slot index of
// (12-bit ID prefix, 20-bit entry position) pairs narrows the search.

use super::CodecWarning;
use crate::bitwise::elements::{read_ascii, read_u24_le, write_ascii, write_u24_le};
use crate::core::contact::DMR_ID_MAX;
use crate::core::userdb::{User, UserDatabase};
use crate::memmap::MemoryMap;

/// Total callsign database image size
pub const DB_IMAGE_SIZE: usize = 0xE0_0000;

/// Most entries the image can hold
pub const CALLSIGN_CAPACITY: usize = 122_197;

const INDEX_CAPACITY: usize = 4096;
const INDEX_OFFSET: usize = 0x0003;
const INDEX_ENTRY_SIZE: usize = 4;
const ENTRY_OFFSET: usize = 0x4004;
const ENTRY_SIZE: usize = 120;
const CALL_SIZE: usize = 16;
const NAME_SIZE: usize = 100;
const FILL_BYTE: u8 = 0xFF;

/// The ID prefix an index slot covers: the top 12 of the 24 ID bits
fn prefix_of(id: u32) -> u16 {
    (id >> 12) as u16
}

/// Pack one index entry: 12-bit ID prefix, 20-bit entry position
fn pack_index(prefix: u16, position: usize) -> [u8; 4] {
    [
        (prefix >> 4) as u8,
        ((prefix as u8) << 4) | ((position >> 16) & 0x0F) as u8,
        (position >> 8) as u8,
        position as u8,
    ]
}

fn unpack_index(data: &[u8]) -> (u16, usize) {
    let prefix = ((data[0] as u16) << 4) | ((data[1] as u16) >> 4);
    let position =
        (((data[1] & 0x0F) as usize) << 16) | ((data[2] as usize) << 8) | data[3] as usize;
    (prefix, position)
}

/// An encoded callsign database image. Lookups read straight from the
/// binary form, the same walk the radio firmware performs.
#[derive(Debug, Clone)]
pub struct CallsignDb {
    image: MemoryMap,
}

impl CallsignDb {
    /// Encode a user database, keeping at most `limit` entries and never
    /// more than the image capacity. Cuts beyond that are reported with a
    /// warning; users with an out-of-range ID are skipped. The input is
    /// already ID-sorted, which the index layout requires.
    pub fn from_user_db(db: &UserDatabase, limit: usize) -> (Self, Vec<CodecWarning>) {
        let mut warnings = Vec::new();
        let mut image = MemoryMap::new_filled(DB_IMAGE_SIZE, FILL_BYTE);

        let capacity = limit.min(CALLSIGN_CAPACITY);
        if db.len() > capacity {
            tracing::warn!(
                count = db.len(),
                capacity,
                "user database does not fit the callsign image"
            );
            warnings.push(CodecWarning::Truncated {
                table: "callsign db",
                capacity,
                count: db.len(),
            });
        }

        let mut position = 0usize;
        let mut index_slot = 0usize;
        let mut last_prefix = None;
        for (i, user) in db.users().iter().take(capacity).enumerate() {
            if user.id == 0 || user.id > DMR_ID_MAX {
                tracing::warn!(id = user.id, call = %user.call, "skipping out-of-range DMR ID");
                warnings.push(CodecWarning::InvalidRecord {
                    table: "callsign db",
                    index: i,
                    reason: format!("DMR ID {} out of range", user.id),
                });
                continue;
            }

            let mut entry = [FILL_BYTE; ENTRY_SIZE];
            entry[0x00..0x03].copy_from_slice(&write_u24_le(user.id));
            write_ascii(&mut entry[0x04..0x04 + CALL_SIZE], &user.call);
            write_ascii(&mut entry[0x14..0x14 + NAME_SIZE], &user.name);
            // Capacity math guarantees the entry fits, the write cannot fail
            let _ = image.set_bytes(ENTRY_OFFSET + position * ENTRY_SIZE, &entry);

            // Index the first entry of every ID prefix
            let prefix = prefix_of(user.id);
            if last_prefix != Some(prefix) && index_slot < INDEX_CAPACITY {
                let _ = image.set_bytes(
                    INDEX_OFFSET + index_slot * INDEX_ENTRY_SIZE,
                    &pack_index(prefix, position),
                );
                index_slot += 1;
                last_prefix = Some(prefix);
            }
            position += 1;
        }

        // Entry count, u24 big endian
        let count = position as u32;
        let _ = image.set_bytes(0, &[(count >> 16) as u8, (count >> 8) as u8, count as u8]);

        (Self { image }, warnings)
    }

    /// Wrap an existing image, e.g. one read back from the radio
    pub fn from_image(image: MemoryMap) -> Self {
        Self { image }
    }

    /// Number of entries in the database
    pub fn len(&self) -> usize {
        match self.image.get(0, 3) {
            Ok(data) => {
                let count =
                    ((data[0] as usize) << 16) | ((data[1] as usize) << 8) | data[2] as usize;
                // A blank (0xFF) image carries no entries
                if count > CALLSIGN_CAPACITY {
                    0
                } else {
                    count
                }
            }
            Err(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn image(&self) -> &MemoryMap {
        &self.image
    }

    pub fn into_image(self) -> MemoryMap {
        self.image
    }

    fn entry(&self, position: usize) -> Option<User> {
        let data = self.image.get(ENTRY_OFFSET + position * ENTRY_SIZE, ENTRY_SIZE).ok()?;
        let id = read_u24_le(data).ok()?;
        if id == DMR_ID_MAX {
            return None;
        }
        Some(User {
            id,
            call: read_ascii(&data[0x04..0x04 + CALL_SIZE]),
            name: read_ascii(&data[0x14..0x14 + NAME_SIZE]),
        })
    }

    fn entry_id(&self, position: usize) -> Option<u32> {
        let data = self.image.get(ENTRY_OFFSET + position * ENTRY_SIZE, 3).ok()?;
        read_u24_le(data).ok()
    }

    /// Look up a DMR ID. The prefix index narrows the range, a binary
    /// search over the sorted entries finishes the job.
    pub fn lookup(&self, id: u32) -> Option<User> {
        let count = self.len();
        if count == 0 {
            return None;
        }

        let (mut lo, mut hi) = self.index_range(prefix_of(id), count);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.entry_id(mid)?.cmp(&id) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return self.entry(mid),
            }
        }
        None
    }

    /// Entry range covered by an ID prefix according to the index, or the
    /// whole table if the index has no slot for it
    fn index_range(&self, prefix: u16, count: usize) -> (usize, usize) {
        let mut start = None;
        for slot in 0..INDEX_CAPACITY {
            let Ok(data) = self
                .image
                .get(INDEX_OFFSET + slot * INDEX_ENTRY_SIZE, INDEX_ENTRY_SIZE)
            else {
                break;
            };
            // Unwritten slots are 0xFF fill; prefix 0xFFF with the top
            // position bits set cannot occur for a valid 24-bit ID table
            if data.iter().all(|&b| b == FILL_BYTE) {
                break;
            }
            let (slot_prefix, position) = unpack_index(data);
            if slot_prefix == prefix {
                start = Some(position);
            } else if slot_prefix > prefix {
                return match start {
                    Some(start) => (start, position.min(count)),
                    None => (0, 0),
                };
            }
        }
        match start {
            Some(start) => (start, count),
            None => (0, count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u32, call: &str, name: &str) -> User {
        User {
            id,
            call: call.to_string(),
            name: name.to_string(),
        }
    }

    fn sample_db() -> UserDatabase {
        UserDatabase::new(vec![
            user(262999, "DL1ABC", "Hans, Berlin"),
            user(2623001, "DM3MAT", "Hannes, Berlin"),
            user(2623002, "DB3XY", "Erik, Potsdam"),
            user(3100001, "W1AW", "ARRL HQ"),
        ])
    }

    #[test]
    fn test_header_and_first_entry() {
        let (db, warnings) = CallsignDb::from_user_db(&sample_db(), CALLSIGN_CAPACITY);
        assert!(warnings.is_empty());
        assert_eq!(db.len(), 4);

        // Count is big endian
        assert_eq!(db.image().get(0, 3).unwrap(), &[0, 0, 4]);

        // First entry: lowest ID
        let entry = db.image().get(ENTRY_OFFSET, ENTRY_SIZE).unwrap();
        assert_eq!(&entry[0..3], &write_u24_le(262999));
        assert_eq!(&entry[0x04..0x0B], b"DL1ABC\0");
        assert_eq!(read_ascii(&entry[0x14..0x14 + NAME_SIZE]), "Hans, Berlin");

        // First index slot covers the first entry's prefix
        let index = db.image().get(INDEX_OFFSET, 4).unwrap();
        assert_eq!(unpack_index(index), (prefix_of(262999), 0));
    }

    #[test]
    fn test_index_packing() {
        let packed = pack_index(0xABC, 0xF1234);
        assert_eq!(unpack_index(&packed), (0xABC, 0xF1234));
        assert_eq!(packed[0], 0xAB);
        assert_eq!(packed[1], 0xCF);
    }

    #[test]
    fn test_lookup() {
        let (db, _) = CallsignDb::from_user_db(&sample_db(), CALLSIGN_CAPACITY);

        assert_eq!(db.lookup(2623001).unwrap().call, "DM3MAT");
        assert_eq!(db.lookup(262999).unwrap().name, "Hans, Berlin");
        assert_eq!(db.lookup(3100001).unwrap().call, "W1AW");
        assert!(db.lookup(2623000).is_none());
        assert!(db.lookup(1).is_none());
        assert!(db.lookup(0xFFFFFF).is_none());
    }

    #[test]
    fn test_empty_database() {
        let (db, warnings) = CallsignDb::from_user_db(&UserDatabase::default(), CALLSIGN_CAPACITY);
        assert!(warnings.is_empty());
        assert!(db.is_empty());
        assert!(db.lookup(262999).is_none());
    }

    #[test]
    fn test_blank_image_reads_empty() {
        let db = CallsignDb::from_image(MemoryMap::new_filled(DB_IMAGE_SIZE, FILL_BYTE));
        assert_eq!(db.len(), 0);
        assert!(db.lookup(1).is_none());
    }

    #[test]
    fn test_truncation_at_capacity() {
        let users: Vec<User> = (0u32..200_000).map(|i| user(i + 1, "CALL", "")).collect();
        let (db, warnings) = CallsignDb::from_user_db(&UserDatabase::new(users), CALLSIGN_CAPACITY);

        assert_eq!(db.len(), CALLSIGN_CAPACITY);
        assert!(warnings.iter().any(|w| matches!(
            w,
            CodecWarning::Truncated {
                table: "callsign db",
                capacity: CALLSIGN_CAPACITY,
                ..
            }
        )));
        // The last kept entry is still reachable
        assert!(db.lookup(CALLSIGN_CAPACITY as u32).is_some());
        assert!(db.lookup(CALLSIGN_CAPACITY as u32 + 1).is_none());
    }

    #[test]
    fn test_explicit_limit() {
        let (db, warnings) = CallsignDb::from_user_db(&sample_db(), 2);

        assert_eq!(db.len(), 2);
        assert!(db.lookup(262999).is_some());
        assert!(db.lookup(2623001).is_some());
        assert!(db.lookup(3100001).is_none());
        assert!(warnings
            .iter()
            .any(|w| matches!(w, CodecWarning::Truncated { capacity: 2, .. })));
    }

    #[test]
    fn test_out_of_range_id_skipped() {
        let db = UserDatabase::new(vec![user(0, "BAD", ""), user(100, "OK", "")]);
        let (db, warnings) = CallsignDb::from_user_db(&db, CALLSIGN_CAPACITY);

        assert_eq!(db.len(), 1);
        assert_eq!(db.lookup(100).unwrap().call, "OK");
        assert!(warnings
            .iter()
            .any(|w| matches!(w, CodecWarning::InvalidRecord { .. })));
    }
}
