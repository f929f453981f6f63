// Auxiliary referenced entities: positioning systems, roaming zones and
// radio IDs

use super::config::{ChannelId, ContactId};
use serde::{Deserialize, Serialize};

/// A GPS/positioning reporting system. The name is model-only: the
/// binary element does not carry it, so decode synthesizes one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsSystem {
    pub name: String,
    /// Contact the position reports are sent to
    pub destination: Option<ContactId>,
    /// Update period in seconds, 0 = single shot
    pub period: u16,
    /// Channel to revert to for sending the report, None = current
    pub revert: Option<ChannelId>,
}

impl GpsSystem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            destination: None,
            period: 300,
            revert: None,
        }
    }
}

/// An ordered list of digital channels the radio may roam between
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoamingZone {
    pub name: String,
    pub channels: Vec<ChannelId>,
}

impl RoamingZone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: Vec::new(),
        }
    }
}

/// A DMR radio ID the radio can transmit with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadioId {
    pub name: String,
    /// DMR ID, [1, 2^24 - 1]
    pub number: u32,
}

impl RadioId {
    pub fn new(name: impl Into<String>, number: u32) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }
}
