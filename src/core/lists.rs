// Channel collections: scan lists, RX group lists and zones

use super::config::{ChannelId, ContactId};
use serde::{Deserialize, Serialize};

/// A channel position inside a scan list. The wire format can express
/// "the currently selected channel" here, so the reference carries that
/// case explicitly instead of a process-wide sentinel channel object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelRef {
    Selected,
    Channel(ChannelId),
}

/// Which channel a scan list transmits on while scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxChannel {
    /// The last active channel
    Last,
    /// The currently selected channel
    Selected,
    /// An explicit channel
    Channel(ChannelId),
}

/// An ordered list of channels to scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanList {
    pub name: String,
    pub members: Vec<ChannelRef>,
    /// Primary priority channel, scanned more often
    pub priority: Option<ChannelRef>,
    /// Secondary priority channel
    pub secondary: Option<ChannelRef>,
    /// Designated TX channel policy
    pub tx: TxChannel,
    /// Signaling hold time in 25 ms steps
    pub hold_time: u8,
    /// Priority sample time in 25 ms steps
    pub sample_time: u8,
}

impl ScanList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            priority: None,
            secondary: None,
            tx: TxChannel::Last,
            hold_time: 20,
            sample_time: 8,
        }
    }
}

/// An ordered list of group-call contacts a digital channel listens to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RxGroupList {
    pub name: String,
    pub contacts: Vec<ContactId>,
}

impl RxGroupList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contacts: Vec::new(),
        }
    }
}

/// A zone: one channel list per VFO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    /// VFO A channel list
    pub a: Vec<ChannelId>,
    /// VFO B channel list
    pub b: Vec<ChannelId>,
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            a: Vec::new(),
            b: Vec::new(),
        }
    }
}
