// Channel model: common settings plus a closed analog/digital variant

use super::config::{ContactId, GroupListId, PositioningId, RadioIdId, RoamingZoneId, ScanListId};
use super::power::Power;
use super::signaling::Code;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest valid squelch level
pub const SQUELCH_MAX: u8 = 10;

/// Highest valid DMR color code
pub const COLOR_CODE_MAX: u8 = 15;

/// Admit criterion of an analog channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalogAdmit {
    /// Transmit any time
    Always,
    /// Transmit only if the channel is free
    Free,
    /// Transmit only if the admit tone is present
    Tone,
}

/// Admit criterion of a digital channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigitalAdmit {
    /// Transmit any time
    Always,
    /// Transmit only if the channel is free
    Free,
    /// Transmit only if the channel is free and the color code matches
    ColorCode,
}

/// Analog channel bandwidth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bandwidth {
    /// 12.5 kHz
    Narrow,
    /// 25 kHz
    Wide,
}

/// DMR TDMA time slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSlot {
    Ts1,
    Ts2,
}

impl TimeSlot {
    /// Wire encoding: slot number 1 or 2
    pub fn to_wire(self) -> u8 {
        match self {
            TimeSlot::Ts1 => 1,
            TimeSlot::Ts2 => 2,
        }
    }

    /// Decode the wire value; anything but 1 or 2 yields None
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            1 => Some(TimeSlot::Ts1),
            2 => Some(TimeSlot::Ts2),
            _ => None,
        }
    }
}

/// Settings specific to analog (FM) channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalogSettings {
    pub admit: AnalogAdmit,
    /// Squelch level [0, 10], 0 disables squelch
    pub squelch: u8,
    /// RX CTCSS/DCS code, None = disabled
    pub rx_tone: Option<Code>,
    /// TX CTCSS/DCS code, None = disabled
    pub tx_tone: Option<Code>,
    pub bandwidth: Bandwidth,
    /// APRS-style positioning system used on this channel
    pub aprs: Option<PositioningId>,
}

impl Default for AnalogSettings {
    fn default() -> Self {
        Self {
            admit: AnalogAdmit::Always,
            squelch: 1,
            rx_tone: None,
            tx_tone: None,
            bandwidth: Bandwidth::Narrow,
            aprs: None,
        }
    }
}

/// Settings specific to digital (DMR) channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitalSettings {
    pub admit: DigitalAdmit,
    /// Color code [0, 15]
    pub color_code: u8,
    pub time_slot: TimeSlot,
    /// RX group list, None = none
    pub group_list: Option<GroupListId>,
    /// Default TX contact, None = none
    pub tx_contact: Option<ContactId>,
    /// Positioning (GPS) system, None = disabled
    pub positioning: Option<PositioningId>,
    /// Roaming zone, None = disabled
    pub roaming: Option<RoamingZoneId>,
    /// Radio ID, None = the radio's default ID
    pub radio_id: Option<RadioIdId>,
}

impl Default for DigitalSettings {
    fn default() -> Self {
        Self {
            admit: DigitalAdmit::ColorCode,
            color_code: 1,
            time_slot: TimeSlot::Ts1,
            group_list: None,
            tx_contact: None,
            positioning: None,
            roaming: None,
            radio_id: None,
        }
    }
}

/// Kind-specific part of a channel. Closed set, no downcasting: callers
/// use the `as_analog`/`as_digital` accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChannelMode {
    Analog(AnalogSettings),
    Digital(DigitalSettings),
}

/// A single channel of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel name
    pub name: String,

    /// RX frequency in Hz
    pub rx_hz: u64,

    /// TX frequency in Hz
    pub tx_hz: u64,

    /// Power setting
    pub power: Power,

    /// TX timeout in seconds, 0 = disabled
    pub tx_timeout: u16,

    /// RX only flag
    pub rx_only: bool,

    /// Default scan list, None = none
    pub scan_list: Option<ScanListId>,

    /// Analog or digital settings
    pub mode: ChannelMode,
}

impl Channel {
    /// Create an analog channel with default settings
    pub fn analog(name: impl Into<String>, rx_hz: u64, tx_hz: u64) -> Self {
        Self {
            name: name.into(),
            rx_hz,
            tx_hz,
            power: Power::default(),
            tx_timeout: 0,
            rx_only: false,
            scan_list: None,
            mode: ChannelMode::Analog(AnalogSettings::default()),
        }
    }

    /// Create a digital channel with default settings
    pub fn digital(name: impl Into<String>, rx_hz: u64, tx_hz: u64) -> Self {
        Self {
            name: name.into(),
            rx_hz,
            tx_hz,
            power: Power::default(),
            tx_timeout: 0,
            rx_only: false,
            scan_list: None,
            mode: ChannelMode::Digital(DigitalSettings::default()),
        }
    }

    pub fn is_analog(&self) -> bool {
        matches!(self.mode, ChannelMode::Analog(_))
    }

    pub fn is_digital(&self) -> bool {
        matches!(self.mode, ChannelMode::Digital(_))
    }

    pub fn as_analog(&self) -> Option<&AnalogSettings> {
        match &self.mode {
            ChannelMode::Analog(settings) => Some(settings),
            _ => None,
        }
    }

    pub fn as_analog_mut(&mut self) -> Option<&mut AnalogSettings> {
        match &mut self.mode {
            ChannelMode::Analog(settings) => Some(settings),
            _ => None,
        }
    }

    pub fn as_digital(&self) -> Option<&DigitalSettings> {
        match &self.mode {
            ChannelMode::Digital(settings) => Some(settings),
            _ => None,
        }
    }

    pub fn as_digital_mut(&mut self) -> Option<&mut DigitalSettings> {
        match &mut self.mode {
            ChannelMode::Digital(settings) => Some(settings),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.mode {
            ChannelMode::Analog(a) => match a.bandwidth {
                Bandwidth::Narrow => "NFM",
                Bandwidth::Wide => "FM",
            },
            ChannelMode::Digital(_) => "DMR",
        };
        write!(
            f,
            "{} ({}) rx {}.{:06} tx {}.{:06} {}",
            self.name,
            kind,
            self.rx_hz / 1_000_000,
            self.rx_hz % 1_000_000,
            self.tx_hz / 1_000_000,
            self.tx_hz % 1_000_000,
            self.power
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let ch = Channel::analog("2m simplex", 145_500_000, 145_500_000);
        assert!(ch.is_analog());
        assert!(!ch.is_digital());
        assert!(ch.as_analog().is_some());
        assert!(ch.as_digital().is_none());

        let ch = Channel::digital("TG9 local", 438_600_000, 430_000_000);
        assert!(ch.is_digital());
        assert_eq!(ch.as_digital().unwrap().color_code, 1);
    }

    #[test]
    fn test_time_slot_wire() {
        assert_eq!(TimeSlot::Ts1.to_wire(), 1);
        assert_eq!(TimeSlot::Ts2.to_wire(), 2);
        assert_eq!(TimeSlot::from_wire(2), Some(TimeSlot::Ts2));
        assert_eq!(TimeSlot::from_wire(0), None);
        assert_eq!(TimeSlot::from_wire(3), None);
    }

    #[test]
    fn test_display() {
        let ch = Channel::analog("Test", 145_600_000, 145_000_000);
        let s = format!("{}", ch);
        assert!(s.contains("145.600000"));
        assert!(s.contains("145.000000"));
    }
}
