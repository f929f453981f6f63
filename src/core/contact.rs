// Contact model: DMR calls and DTMF numbers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest valid DMR ID (24 bit)
pub const DMR_ID_MAX: u32 = 0xFF_FFFF;

/// DMR call type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallType {
    Group,
    Private,
    AllCall,
}

impl CallType {
    /// Wire encoding: 1 = group, 2 = private, 3 = all call
    pub fn to_wire(self) -> u8 {
        match self {
            CallType::Group => 1,
            CallType::Private => 2,
            CallType::AllCall => 3,
        }
    }

    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            1 => Some(CallType::Group),
            2 => Some(CallType::Private),
            3 => Some(CallType::AllCall),
            _ => None,
        }
    }
}

/// A DMR contact: a talk group, private call or all call destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitalContact {
    pub name: String,
    pub call_type: CallType,
    /// DMR ID, [1, 2^24 - 1]
    pub number: u32,
    /// Ring on incoming call
    pub rx_tone: bool,
}

/// A DTMF contact. Not representable in every device family; encoders
/// that lack a DTMF table skip these with a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DtmfContact {
    pub name: String,
    /// DTMF digit string (0-9, A-D, *, #)
    pub digits: String,
    pub rx_tone: bool,
}

/// Any contact of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Contact {
    Digital(DigitalContact),
    Dtmf(DtmfContact),
}

impl Contact {
    /// Group call constructor
    pub fn group(name: impl Into<String>, number: u32) -> Self {
        Contact::Digital(DigitalContact {
            name: name.into(),
            call_type: CallType::Group,
            number,
            rx_tone: false,
        })
    }

    /// Private call constructor
    pub fn private(name: impl Into<String>, number: u32) -> Self {
        Contact::Digital(DigitalContact {
            name: name.into(),
            call_type: CallType::Private,
            number,
            rx_tone: false,
        })
    }

    /// All call constructor
    pub fn all_call(name: impl Into<String>, number: u32) -> Self {
        Contact::Digital(DigitalContact {
            name: name.into(),
            call_type: CallType::AllCall,
            number,
            rx_tone: false,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Contact::Digital(c) => &c.name,
            Contact::Dtmf(c) => &c.name,
        }
    }

    pub fn as_digital(&self) -> Option<&DigitalContact> {
        match self {
            Contact::Digital(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_dtmf(&self) -> bool {
        matches!(self, Contact::Dtmf(_))
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contact::Digital(c) => {
                let kind = match c.call_type {
                    CallType::Group => "group",
                    CallType::Private => "private",
                    CallType::AllCall => "all call",
                };
                write!(f, "{} ({} {})", c.name, kind, c.number)
            }
            Contact::Dtmf(c) => write!(f, "{} (DTMF {})", c.name, c.digits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_type_wire() {
        for ct in [CallType::Group, CallType::Private, CallType::AllCall] {
            assert_eq!(CallType::from_wire(ct.to_wire()), Some(ct));
        }
        assert_eq!(CallType::from_wire(0), None);
        assert_eq!(CallType::from_wire(4), None);
    }

    #[test]
    fn test_constructors() {
        let tg = Contact::group("Worldwide", 91);
        assert_eq!(tg.name(), "Worldwide");
        assert_eq!(tg.as_digital().unwrap().call_type, CallType::Group);
        assert!(!tg.is_dtmf());

        let dtmf = Contact::Dtmf(DtmfContact {
            name: "Echolink".into(),
            digits: "*123#".into(),
            rx_tone: false,
        });
        assert!(dtmf.is_dtmf());
        assert!(dtmf.as_digital().is_none());
    }
}
