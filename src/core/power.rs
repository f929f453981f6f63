// Channel power setting

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PowerError {
    #[error("Invalid power setting: {0}")]
    InvalidSetting(String),
}

/// Five-step ordinal power setting. What each step means in watts depends
/// on the radio (e.g. Max > 5 W, High 5 W, Mid 2 W, Low 1 W, Min < 1 W).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Power {
    Min,
    Low,
    Mid,
    High,
    Max,
}

impl Power {
    /// Wire encoding: 0 = Min .. 4 = Max
    pub fn to_wire(self) -> u8 {
        match self {
            Power::Min => 0,
            Power::Low => 1,
            Power::Mid => 2,
            Power::High => 3,
            Power::Max => 4,
        }
    }

    /// Decode the wire value; unknown values yield None
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Power::Min),
            1 => Some(Power::Low),
            2 => Some(Power::Mid),
            3 => Some(Power::High),
            4 => Some(Power::Max),
            _ => None,
        }
    }
}

impl Default for Power {
    fn default() -> Self {
        Power::High
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Power::Min => "Min",
            Power::Low => "Low",
            Power::Mid => "Mid",
            Power::High => "High",
            Power::Max => "Max",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for Power {
    type Err = PowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(Power::Min),
            "low" => Ok(Power::Low),
            "mid" => Ok(Power::Mid),
            "high" => Ok(Power::High),
            "max" => Ok(Power::Max),
            _ => Err(PowerError::InvalidSetting(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_mapping() {
        for power in [Power::Min, Power::Low, Power::Mid, Power::High, Power::Max] {
            assert_eq!(Power::from_wire(power.to_wire()), Some(power));
        }
        assert_eq!(Power::from_wire(5), None);
        assert_eq!(Power::from_wire(0xFF), None);
    }

    #[test]
    fn test_ordering() {
        assert!(Power::Min < Power::Low);
        assert!(Power::High < Power::Max);
    }

    #[test]
    fn test_parse() {
        assert_eq!("High".parse::<Power>().unwrap(), Power::High);
        assert_eq!(" max ".parse::<Power>().unwrap(), Power::Max);
        assert!("5W".parse::<Power>().is_err());
    }
}
