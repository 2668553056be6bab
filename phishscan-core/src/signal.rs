use phishscan_scanner::ScanError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Ternary output of a single heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Signal {
    Phishing = -1,
    Neutral = 0,
    Safe = 1,
}

impl Signal {
    pub const fn value(self) -> i8 {
        self as i8
    }

    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Signal::Phishing),
            0 => Some(Signal::Neutral),
            1 => Some(Signal::Safe),
            _ => None,
        }
    }

    /// `Phishing` when the suspicious condition holds, `Safe` otherwise
    pub fn flag(suspicious: bool) -> Self {
        if suspicious { Signal::Phishing } else { Signal::Safe }
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.value()
    }
}

impl From<Signal> for f64 {
    fn from(signal: Signal) -> Self {
        f64::from(signal.value())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>2}", self.value())
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.value())
    }
}

impl<'de> Deserialize<'de> for Signal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i8::deserialize(deserializer)?;
        Signal::from_value(value)
            .ok_or_else(|| serde::de::Error::custom(format!("signal out of range: {}", value)))
    }
}

/// Why a scorer could not produce its signal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// The page or an external lookup could not be reached
    #[error("network fault: {0}")]
    Network(String),

    /// Data was present but could not be interpreted
    #[error("parse fault: {0}")]
    Parse(String),

    /// Required data does not exist for this URL
    #[error("data absent: {0}")]
    Absent(String),
}

impl From<ScanError> for Fault {
    fn from(error: ScanError) -> Self {
        match error {
            ScanError::InvalidUrl(msg) | ScanError::ParseError(msg) => Fault::Parse(msg),
            ScanError::MissingData(msg) => Fault::Absent(msg),
            other if other.is_network() => Fault::Network(other.to_string()),
            other => Fault::Parse(other.to_string()),
        }
    }
}
