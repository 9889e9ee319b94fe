use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A boot entry identifier as the firmware stores it: a 16-bit number, written
/// as exactly four hex digits (`Boot0000` through `BootFFFF`).
///
/// Parsing is case-insensitive; [`Display`](fmt::Display) renders the
/// canonical uppercase form. Both the read path (entry parsing) and the write
/// path (order commit) go through [`FromStr`], so the two cannot disagree on
/// what a legal identifier is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BootId(u16);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid boot id {0:?}: expected exactly 4 hex digits")]
pub struct InvalidBootId(pub String);

impl BootId {
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for BootId {
    fn from(raw: u16) -> Self {
        BootId(raw)
    }
}

impl FromStr for BootId {
    type Err = InvalidBootId;

    fn from_str(s: &str) -> Result<Self, InvalidBootId> {
        // `from_str_radix` alone would accept signs and shorter strings.
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidBootId(s.into()));
        }
        let raw = u16::from_str_radix(s, 16).map_err(|_| InvalidBootId(s.into()))?;
        Ok(BootId(raw))
    }
}

impl fmt::Display for BootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

impl Serialize for BootId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BootId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
