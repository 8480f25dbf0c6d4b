use serde::{Deserialize, Serialize};

/// A validated Roblox place identifier: a non-empty string of ASCII digits.
///
/// The digit string is kept verbatim rather than parsed into an integer so
/// that leading zeros and ids wider than `u64` pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

/// Rejected place id input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPlaceId {
    Empty,
    NotNumeric,
}

impl std::fmt::Display for InvalidPlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Please enter a Place ID"),
            Self::NotNumeric => write!(f, "Place ID must be a valid number"),
        }
    }
}

impl std::error::Error for InvalidPlaceId {}

impl PlaceId {
    /// Parse a place id. The input must match `^\d+$` exactly; callers that
    /// accept user-typed text trim it first.
    pub fn parse(raw: &str) -> Result<Self, InvalidPlaceId> {
        if raw.is_empty() {
            return Err(InvalidPlaceId::Empty);
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidPlaceId::NotNumeric);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PlaceId {
    type Err = InvalidPlaceId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlaceId {
    type Error = InvalidPlaceId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.0
    }
}
