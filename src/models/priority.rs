use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Incident priority tier.
///
/// Ordered by severity: `Critical < Medium < Low`, matching the numeric codes
/// 1, 2 and 3. Serialized as its numeric code.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(ascii_case_insensitive)]
pub enum Priority {
    Critical = 1,
    Medium = 2,
    Low = 3,
}

impl Priority {
    /// Number of priority tiers
    pub const COUNT: usize = 3;

    /// Numeric code (1 = most severe)
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Static display name
    pub fn name(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Zero-based position, used as a row/column index
    pub fn index(&self) -> usize {
        self.code() as usize - 1
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Priority::Critical),
            2 => Some(Priority::Medium),
            3 => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index + 1).ok().and_then(Self::from_code)
    }

    /// All tiers, most severe first
    pub fn all() -> impl Iterator<Item = Priority> {
        Priority::iter()
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Priority::from_code(code).ok_or_else(|| format!("invalid priority code {code}, expected 1, 2 or 3"))
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.code()
    }
}
