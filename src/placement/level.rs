use std::fmt;

use serde::{Deserialize, Serialize};

use super::plan::PlanError;

/// Charging station size.
///
/// Serialized as its number (1, 2 or 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StationLevel {
    Level1,
    Level2,
    Level3,
}

impl StationLevel {
    pub const ALL: [StationLevel; 3] = [Self::Level1, Self::Level2, Self::Level3];

    /// Parses a level number.
    ///
    /// # Examples
    ///
    /// ```
    /// use voltpath::placement::StationLevel;
    ///
    /// assert_eq!(StationLevel::from_index(3).map(|l| l.ports()), Ok(8));
    /// assert!(StationLevel::from_index(4).is_err());
    /// ```
    pub fn from_index(n: u8) -> Result<Self, PlanError> {
        match n {
            1 => Ok(Self::Level1),
            2 => Ok(Self::Level2),
            3 => Ok(Self::Level3),
            other => Err(PlanError::InvalidLevel(other)),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Level1 => 1,
            Self::Level2 => 2,
            Self::Level3 => 3,
        }
    }

    /// Number of charging ports, which is also the waiting-queue capacity.
    pub fn ports(self) -> u32 {
        match self {
            Self::Level1 => 2,
            Self::Level2 => 4,
            Self::Level3 => 8,
        }
    }

    /// Cars per day the station can serve, used by the optimizer.
    pub fn daily_capacity(self) -> f64 {
        match self {
            Self::Level1 => 48.0,
            Self::Level2 => 96.0,
            Self::Level3 => 192.0,
        }
    }

    /// Position of this level in a segment's cost triple.
    pub fn cost_index(self) -> usize {
        usize::from(self.index() - 1)
    }
}

impl TryFrom<u8> for StationLevel {
    type Error = PlanError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_index(n)
    }
}

impl From<StationLevel> for u8 {
    fn from(level: StationLevel) -> Self {
        level.index()
    }
}

impl fmt::Display for StationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", self.index())
    }
}
