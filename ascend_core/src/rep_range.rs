//! The ordered rep-range ladder used by double progression.
//!
//! Ranges climb `2-4 → 4-6 → 6-8 → 8-10 → 10-12 → 12-15 → 15+`. The
//! terminal `15+` range is its own successor.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A target rep range
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RepRange {
    #[serde(rename = "2-4")]
    TwoToFour,
    #[serde(rename = "4-6")]
    FourToSix,
    #[serde(rename = "6-8")]
    SixToEight,
    #[serde(rename = "8-10")]
    EightToTen,
    #[serde(rename = "10-12")]
    TenToTwelve,
    #[serde(rename = "12-15")]
    TwelveToFifteen,
    #[serde(rename = "15+")]
    FifteenPlus,
}

impl RepRange {
    /// Every range in ladder order
    pub const ALL: [RepRange; 7] = [
        RepRange::TwoToFour,
        RepRange::FourToSix,
        RepRange::SixToEight,
        RepRange::EightToTen,
        RepRange::TenToTwelve,
        RepRange::TwelveToFifteen,
        RepRange::FifteenPlus,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Canonical string form, e.g. `"8-10"`
    pub fn as_str(self) -> &'static str {
        match self {
            RepRange::TwoToFour => "2-4",
            RepRange::FourToSix => "4-6",
            RepRange::SixToEight => "6-8",
            RepRange::EightToTen => "8-10",
            RepRange::TenToTwelve => "10-12",
            RepRange::TwelveToFifteen => "12-15",
            RepRange::FifteenPlus => "15+",
        }
    }

    /// Rep count that counts as "top of the range".
    ///
    /// `15+` has no ceiling; 16 is used for comparisons.
    pub fn upper_bound(self) -> u32 {
        match self {
            RepRange::TwoToFour => 4,
            RepRange::FourToSix => 6,
            RepRange::SixToEight => 8,
            RepRange::EightToTen => 10,
            RepRange::TenToTwelve => 12,
            RepRange::TwelveToFifteen => 15,
            RepRange::FifteenPlus => 16,
        }
    }

    /// Rep count logged when the exact number was not counted
    pub fn midpoint(self) -> u32 {
        match self {
            RepRange::TwoToFour => 3,
            RepRange::FourToSix => 5,
            RepRange::SixToEight => 7,
            RepRange::EightToTen => 9,
            RepRange::TenToTwelve => 11,
            RepRange::TwelveToFifteen => 13,
            RepRange::FifteenPlus => 16,
        }
    }

    /// The range one step up the ladder (`15+` maps to itself)
    pub fn successor(self) -> RepRange {
        Self::ALL
            .get(self.index() + 1)
            .copied()
            .unwrap_or(RepRange::FifteenPlus)
    }

    /// The first range whose successor is `self`.
    ///
    /// `15+` steps back to `12-15`; `2-4` has no predecessor and maps to itself.
    pub fn predecessor(self) -> RepRange {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.successor() == self)
            .unwrap_or(self)
    }
}

impl fmt::Display for RepRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == trimmed)
            .ok_or_else(|| Error::InvalidRepRange(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_bound_matches_range_ceiling() {
        for range in RepRange::ALL {
            if range == RepRange::FifteenPlus {
                continue;
            }
            let ceiling: u32 = range
                .as_str()
                .split('-')
                .nth(1)
                .and_then(|s| s.parse().ok())
                .unwrap();
            assert_eq!(range.upper_bound(), ceiling, "range {}", range);
        }
        assert_eq!(RepRange::FifteenPlus.upper_bound(), 16);
    }

    #[test]
    fn test_successor_ladder() {
        assert_eq!(RepRange::TwoToFour.successor(), RepRange::FourToSix);
        assert_eq!(RepRange::SixToEight.successor(), RepRange::EightToTen);
        assert_eq!(RepRange::TwelveToFifteen.successor(), RepRange::FifteenPlus);
        assert_eq!(RepRange::FifteenPlus.successor(), RepRange::FifteenPlus);
    }

    #[test]
    fn test_predecessor_steps_back_one() {
        assert_eq!(RepRange::EightToTen.predecessor(), RepRange::SixToEight);
        assert_eq!(RepRange::FifteenPlus.predecessor(), RepRange::TwelveToFifteen);
        assert_eq!(RepRange::TwoToFour.predecessor(), RepRange::TwoToFour);
    }

    #[test]
    fn test_midpoints() {
        let mids: Vec<u32> = RepRange::ALL.iter().map(|r| r.midpoint()).collect();
        assert_eq!(mids, vec![3, 5, 7, 9, 11, 13, 16]);
    }

    #[test]
    fn test_parse_known_ranges() {
        for range in RepRange::ALL {
            assert_eq!(range.as_str().parse::<RepRange>().unwrap(), range);
        }
        assert_eq!(" 6-8 ".parse::<RepRange>().unwrap(), RepRange::SixToEight);
    }

    #[test]
    fn test_parse_unknown_range_is_an_error() {
        for bad in ["", "5-7", "15", "20+", "eight"] {
            match bad.parse::<RepRange>() {
                Err(Error::InvalidRepRange(s)) => assert_eq!(s, bad),
                other => panic!("expected InvalidRepRange for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_serde_uses_range_strings() {
        let json = serde_json::to_string(&RepRange::TenToTwelve).unwrap();
        assert_eq!(json, "\"10-12\"");
        let parsed: RepRange = serde_json::from_str("\"15+\"").unwrap();
        assert_eq!(parsed, RepRange::FifteenPlus);
        assert!(serde_json::from_str::<RepRange>("\"7-9\"").is_err());
    }
}
