//! Winner split rules: how many positions are paid, and at what percentage.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named payout split policy.
///
/// Each rule maps to a fixed table of percentages, one per paid position,
/// always summing to 100. The percentages apply to the distributable pool
/// (prize pool minus the platform fee), not the raw pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitRule {
    WinnerTakesAll,
    #[serde(rename = "top_2")]
    Top2,
    #[serde(rename = "top_3")]
    Top3,
    #[serde(rename = "top_4")]
    Top4,
    #[serde(rename = "top_5")]
    Top5,
    #[serde(rename = "top_10")]
    Top10,
}

impl SplitRule {
    /// The payout table: percentage of the distributable pool per position,
    /// index 0 = first place.
    pub fn payout_percentages(self) -> &'static [u8] {
        match self {
            SplitRule::WinnerTakesAll => &[100],
            SplitRule::Top2 => &[60, 40],
            SplitRule::Top3 => &[50, 30, 20],
            SplitRule::Top4 => &[40, 30, 20, 10],
            SplitRule::Top5 => &[40, 25, 15, 12, 8],
            SplitRule::Top10 => &[25, 18, 14, 11, 9, 7, 6, 4, 3, 3],
        }
    }

    /// Maximum number of paid positions under this rule.
    pub fn max_winners(self) -> usize {
        self.payout_percentages().len()
    }

    pub const ALL: [SplitRule; 6] = [
        SplitRule::WinnerTakesAll,
        SplitRule::Top2,
        SplitRule::Top3,
        SplitRule::Top4,
        SplitRule::Top5,
        SplitRule::Top10,
    ];
}

impl fmt::Display for SplitRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SplitRule::WinnerTakesAll => "winner_takes_all",
            SplitRule::Top2 => "top_2",
            SplitRule::Top3 => "top_3",
            SplitRule::Top4 => "top_4",
            SplitRule::Top5 => "top_5",
            SplitRule::Top10 => "top_10",
        };
        f.write_str(name)
    }
}
