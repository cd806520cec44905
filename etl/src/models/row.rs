//! The flat per-delivery output row.

use serde::{Deserialize, Serialize};

/// Output column names, in order.
pub const COLUMNS: [&str; 32] = [
    "match_number",
    "date",
    "gender",
    "match_type",
    "teams",
    "team1",
    "team2",
    "team_batting",
    "team_bowling",
    "venue",
    "toss_winner",
    "toss_decision",
    "umpires",
    "batter",
    "bowler",
    "non_striker",
    "over",
    "runs_batter",
    "runs_extras",
    "runs_total",
    "legbyes",
    "byes",
    "no of balls",
    "noballs",
    "wides",
    "player_out",
    "kind",
    "fielders",
    "winner",
    "player_of_match",
    "iswicket_delivery",
    "won_by",
];

/// One delivery with its match and innings context repeated.
///
/// Field order matches [`COLUMNS`]; serde serializes structs in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    pub match_number: String,
    pub date: String,
    pub gender: String,
    pub match_type: String,
    pub teams: String,
    pub team1: String,
    pub team2: String,
    pub team_batting: String,
    pub team_bowling: String,
    pub venue: String,
    pub toss_winner: String,
    pub toss_decision: String,
    pub umpires: String,
    pub batter: String,
    pub bowler: String,
    pub non_striker: String,
    pub over: Option<i64>,
    pub runs_batter: Option<i64>,
    pub runs_extras: Option<i64>,
    pub runs_total: Option<i64>,
    pub legbyes: i64,
    pub byes: i64,
    #[serde(rename = "no of balls")]
    pub no_of_balls: usize,
    pub noballs: i64,
    pub wides: i64,
    pub player_out: String,
    pub kind: String,
    pub fielders: String,
    pub winner: String,
    pub player_of_match: String,
    pub iswicket_delivery: u8,
    pub won_by: String,
}

impl FlatRow {
    pub fn is_wicket_delivery(&self) -> bool {
        self.iswicket_delivery == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_header_matches_columns() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(FlatRow::default()).unwrap();
        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header = data.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }

    #[test]
    fn test_column_names_unique() {
        let mut names = COLUMNS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COLUMNS.len());
    }
}
