//! Domain models for the match-record ETL.
//!
//! Input side (decoded from Cricsheet-style JSON):
//!
//! - [`MatchRecord`] - one match: [`MatchInfo`] plus ordered [`Innings`]
//! - [`Over`] / [`Delivery`] - the nested ball-by-ball tree
//! - [`Wicket`] - dismissal events attached to a delivery
//!
//! Output side:
//!
//! - [`FlatRow`] - one row per delivery, see [`COLUMNS`]
//!
//! Every input field is optional. Absent keys and explicit `null`s decode to
//! `None` or an empty collection so the flattener can apply its own defaults.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

mod row;

pub use row::{FlatRow, COLUMNS};

/// Deserialize `null` the same way as a missing key.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Match Record
// =============================================================================

/// A full match as found in one source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub info: MatchInfo,
    #[serde(default, deserialize_with = "nullable")]
    pub innings: Vec<Innings>,
}

impl MatchRecord {
    /// Total number of deliveries across all innings.
    pub fn delivery_count(&self) -> usize {
        self.innings
            .iter()
            .flat_map(|i| i.overs.iter())
            .map(|o| o.deliveries.len())
            .sum()
    }
}

// =============================================================================
// Match Info
// =============================================================================

/// Match-level metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchInfo {
    #[serde(default)]
    pub event: Option<Event>,
    /// Legacy location of the match number.
    #[serde(default)]
    pub match_number: Option<Scalar>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub match_type: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub teams: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub dates: Vec<String>,
    #[serde(default)]
    pub toss: Option<Toss>,
    #[serde(default)]
    pub officials: Option<Officials>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    #[serde(default, deserialize_with = "nullable")]
    pub player_of_match: Vec<String>,
}

impl MatchInfo {
    /// The match number, preferring `event.match_number`.
    pub fn match_number(&self) -> Option<&Scalar> {
        self.event
            .as_ref()
            .and_then(|e| e.match_number.as_ref())
            .or(self.match_number.as_ref())
    }
}

/// Competition the match belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub match_number: Option<Scalar>,
}

/// A JSON scalar that may be written as a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(v) => f.write_str(v),
            Scalar::Bool(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Toss {
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub decision: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Officials {
    #[serde(default, deserialize_with = "nullable")]
    pub umpires: Vec<String>,
}

/// Match result. `by` maps an outcome kind ("runs", "wickets", ...) to a margin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub by: Map<String, Value>,
    #[serde(default)]
    pub result: Option<String>,
}

// =============================================================================
// Innings / Overs / Deliveries
// =============================================================================

/// One team's batting turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Innings {
    /// Batting side.
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub overs: Vec<Over>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Over {
    #[serde(default)]
    pub over: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub deliveries: Vec<Delivery>,
}

/// A single ball.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(default)]
    pub batter: Option<String>,
    #[serde(default)]
    pub bowler: Option<String>,
    #[serde(default)]
    pub non_striker: Option<String>,
    #[serde(default)]
    pub runs: Option<Runs>,
    #[serde(default)]
    pub extras: Option<Extras>,
    #[serde(default)]
    pub wickets: Option<Vec<Wicket>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Runs {
    #[serde(default)]
    pub batter: Option<i64>,
    #[serde(default)]
    pub extras: Option<i64>,
    #[serde(default)]
    pub total: Option<i64>,
}

/// Extras breakdown; each kind defaults to 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extras {
    #[serde(default, deserialize_with = "nullable")]
    pub noballs: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub wides: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub legbyes: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub byes: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wicket {
    #[serde(default)]
    pub player_out: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub fielders: Vec<Fielder>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fielder {
    #[serde(default)]
    pub name: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================
