//! Match record → per-delivery rows.
//!
//! # Architecture
//!
//! ```text
//! MatchRecord                               FlatRow (one per ball)
//! ┌──────────────────────────┐             ┌────────────────────────────────┐
//! │ info  (teams, toss, ...) │──context──▶ │ match_number, date, teams, ... │
//! │ innings[]                │             │ team_batting, team_bowling     │
//! │   overs[]                │             │ over, no of balls              │
//! │     deliveries[]         │──per ball─▶ │ batter, runs_*, extras, wicket │
//! └──────────────────────────┘             └────────────────────────────────┘
//! ```
//!
//! Match-level values are computed once and copied into every row. Missing
//! fields become empty strings, `None` run counts, or zero extras. Only two
//! conditions reject a record: no match date, and an innings whose bowling
//! side cannot be derived from the two-team list.

use crate::error::{RecordError, RecordResult};
use crate::models::{Delivery, FlatRow, MatchInfo, MatchRecord, Outcome};

use super::wickets::{wicket_columns, WicketPolicy};

/// Options for [`flatten`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenOptions {
    pub wicket_policy: WicketPolicy,
}

/// Classify the winning margin from the keys of `outcome.by`.
///
/// `"wickets"` beats `"runs"` beats `"super over"`; any other key set gives
/// `"Other"`. Without a winner the result is empty.
pub fn classify_won_by(outcome: Option<&Outcome>) -> &'static str {
    let Some(outcome) = outcome else {
        return "";
    };
    if outcome.winner.as_deref().map_or(true, str::is_empty) {
        return "";
    }
    let by = &outcome.by;
    if by.contains_key("wickets") {
        "Wickets"
    } else if by.contains_key("runs") {
        "Runs"
    } else if by.contains_key("super over") {
        "Super Over"
    } else {
        "Other"
    }
}

/// The side fielding while `batting` bats.
///
/// `teams` must hold exactly two distinct names and `batting` must be one of them.
pub fn bowling_team<'a>(teams: &'a [String], batting: &str) -> RecordResult<&'a str> {
    let invalid = || RecordError::InvalidTeams {
        batting: batting.to_string(),
        teams: teams.to_vec(),
    };

    match teams {
        [first, second] if first != second => {
            if batting == first {
                Ok(second.as_str())
            } else if batting == second {
                Ok(first.as_str())
            } else {
                Err(invalid())
            }
        }
        _ => Err(invalid()),
    }
}

/// Values shared by every row of one match.
#[derive(Debug, Clone)]
struct MatchContext {
    match_number: String,
    date: String,
    gender: String,
    match_type: String,
    teams: String,
    team1: String,
    team2: String,
    venue: String,
    toss_winner: String,
    toss_decision: String,
    umpires: String,
    winner: String,
    player_of_match: String,
    won_by: String,
}

impl MatchContext {
    fn from_info(info: &MatchInfo) -> RecordResult<Self> {
        let date = info.dates.first().ok_or(RecordError::MissingDate)?.clone();
        let toss = info.toss.as_ref();

        Ok(Self {
            match_number: info.match_number().map(|m| m.to_string()).unwrap_or_default(),
            date,
            gender: info.gender.clone().unwrap_or_default(),
            match_type: info.match_type.clone().unwrap_or_default(),
            teams: info.teams.join(", "),
            team1: info.teams.first().cloned().unwrap_or_default(),
            team2: info.teams.get(1).cloned().unwrap_or_default(),
            venue: info.venue.clone().unwrap_or_default(),
            toss_winner: toss.and_then(|t| t.winner.clone()).unwrap_or_default(),
            toss_decision: toss.and_then(|t| t.decision.clone()).unwrap_or_default(),
            umpires: info
                .officials
                .as_ref()
                .map(|o| o.umpires.join(", "))
                .unwrap_or_default(),
            winner: info
                .outcome
                .as_ref()
                .and_then(|o| o.winner.clone())
                .unwrap_or_default(),
            player_of_match: info.player_of_match.join(", "),
            won_by: classify_won_by(info.outcome.as_ref()).to_string(),
        })
    }

    fn row(
        &self,
        batting: &str,
        bowling: &str,
        over: Option<i64>,
        ball: usize,
        delivery: &Delivery,
        policy: WicketPolicy,
    ) -> FlatRow {
        let runs = delivery.runs.clone().unwrap_or_default();
        let extras = delivery.extras.clone().unwrap_or_default();
        let wickets = wicket_columns(delivery.wickets.as_deref(), policy);

        FlatRow {
            match_number: self.match_number.clone(),
            date: self.date.clone(),
            gender: self.gender.clone(),
            match_type: self.match_type.clone(),
            teams: self.teams.clone(),
            team1: self.team1.clone(),
            team2: self.team2.clone(),
            team_batting: batting.to_string(),
            team_bowling: bowling.to_string(),
            venue: self.venue.clone(),
            toss_winner: self.toss_winner.clone(),
            toss_decision: self.toss_decision.clone(),
            umpires: self.umpires.clone(),
            batter: delivery.batter.clone().unwrap_or_default(),
            bowler: delivery.bowler.clone().unwrap_or_default(),
            non_striker: delivery.non_striker.clone().unwrap_or_default(),
            over,
            runs_batter: runs.batter,
            runs_extras: runs.extras,
            runs_total: runs.total,
            legbyes: extras.legbyes,
            byes: extras.byes,
            no_of_balls: ball,
            noballs: extras.noballs,
            wides: extras.wides,
            player_out: wickets.player_out,
            kind: wickets.kind,
            fielders: wickets.fielders,
            winner: self.winner.clone(),
            player_of_match: self.player_of_match.clone(),
            iswicket_delivery: u8::from(wickets.is_wicket),
            won_by: self.won_by.clone(),
        }
    }
}

/// Flatten a match into one [`FlatRow`] per delivery.
///
/// Rows come out in innings, over, delivery order. `no of balls` is the
/// 1-based position of the delivery inside its over and counts every entry,
/// wides and no-balls included.
///
/// # Errors
/// - [`RecordError::MissingDate`] if `info.dates` is empty
/// - [`RecordError::InvalidTeams`] if an innings' bowling side is ambiguous
pub fn flatten(record: &MatchRecord, options: &FlattenOptions) -> RecordResult<Vec<FlatRow>> {
    let ctx = MatchContext::from_info(&record.info)?;
    let mut rows = Vec::with_capacity(record.delivery_count());

    for innings in &record.innings {
        let batting = innings.team.as_deref().unwrap_or("");
        let bowling = bowling_team(&record.info.teams, batting)?;

        for over in &innings.overs {
            for (idx, delivery) in over.deliveries.iter().enumerate() {
                rows.push(ctx.row(batting, bowling, over.over, idx + 1, delivery, options.wicket_policy));
            }
        }
    }

    Ok(rows)
}
