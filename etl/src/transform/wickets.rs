//! Wicket column rendering.
//!
//! A delivery can carry more than one dismissal (a run out off a no-ball
//! alongside a stumping, for example). The flat schema has a single set of
//! `player_out` / `kind` / `fielders` columns, so [`WicketPolicy`] decides how
//! several wickets share them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::Wicket;

/// How multiple wickets on one delivery map onto the wicket columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WicketPolicy {
    /// Columns describe the last wicket in the list.
    #[default]
    Last,
    /// Each column joins the per-wicket values with `"; "`.
    Joined,
}

impl FromStr for WicketPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last" => Ok(Self::Last),
            "joined" => Ok(Self::Joined),
            other => Err(format!("unknown wicket policy '{}' (expected 'last' or 'joined')", other)),
        }
    }
}

/// Wicket columns for one delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WicketColumns {
    pub player_out: String,
    pub kind: String,
    pub fielders: String,
    /// Every wicket as `"{player_out} {kind} {fielders}"`, joined by `"; "`.
    pub summary: String,
    pub is_wicket: bool,
}

struct WicketParts {
    player_out: String,
    kind: String,
    fielders: String,
}

impl WicketParts {
    fn from_wicket(wicket: &Wicket) -> Self {
        let fielders = wicket
            .fielders
            .iter()
            .map(|f| f.name.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            player_out: wicket.player_out.clone().unwrap_or_default(),
            kind: wicket.kind.clone().unwrap_or_default(),
            fielders,
        }
    }

    fn describe(&self) -> String {
        format!("{} {} {}", self.player_out, self.kind, self.fielders)
    }
}

fn join_field<F>(parts: &[WicketParts], field: F) -> String
where
    F: Fn(&WicketParts) -> &str,
{
    parts.iter().map(field).collect::<Vec<_>>().join("; ")
}

/// Render the wicket columns of a delivery under `policy`.
///
/// An absent or empty wicket list yields empty columns and `is_wicket = false`.
pub fn wicket_columns(wickets: Option<&[Wicket]>, policy: WicketPolicy) -> WicketColumns {
    let parts: Vec<WicketParts> = wickets
        .unwrap_or_default()
        .iter()
        .map(WicketParts::from_wicket)
        .collect();

    let Some(last) = parts.last() else {
        return WicketColumns::default();
    };

    let summary = parts.iter().map(WicketParts::describe).collect::<Vec<_>>().join("; ");

    match policy {
        WicketPolicy::Last => WicketColumns {
            player_out: last.player_out.clone(),
            kind: last.kind.clone(),
            fielders: last.fielders.clone(),
            summary,
            is_wicket: true,
        },
        WicketPolicy::Joined => WicketColumns {
            player_out: join_field(&parts, |p| p.player_out.as_str()),
            kind: join_field(&parts, |p| p.kind.as_str()),
            fielders: join_field(&parts, |p| p.fielders.as_str()),
            summary,
            is_wicket: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Fielder;

    fn wicket(player: &str, kind: &str, fielders: &[&str]) -> Wicket {
        Wicket {
            player_out: Some(player.into()),
            kind: Some(kind.into()),
            fielders: fielders
                .iter()
                .map(|n| Fielder { name: Some(n.to_string()) })
                .collect(),
        }
    }

    #[test]
    fn test_no_wickets() {
        let cols = wicket_columns(None, WicketPolicy::Last);
        assert_eq!(cols, WicketColumns::default());

        let cols = wicket_columns(Some(&[][..]), WicketPolicy::Joined);
        assert!(!cols.is_wicket);
        assert_eq!(cols.player_out, "");
    }

    #[test]
    fn test_single_wicket_with_fielders() {
        let w = [wicket("RG Sharma", "caught", &["MS Dhoni", "RA Jadeja"])];
        let cols = wicket_columns(Some(&w[..]), WicketPolicy::Last);
        assert!(cols.is_wicket);
        assert_eq!(cols.player_out, "RG Sharma");
        assert_eq!(cols.kind, "caught");
        assert_eq!(cols.fielders, "MS Dhoni, RA Jadeja");
        assert_eq!(cols.summary, "RG Sharma caught MS Dhoni, RA Jadeja");
    }

    #[test]
    fn test_multiple_wickets_last_policy() {
        let w = [
            wicket("A", "run out", &["X"]),
            wicket("B", "stumped", &["Y"]),
        ];
        let cols = wicket_columns(Some(&w[..]), WicketPolicy::Last);
        assert_eq!(cols.player_out, "B");
        assert_eq!(cols.kind, "stumped");
        assert_eq!(cols.fielders, "Y");
        assert_eq!(cols.summary, "A run out X; B stumped Y");
    }

    #[test]
    fn test_multiple_wickets_joined_policy() {
        let w = [
            wicket("A", "run out", &["X", "Z"]),
            wicket("B", "bowled", &[]),
        ];
        let cols = wicket_columns(Some(&w[..]), WicketPolicy::Joined);
        assert_eq!(cols.player_out, "A; B");
        assert_eq!(cols.kind, "run out; bowled");
        assert_eq!(cols.fielders, "X, Z; ");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("last".parse::<WicketPolicy>().unwrap(), WicketPolicy::Last);
        assert_eq!(" Joined ".parse::<WicketPolicy>().unwrap(), WicketPolicy::Joined);
        assert!("first".parse::<WicketPolicy>().is_err());
    }
}
