//! Transformation module.
//!
//! Match record to flat rows:
//! - Flatten: the per-delivery transform shared by every entry point
//! - Wickets: how dismissals map onto the wicket columns

pub mod flatten;
pub mod wickets;

pub use flatten::{bowling_team, classify_won_by, flatten, FlattenOptions};
pub use wickets::{wicket_columns, WicketColumns, WicketPolicy};
