//! Pure scoring engines for the Gamenight mini-games.
//!
//! Everything here is a plain function of its inputs: no I/O, no clock,
//! no shared state. The store and the round orchestration call into
//! this crate; nothing in this crate calls out.

mod blindtest;
mod petitbac;
mod scoreboard;

pub use blindtest::ranked_points;
pub use petitbac::{
    assign_letter, is_accepted, majority_threshold, round_points,
    validates_letter, LETTER_POOL,
};
pub use scoreboard::{aggregate, ScoreRow, ScoreboardEntry};
