pub mod common;
pub mod leaderboard;
pub mod league;
pub mod round;
pub mod stats;
pub mod vote;
