pub mod leaderboard;
pub mod league;
pub mod round;
pub mod submission;
pub mod user_statistic;
pub mod vote;
