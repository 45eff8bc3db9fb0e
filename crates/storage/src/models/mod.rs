pub mod leaderboard_entry;
pub mod league;
pub mod round;
pub mod season;
pub mod submission;
pub mod user_statistic;
pub mod vote;
pub mod voting_config;

pub use leaderboard_entry::{LeaderboardEntry, LeaderboardTotals};
pub use league::{League, LeagueMember, MemberRole};
pub use round::{Round, RoundStatus};
pub use season::Season;
pub use submission::Submission;
pub use user_statistic::UserStatistic;
pub use vote::{Vote, VoteKind};
pub use voting_config::{VotingConfig, VotingRules};
