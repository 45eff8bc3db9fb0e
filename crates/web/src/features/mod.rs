pub mod leaderboards;
pub mod leagues;
pub mod rounds;
pub mod statistics;
