use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Style-specific voting rules. Each style carries only the fields its
/// validation actually reads, instead of one flat struct with conditional
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum VotingRules {
    /// Free distribution: every vote's value must come from the configured
    /// point sets.
    Points {
        upvote_points: Vec<i32>,
        downvote_points: Vec<i32>,
    },
    /// Ranked ballot: with N votes cast, the values used must be exactly the
    /// first N entries of the configured sequence.
    Rank {
        upvote_points: Vec<i32>,
        downvote_points: Vec<i32>,
    },
    /// Exactly one pick worth exactly one point.
    SinglePick,
}

/// Effective voting configuration for a round: the league default unless the
/// round carries an override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VotingConfig {
    pub max_upvotes: u32,
    pub max_downvotes: u32,
    pub downvotes_enabled: bool,
    pub allow_self_votes: bool,
    pub rules: VotingRules,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            max_upvotes: 3,
            max_downvotes: 0,
            downvotes_enabled: false,
            allow_self_votes: false,
            rules: VotingRules::Rank {
                upvote_points: vec![3, 2, 1],
                downvote_points: vec![],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_round_trip_tagged_json() {
        let config = VotingConfig {
            max_upvotes: 2,
            max_downvotes: 1,
            downvotes_enabled: true,
            allow_self_votes: false,
            rules: VotingRules::Points {
                upvote_points: vec![1, 2, 3],
                downvote_points: vec![-1],
            },
        };

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["rules"]["style"], "points");

        let back: VotingConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_single_pick_has_no_point_fields() {
        let json = serde_json::json!({
            "max_upvotes": 1,
            "max_downvotes": 0,
            "downvotes_enabled": false,
            "allow_self_votes": false,
            "rules": { "style": "single_pick" }
        });

        let config: VotingConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.rules, VotingRules::SinglePick);
    }
}
