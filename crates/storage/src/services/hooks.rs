use crate::models::Round;
use crate::services::scoring::RoundResult;

pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Fire-and-forget side effects triggered after a successful reveal
/// (notifications, playlist generation). Failures surface as warnings on
/// the transition, never as errors.
#[async_trait::async_trait]
pub trait RevealHooks: Send + Sync {
    async fn round_revealed(&self, round: &Round, result: &RoundResult) -> Result<(), HookError>;
}

/// Default hooks: log the reveal and do nothing else.
pub struct LogOnlyHooks;

#[async_trait::async_trait]
impl RevealHooks for LogOnlyHooks {
    async fn round_revealed(&self, round: &Round, result: &RoundResult) -> Result<(), HookError> {
        tracing::info!(
            round_id = %round.round_id,
            winner = ?result.winner_user_id,
            "round revealed"
        );
        Ok(())
    }
}
