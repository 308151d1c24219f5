use thiserror::Error;

use crate::ui::text;

/// Why a command was refused. `Display` is the text shown to the invoking user;
/// game state is untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifeError {
    /// Actor is occupied; carries their status line.
    #[error("{0}")]
    Busy(String),
    /// Target is shielded by a non-interruptible occupation; carries its status line.
    #[error("{0}")]
    TargetUnavailable(String),
    #[error("That user does not exist! ✋")]
    UserDoesNotExist,
    #[error("✋ You have to specify a user, e.g. /kill @User")]
    KillTooFewArguments,
    #[error("✋ You have to specify a user and a reward, e.g. /placebounty @User 500")]
    PlaceBountyTooFewArguments,
    #[error("If you want to kill yourself, go play Russian Roulette 🙄")]
    KillYourself,
    #[error("You can't put a bounty on yourself ✋")]
    BountyOnYourself,
    #[error("To break someone out, reply to their message with <code>/breakout</code> ✋")]
    BreakoutInstructions,
    #[error("Breaking out yourself? ✋")]
    BreakoutYourself,
    #[error("{0} is not in prison.")]
    NotInPrison(String),
    #[error("You are not in prison, silly 🤪")]
    YouAreNotInPrison,
    #[error("Provide argument [amount] - the amount of points you're willing to use to bribe the prison guards")]
    BribeInstructions,
    #[error("Provide a valid, positive number please ✋")]
    InvalidNumber,
    #[error("Shifts can last at most {0} minutes ✋")]
    ShiftTooLong(u32),
    #[error("This will cost you {0} points, which you don't have, you filthy peasant ✋")]
    CantSpendMoreThanYouHave(i64),
    /// Scores moved since the proposal; the kill is re-proposed at the new price.
    #[error("The price changed: killing {target} now costs {cost} points. Send /confirm to go ahead or /cancel to back off 🔪")]
    KillPriceChanged { target: String, cost: i64 },
    #[error("There is nothing to confirm ✋")]
    NothingToConfirm,
    #[error("Unknown command. Send /life for the list of commands")]
    UnknownCommand,
}

impl LifeError {
    pub fn prefixed(&self, mention: &str) -> String {
        match self {
            // Status lines already carry the mention.
            LifeError::Busy(status) => status.clone(),
            other => text::prefixed(mention, &other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_user_facing() {
        assert_eq!(
            LifeError::CantSpendMoreThanYouHave(300).to_string(),
            "This will cost you 300 points, which you don't have, you filthy peasant ✋"
        );
        assert_eq!(LifeError::NotInPrison("bob".into()).to_string(), "bob is not in prison.");
    }

    #[test]
    fn busy_status_is_not_prefixed_twice() {
        let status = "@alice You are currently working with 3 minutes to go 🏢".to_string();
        assert_eq!(LifeError::Busy(status.clone()).prefixed("@alice"), status);
        assert_eq!(
            LifeError::UserDoesNotExist.prefixed("@alice"),
            "@alice: That user does not exist! ✋"
        );
    }
}
