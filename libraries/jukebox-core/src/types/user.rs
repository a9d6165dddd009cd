/// User domain type
use super::ids::UserId;
use serde::{Deserialize, Serialize};

/// Credit amount in the smallest billing unit
///
/// Signed: balances are allowed to go negative.
pub type Credits = i64;

/// Jukebox user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Remaining credit
    pub credit: Credits,
}

impl User {
    /// Create a user with an initial credit balance
    pub fn new(id: UserId, name: impl Into<String>, credit: Credits) -> Self {
        Self {
            id,
            name: name.into(),
            credit,
        }
    }

    /// Deduct `amount` from the balance
    ///
    /// There is no overdraft check; the balance may become negative. It
    /// saturates at `Credits::MIN`.
    pub fn charge(&mut self, amount: Credits) {
        self.credit = self.credit.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_can_go_negative() {
        let mut user = User::new(UserId::new("u1"), "Alice", 1);
        user.charge(3);
        assert_eq!(user.credit, -2);
    }

    #[test]
    fn charge_saturates_instead_of_wrapping() {
        let mut user = User::new(UserId::new("u1"), "Alice", 0);
        user.charge(Credits::MAX);
        user.charge(Credits::MAX);
        assert_eq!(user.credit, Credits::MIN);
    }
}
