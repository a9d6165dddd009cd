//! In-memory user accounts implementing [`Billing`]

use crate::error::{CoreError, Result};
use crate::traits::Billing;
use crate::types::{Credits, User, UserId};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// User accounts keyed by id
#[derive(Debug, Default)]
pub struct InMemoryAccounts {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_users<T>(&self, f: impl FnOnce(&mut HashMap<UserId, User>) -> T) -> T {
        let mut guard = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Add or replace an account
    pub fn register(&self, user: User) {
        info!(user = %user.id, credit = user.credit, "Account registered");
        self.with_users(|users| {
            users.insert(user.id.clone(), user);
        });
    }

    /// Look up an account
    pub fn user(&self, id: &UserId) -> Option<User> {
        self.with_users(|users| users.get(id).cloned())
    }

    /// Current balance of an account
    pub fn balance(&self, id: &UserId) -> Option<Credits> {
        self.with_users(|users| users.get(id).map(|user| user.credit))
    }

    /// Add credit to an account
    pub fn top_up(&self, id: &UserId, amount: Credits) -> Result<Credits> {
        self.with_users(|users| {
            let user = users
                .get_mut(id)
                .ok_or_else(|| CoreError::UserNotFound(id.clone()))?;
            user.credit = user.credit.saturating_add(amount);
            Ok(user.credit)
        })
    }
}

impl Billing for InMemoryAccounts {
    fn charge(&self, user: &UserId, amount: Credits) -> Result<()> {
        self.with_users(|users| {
            let account = users
                .get_mut(user)
                .ok_or_else(|| CoreError::UserNotFound(user.clone()))?;
            account.charge(amount);
            debug!(user = %user, amount, balance = account.credit, "Charged");
            Ok(())
        })
    }
}
