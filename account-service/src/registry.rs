//! In-memory account registry.
//!
//! Records are kept in insertion order in a `Vec`, with a hash index from
//! account number to position. Nothing is ever removed, so positions stay
//! valid for the lifetime of the registry.

use account::{AccountMetrics, AccountProfile, AccountRecord, AccountUpdate, StrategyDetails, SyncMode};
use chrono::{DateTime, Utc};
use log::info;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub type SharedRegistry = Arc<RwLock<AccountRegistry>>;

#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: Vec<AccountRecord>,
    index: HashMap<String, usize>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Creates the record on first sight of `account_number`, otherwise folds
    /// `profile` into the existing one.
    pub fn upsert(
        &mut self,
        account_number: &str,
        profile: AccountProfile,
        mode: SyncMode,
    ) -> &mut AccountRecord {
        let position = match self.index.get(account_number) {
            Some(&position) => {
                self.accounts[position].sync_profile(profile, mode);
                position
            }
            None => {
                info!("Registering new account {}", account_number);
                let position = self.accounts.len();
                self.accounts
                    .push(AccountRecord::new(account_number, profile, mode));
                self.index.insert(account_number.to_string(), position);
                position
            }
        };
        &mut self.accounts[position]
    }

    pub fn find(&self, account_number: &str) -> Option<&AccountRecord> {
        self.index
            .get(account_number)
            .map(|&position| &self.accounts[position])
    }

    fn find_mut(&mut self, account_number: &str) -> Option<&mut AccountRecord> {
        match self.index.get(account_number) {
            Some(&position) => Some(&mut self.accounts[position]),
            None => None,
        }
    }

    /// Appends a metric snapshot. `None` if the account is unknown.
    pub fn record_update(
        &mut self,
        account_number: &str,
        received_at: DateTime<Utc>,
        metrics: AccountMetrics,
    ) -> Option<&AccountUpdate> {
        self.find_mut(account_number)
            .map(|record| record.push_update(received_at, metrics))
    }

    /// Appends a strategy. `None` if the account is unknown.
    pub fn record_strategy(
        &mut self,
        account_number: &str,
        strategy: StrategyDetails,
    ) -> Option<&StrategyDetails> {
        self.find_mut(account_number)
            .map(|record| record.push_strategy(strategy))
    }

    /// All records, oldest first.
    pub fn list(&self) -> &[AccountRecord] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Read access that survives a handler having panicked while holding the lock.
pub fn read(registry: &SharedRegistry) -> RwLockReadGuard<'_, AccountRegistry> {
    registry.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write access that survives a handler having panicked while holding the lock.
pub fn write(registry: &SharedRegistry) -> RwLockWriteGuard<'_, AccountRegistry> {
    registry.write().unwrap_or_else(PoisonError::into_inner)
}
