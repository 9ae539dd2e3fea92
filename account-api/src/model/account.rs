//! The stored profile and history of one trading account.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::profile::{AccountProfile, SyncMode};
use crate::model::strategy::StrategyDetails;
use crate::model::update::{AccountMetrics, AccountUpdate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Registry key. Never changes once the record exists.
    account_number: String,
    #[serde(flatten)]
    profile: AccountProfile,
    /// Append-only, oldest first.
    account_updates: Vec<AccountUpdate>,
    /// Append-only, oldest first.
    strategies: Vec<StrategyDetails>,
}

impl AccountRecord {
    /// Creates an empty record seeded with its first profile.
    pub fn new(account_number: impl Into<String>, profile: AccountProfile, mode: SyncMode) -> Self {
        let mut seeded = AccountProfile::default();
        seeded.apply(profile, mode);

        Self {
            account_number: account_number.into(),
            profile: seeded,
            account_updates: Vec::new(),
            strategies: Vec::new(),
        }
    }

    pub fn get_account_number(&self) -> &str {
        &self.account_number
    }

    pub fn get_profile(&self) -> &AccountProfile {
        &self.profile
    }

    pub fn get_updates(&self) -> &[AccountUpdate] {
        &self.account_updates
    }

    pub fn get_strategies(&self) -> &[StrategyDetails] {
        &self.strategies
    }

    pub fn last_update(&self) -> Option<&AccountUpdate> {
        self.account_updates.last()
    }

    pub fn last_strategy(&self) -> Option<&StrategyDetails> {
        self.strategies.last()
    }

    /// Overwrites the profile with a newer sync.
    pub fn sync_profile(&mut self, profile: AccountProfile, mode: SyncMode) {
        self.profile.apply(profile, mode);
    }

    /// Appends a metric snapshot received at `received_at`.
    ///
    /// Snapshot times are strictly increasing within a record: if the clock
    /// did not move since the previous snapshot, the new one is stamped one
    /// microsecond after it.
    pub fn push_update(&mut self, received_at: DateTime<Utc>, metrics: AccountMetrics) -> &AccountUpdate {
        let time = match self.account_updates.last() {
            Some(previous) if received_at <= previous.time => previous.time + Duration::microseconds(1),
            _ => received_at,
        };
        self.account_updates.push(AccountUpdate::new(time, metrics));
        &self.account_updates[self.account_updates.len() - 1]
    }

    pub fn push_strategy(&mut self, strategy: StrategyDetails) -> &StrategyDetails {
        self.strategies.push(strategy);
        &self.strategies[self.strategies.len() - 1]
    }
}
