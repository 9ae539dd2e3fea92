use async_trait::async_trait;

use crate::error::GenerationError;
use crate::model::{profile::AccountProfile, strategy::StrategyDetails};

/// What a generator gets to look at when producing a strategy.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub account_number: &'a str,
    pub profile: &'a AccountProfile,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(account_number: &'a str, profile: &'a AccountProfile) -> Self {
        Self {
            account_number,
            profile,
        }
    }
}

#[async_trait]
pub trait StrategyGenerator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Produces a fresh strategy for the account described by `request`.
    ///
    /// # Arguments
    ///
    /// * `request` - The account number and its current profile.
    ///
    /// # Returns
    ///
    /// * `StrategyDetails` - The generated strategy, not yet stored anywhere.
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<StrategyDetails, GenerationError>;
}
