pub mod error;
pub mod model;
pub mod traits;

pub use error::GenerationError;
pub use model::account::AccountRecord;
pub use model::profile::{AccountProfile, SyncMode};
pub use model::strategy::{RiskParameters, StrategyDetails};
pub use model::update::{AccountMetrics, AccountUpdate};
pub use traits::generator::{GenerationRequest, StrategyGenerator};

pub mod prelude {
    pub use crate::error::GenerationError;
    pub use crate::model::profile::AccountProfile;
    pub use crate::model::strategy::{RiskParameters, StrategyDetails};
    pub use crate::traits::generator::{GenerationRequest, StrategyGenerator};
}
