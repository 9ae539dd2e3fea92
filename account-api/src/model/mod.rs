pub mod account;
pub mod profile;
pub mod strategy;
pub mod update;
