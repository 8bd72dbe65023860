pub mod analysis;
pub mod chart;
pub mod chat;
pub mod envelope;
pub mod holding;
pub mod market;
pub mod performance;
pub mod portfolio;
pub mod settings;
pub mod trade;
pub mod transaction;
pub mod user;
