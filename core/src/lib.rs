//! Household crisis early-warning core: seeded signal synthesis and
//! rule-based risk classification for monitored households.

pub mod analytics;
pub mod call_signal;
pub mod clock;
pub mod config;
pub mod counseling_signal;
pub mod engine;
pub mod error;
pub mod health_signal;
pub mod household;
pub mod household_generator;
pub mod narrative;
pub mod risk_classifier;
pub mod risk_factors;
pub mod rng;
pub mod store;
pub mod thresholds;
pub mod types;
pub mod usage_signal;
