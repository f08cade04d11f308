//! The dataset engine: one seeded batch run from config to households.
//!
//! RULES:
//!   - The clock is read once per batch; every household shares `as_of`.
//!   - Households are generated independently, one index at a time.
//!   - All randomness flows through the RngBank.
//!   - Persistence happens after generation, never during it.

use crate::{
    analytics::RiskDistribution,
    clock::Clock,
    config::DatasetConfig,
    error::{CoreError, CoreResult},
    household::Household,
    household_generator::HouseholdGenerator,
    rng::RngBank,
    store::DatasetStore,
    types::RunId,
};
use chrono::{DateTime, Utc};

pub struct DatasetEngine {
    pub run_id:   RunId,
    pub rng_bank: RngBank,
    pub as_of:    DateTime<Utc>,
    generator:    HouseholdGenerator,
}

impl DatasetEngine {
    /// Validates the config; fails with `InvalidConfig` before any draw.
    pub fn new(
        run_id: RunId,
        seed: u64,
        config: DatasetConfig,
        clock: &dyn Clock,
    ) -> CoreResult<Self> {
        Ok(Self {
            run_id,
            rng_bank: RngBank::new(seed),
            as_of: clock.now(),
            generator: HouseholdGenerator::new(config)?,
        })
    }

    /// Engine over the built-in tables.
    pub fn build(run_id: RunId, seed: u64, clock: &dyn Clock) -> CoreResult<Self> {
        Self::new(run_id, seed, DatasetConfig::builtin(), clock)
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    /// Generate `count` households, indices 0..count.
    pub fn generate(&self, count: usize) -> CoreResult<Vec<Household>> {
        let max = self.generator.config().identity.max_sequence;
        if count == 0 {
            return Err(CoreError::precondition("household count must be positive"));
        }
        if count > max {
            return Err(CoreError::precondition(format!(
                "household count {count} exceeds the identifier capacity of {max}"
            )));
        }

        let households = (0..count as u64)
            .map(|i| self.generator.generate(i, &self.rng_bank, self.as_of))
            .collect::<CoreResult<Vec<_>>>()?;

        let dist = RiskDistribution::from_households(&households);
        log::info!(
            "run={} seed={} generated {} households (red={} orange={} yellow={} green={})",
            self.run_id,
            self.seed(),
            dist.total,
            dist.critical,
            dist.high,
            dist.medium,
            dist.low
        );
        Ok(households)
    }

    /// Record the run and its households.
    pub fn persist(&self, store: &DatasetStore, households: &[Household]) -> CoreResult<()> {
        store.insert_run(&self.run_id, self.seed(), env!("CARGO_PKG_VERSION"), self.as_of)?;
        store.insert_households(&self.run_id, households)?;
        log::debug!("run={} persisted {} households", self.run_id, households.len());
        Ok(())
    }
}
