use super::DatasetStore;
use crate::{
    analytics::RiskDistribution,
    error::{CoreError, CoreResult},
    household::Household,
    thresholds::RiskLevel,
    types::HouseholdIndex,
};
use rusqlite::params;

impl DatasetStore {
    // ── Households ─────────────────────────────────────────────

    pub fn insert_household(
        &self,
        run_id: &str,
        index: HouseholdIndex,
        h: &Household,
    ) -> CoreResult<()> {
        self.conn.execute(
            "INSERT INTO household (
                run_id, idx, id, household_id, region,
                risk_score, risk_level, urgency, payload
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                run_id,
                index as i64,
                &h.id,
                &h.household_id,
                &h.region,
                h.risk_score.value(),
                h.risk_level.as_str(),
                h.ai_analysis.urgency.as_str(),
                serde_json::to_string(h)?,
            ],
        )?;
        Ok(())
    }

    /// Insert a whole batch in one transaction, indexed by position.
    pub fn insert_households(&self, run_id: &str, households: &[Household]) -> CoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (i, h) in households.iter().enumerate() {
            self.insert_household(run_id, i as HouseholdIndex, h)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn household_count(&self, run_id: &str) -> CoreResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM household WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn level_counts(&self, run_id: &str) -> CoreResult<RiskDistribution> {
        let mut stmt = self.conn.prepare(
            "SELECT risk_level, COUNT(*) FROM household
             WHERE run_id = ?1 GROUP BY risk_level",
        )?;
        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut dist = RiskDistribution::default();
        for (level, count) in rows {
            let level = RiskLevel::parse(&level).ok_or_else(|| {
                CoreError::Other(anyhow::anyhow!("unknown risk level '{level}' in store"))
            })?;
            dist.add(level, count as usize);
        }
        Ok(dist)
    }

    /// Households of a run in generation order.
    pub fn load_households(&self, run_id: &str) -> CoreResult<Vec<Household>> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM household WHERE run_id = ?1 ORDER BY idx ASC",
        )?;
        let payloads = stmt
            .query_map(params![run_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        payloads
            .iter()
            .map(|p| serde_json::from_str(p).map_err(CoreError::from))
            .collect()
    }
}
