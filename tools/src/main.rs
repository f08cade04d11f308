//! carewatch-gen: headless dataset generator.
//!
//! Usage:
//!   carewatch-gen --seed 12345 --count 120 --out mock-households.json
//!   carewatch-gen --seed 12345 --db run.db --as-of 2024-11-01T00:00:00Z
//!   carewatch-gen --narrate 2024-SJ-0007     (needs ANTHROPIC_API_KEY)

use anyhow::{anyhow, Result};
use carewatch_core::{
    analytics::RiskDistribution,
    clock::{FixedClock, SystemClock},
    config::DatasetConfig,
    engine::DatasetEngine,
    household::Household,
    narrative::{AnthropicClient, NarrativeOutcome, NarrativeService},
    store::DatasetStore,
};
use chrono::{DateTime, Utc};
use std::{env, fmt::Display, str::FromStr};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64)?;
    let count = parse_arg(&args, "--count", 120i64)?;
    let count = usize::try_from(count)
        .map_err(|_| anyhow!("--count must be non-negative, got {count}"))?;
    let out = flag_value(&args, "--out")?.unwrap_or("mock-households.json");
    let db = flag_value(&args, "--db")?;

    let config = match flag_value(&args, "--config")? {
        Some(path) => DatasetConfig::load(path)?,
        None => DatasetConfig::builtin(),
    };
    let as_of = match flag_value(&args, "--as-of")? {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| anyhow!("--as-of '{raw}': {e}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let run_id = format!("run-{seed}-{}", uuid::Uuid::new_v4().simple());
    println!("carewatch-gen");
    println!("  run_id:  {run_id}");
    println!("  seed:    {seed}");
    println!("  count:   {count}");
    println!("  as_of:   {}", as_of.to_rfc3339());
    println!("  out:     {out}");
    println!("  db:      {}", db.unwrap_or("(none)"));
    println!();

    let engine = DatasetEngine::new(run_id, seed, config, &FixedClock::new(as_of))?;
    let households = engine.generate(count)?;

    std::fs::write(out, serde_json::to_string_pretty(&households)?)
        .map_err(|e| anyhow!("Cannot write {out}: {e}"))?;
    log::info!("wrote {} households to {out}", households.len());

    if let Some(path) = db {
        let store = DatasetStore::open(path)?;
        store.migrate()?;
        engine.persist(&store, &households)?;
        log::info!("persisted run {} to {path}", engine.run_id);
    }

    print_summary(&households);

    if let Some(target) = flag_value(&args, "--narrate")? {
        narrate(&households, target)?;
    }
    Ok(())
}

fn print_summary(households: &[Household]) {
    let dist = RiskDistribution::from_households(households);
    println!("=== DATASET SUMMARY ===");
    println!("  households: {}", dist.total);
    println!("  RED:        {}", dist.critical);
    println!("  ORANGE:     {}", dist.high);
    println!("  YELLOW:     {}", dist.medium);
    println!("  GREEN:      {}", dist.low);
}

/// The narrative is best-effort: any failure is reported and the
/// dataset already written stays as it is.
fn narrate(households: &[Household], target: &str) -> Result<()> {
    let household = households
        .iter()
        .find(|h| h.household_id == target || h.id == target)
        .ok_or_else(|| anyhow!("No household '{target}' in this run"))?;

    println!();
    println!("=== AI ANALYSIS: {} ===", household.household_id);
    let client = match AnthropicClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("narrative client unavailable: {e}");
            println!("  analysis unavailable: {e}");
            return Ok(());
        }
    };
    let service = NarrativeService::new(Box::new(client), Box::new(SystemClock));
    match service.analyze(household) {
        NarrativeOutcome::Available(report) => {
            println!("  generated_at: {}", report.generated_at.to_rfc3339());
            println!();
            println!("{}", report.analysis);
        }
        NarrativeOutcome::Unavailable { reason, .. } => {
            println!("  analysis unavailable: {reason}");
        }
    }
    Ok(())
}

/// Value following `flag`, or None when the flag is absent.
/// A flag with nothing (or another flag) after it is an error.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    match args.get(pos + 1) {
        Some(v) if !v.starts_with("--") => Ok(Some(v.as_str())),
        _ => Err(anyhow!("{flag} needs a value")),
    }
}

fn parse_arg<T>(args: &[String], flag: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match flag_value(args, flag)? {
        Some(v) => v.parse().map_err(|e| anyhow!("{flag} '{v}': {e}")),
        None => Ok(default),
    }
}
