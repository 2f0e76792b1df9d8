use clap::Args;
use serde_json::Value;
use tracing::{debug, info};

use fin_advisor_core::health::policy::ScoringPolicy;
use fin_advisor_core::health::profile::FinancialProfile;
use fin_advisor_core::health::scorer::assess_financial_health;
use fin_advisor_core::store::{save_json, DirectoryStore, ProfileSnapshot, PROFILE_SNAPSHOT_KEY};

use super::{log_warnings, read_record};
use crate::config;

/// Arguments for the financial health score
#[derive(Args)]
pub struct HealthArgs {
    /// Path to JSON profile file
    #[arg(long)]
    pub input: Option<String>,

    /// Scoring policy file (YAML or JSON); defaults to FINA_POLICY
    #[arg(long)]
    pub policy: Option<String>,

    /// Directory in which to save the scored profile snapshot
    #[arg(long)]
    pub snapshot_dir: Option<String>,
}

pub fn run_health(
    args: HealthArgs,
    policy_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let profile: FinancialProfile = read_record(args.input.as_deref())?
        .ok_or("--input <profile.json> is required (or pipe JSON on stdin)")?;

    let policy = match policy_path {
        Some(path) => {
            debug!(path, "loading scoring policy");
            config::load_policy(path)?
        }
        None => ScoringPolicy::default(),
    };

    let output = assess_financial_health(&profile, &policy)?;
    info!(
        score = output.result.financial_health_score,
        risk = %output.result.risk_category,
        "financial health scored"
    );
    log_warnings(&output.warnings);

    if let Some(dir) = args.snapshot_dir.as_deref() {
        let mut store = DirectoryStore::open(dir)?;
        let snapshot = ProfileSnapshot {
            profile,
            result: output.result.clone(),
        };
        save_json(&mut store, PROFILE_SNAPSHOT_KEY, &snapshot)?;
        info!(dir, "profile snapshot saved");
    }

    Ok(serde_json::to_value(output)?)
}
