//! Offline scoring for the `riskd score` command.

use anyhow::{Context, Result};
use risk_shared::{
    compute_risk, AnalyzeRequest, GameplayMetrics, MetricRates, RiskFactors, RiskProfile,
};
use serde::Serialize;
use serde_json::Value;

/// Full breakdown of one scored game
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub metrics: GameplayMetrics,
    pub rates: MetricRates,
    pub factors: RiskFactors,
    pub weighted_sum: f64,
    pub risk_score: u8,
    pub risk_profile: RiskProfile,
}

impl Scorecard {
    pub fn new(metrics: GameplayMetrics) -> Self {
        let factors = RiskFactors::from_metrics(&metrics);
        let score = compute_risk(&metrics);
        Self {
            metrics,
            rates: MetricRates::from_metrics(&metrics),
            factors,
            weighted_sum: factors.weighted_sum(),
            risk_score: score.risk_score,
            risk_profile: score.risk_profile,
        }
    }
}

/// Score a JSON document holding either bare metrics or a full
/// `{ "metrics": ... }` request body
pub fn score_document(input: &str) -> Result<Scorecard> {
    let value: Value = serde_json::from_str(input).context("Input is not valid JSON")?;

    let metrics = if value.get("metrics").is_some() {
        serde_json::from_value::<AnalyzeRequest>(value)
            .context("Invalid analyze request")?
            .metrics
    } else {
        serde_json::from_value::<GameplayMetrics>(value).context("Invalid metrics")?
    };

    Ok(Scorecard::new(metrics))
}
