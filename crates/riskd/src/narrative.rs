//! Narrative request builder.
//!
//! Sends the metrics plus the already computed score to the text-generation
//! collaborator and turns its reply into a [`RiskAssessment`]. The local score
//! and profile always win: the collaborator only contributes `analysis`.

use crate::error::RiskError;
use crate::llm_client::LlmClient;
use crate::prompts::{build_analysis_prompt, ANALYST_SYSTEM_PROMPT};
use risk_shared::{GameplayMetrics, RiskAssessment, RiskProfile, RiskScore};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Structured reply requested from the collaborator
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NarrativeReply {
    #[serde(default)]
    risk_score: Option<Value>,
    #[serde(default)]
    risk_profile: Option<Value>,
    #[serde(default)]
    analysis: Option<String>,
}

pub struct NarrativeBuilder {
    client: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl NarrativeBuilder {
    pub fn new(client: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Ask the collaborator for a narrative of `score`.
    ///
    /// Fails with `AnalysisFailure` on transport errors, timeout or an
    /// unusable reply. There is no local fallback narrative.
    pub async fn build(
        &self,
        metrics: &GameplayMetrics,
        score: RiskScore,
    ) -> Result<RiskAssessment, RiskError> {
        let prompt = build_analysis_prompt(metrics, &score);

        let reply = tokio::time::timeout(
            self.timeout,
            self.client.call_json(ANALYST_SYSTEM_PROMPT, &prompt),
        )
        .await
        .map_err(|_| {
            RiskError::AnalysisFailure(format!("Analysis timed out after {:?}", self.timeout))
        })??;

        debug!("Narrative reply: {}", reply);
        parse_reply(reply, score)
    }
}

/// Validate a collaborator reply against the locally computed score
pub fn parse_reply(reply: Value, score: RiskScore) -> Result<RiskAssessment, RiskError> {
    let reply: NarrativeReply = serde_json::from_value(reply)
        .map_err(|e| RiskError::AnalysisFailure(format!("Malformed analysis reply: {}", e)))?;

    let analysis = reply
        .analysis
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| {
            RiskError::AnalysisFailure("Analysis reply has no analysis text".to_string())
        })?;

    if let Some(echoed) = &reply.risk_score {
        if echoed.as_f64() != Some(f64::from(score.risk_score)) {
            warn!(
                "Collaborator changed risk score to {} (kept {})",
                echoed, score.risk_score
            );
        }
    }

    if let Some(echoed) = &reply.risk_profile {
        let parsed = echoed.as_str().and_then(|s| s.parse::<RiskProfile>().ok());
        if parsed != Some(score.risk_profile) {
            warn!(
                "Collaborator changed risk profile to {} (kept {})",
                echoed, score.risk_profile
            );
        }
    }

    Ok(RiskAssessment::new(score, analysis))
}
