//! Analysis result and the response envelope of `POST /analyze_gameplay`.

use crate::scoring::{RiskProfile, RiskScore};
use serde::{Deserialize, Serialize};

/// Final, internally consistent risk assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk_score: u8,
    pub risk_profile: RiskProfile,
    pub analysis: String,
}

impl RiskAssessment {
    /// Attach a narrative to a computed score. The label always comes from
    /// the score.
    pub fn new(score: RiskScore, analysis: impl Into<String>) -> Self {
        Self {
            risk_score: score.risk_score,
            risk_profile: score.risk_profile,
            analysis: analysis.into(),
        }
    }
}

/// Uniform response envelope.
///
/// Success carries `riskProfile`, failure carries `error`; the other key is
/// omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_profile: Option<RiskAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzeResponse {
    pub fn success(assessment: RiskAssessment) -> Self {
        Self {
            success: true,
            risk_profile: Some(assessment),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            risk_profile: None,
            error: Some(message.into()),
        }
    }
}
