//! Prompt text for the narrative collaborator.

use risk_shared::{GameplayMetrics, RiskScore};

pub const ANALYST_SYSTEM_PROMPT: &str = "You are an expert game analyst who specializes in \
analyzing player behavior and risk profiles.";

/// Reply contract appended to every analysis prompt
const REPLY_RULES: &str = r#"
Return your analysis as a single JSON object with exactly these fields:
- riskScore: the risk score given above, unchanged
- riskProfile: the risk profile given above, unchanged
- analysis: a detailed paragraph explaining the risk assessment

Do NOT change the score or the profile. Only write the analysis."#;

/// User prompt embedding every raw metric and the computed score and label
pub fn build_analysis_prompt(metrics: &GameplayMetrics, score: &RiskScore) -> String {
    format!(
        "Analyze the following Snake game player metrics and explain their risk profile:\n\
         \n\
         - Game Score: {}\n\
         - Game Duration (seconds): {}\n\
         - Unnecessary Turns: {}\n\
         - Wall Proximity Time (percentage): {}\n\
         - Risky Body Movements: {}\n\
         - Near Misses: {}\n\
         - Average Decision Time (ms): {}\n\
         \n\
         The risk score has already been computed as {} out of 100 (higher means more risky), \
         which classifies the player's style as {}.\n\
         {}",
        metrics.score,
        metrics.game_duration,
        metrics.unnecessary_turns,
        metrics.wall_proximity_percentage,
        metrics.risky_body_movements,
        metrics.near_misses,
        metrics.avg_decision_time,
        score.risk_score,
        score.risk_profile,
        REPLY_RULES,
    )
}
