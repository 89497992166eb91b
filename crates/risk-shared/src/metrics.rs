//! Gameplay telemetry as posted by the browser game.
//!
//! Decoding is permissive: any metric that is absent or `null` becomes 0.
//! Only a value of the wrong JSON type (e.g. a string) fails to decode.

use serde::{Deserialize, Deserializer, Serialize};

/// Per-game telemetry record
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameplayMetrics {
    /// In-game score
    #[serde(default, deserialize_with = "zero_if_null")]
    pub score: f64,

    /// Seconds played; 0 for a game that was aborted immediately
    #[serde(default, deserialize_with = "zero_if_null")]
    pub game_duration: f64,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub unnecessary_turns: f64,

    /// Share of time spent next to a wall, nominally 0..=100
    #[serde(default, deserialize_with = "zero_if_null")]
    pub wall_proximity_percentage: f64,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub risky_body_movements: f64,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub near_misses: f64,

    /// Mean milliseconds between key presses; 0 means not measured
    #[serde(default, deserialize_with = "zero_if_null")]
    pub avg_decision_time: f64,
}

/// Body of `POST /analyze_gameplay`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, deserialize_with = "default_if_null")]
    pub metrics: GameplayMetrics,
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn default_if_null<'de, D>(deserializer: D) -> Result<GameplayMetrics, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<GameplayMetrics>::deserialize(deserializer)?.unwrap_or_default())
}
