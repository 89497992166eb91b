//! Deterministic risk scoring.
//!
//! Every raw metric is turned into a factor in `0..=100`, the factors are
//! blended with fixed weights that sum to 1, and the rounded blend is the
//! risk score. The profile is read off the score and nothing else.
//!
//! | factor   | source                           | weight |
//! |----------|----------------------------------|--------|
//! | turn     | unnecessary turns per minute x 2 | 0.20   |
//! | wall     | wall proximity % x 1.2           | 0.25   |
//! | movement | risky body moves per second x 10 | 0.30   |
//! | miss     | near misses x 5                  | 0.15   |
//! | decision | decision-time band               | 0.10   |

use crate::metrics::GameplayMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound of every factor and of the final score
pub const FACTOR_CEILING: f64 = 100.0;

pub const TURN_WEIGHT: f64 = 0.20;
pub const WALL_WEIGHT: f64 = 0.25;
pub const MOVEMENT_WEIGHT: f64 = 0.30;
pub const MISS_WEIGHT: f64 = 0.15;
pub const DECISION_WEIGHT: f64 = 0.10;

/// Decisions faster than this (ms) are treated as reckless
pub const FAST_DECISION_MS: f64 = 250.0;
/// Decisions slower than this (ms) are treated as hesitant
pub const SLOW_DECISION_MS: f64 = 1000.0;

pub const FAST_DECISION_FACTOR: f64 = 70.0;
pub const SLOW_DECISION_FACTOR: f64 = 60.0;
pub const MODERATE_DECISION_FACTOR: f64 = 30.0;

/// Highest score still labelled Cautious
pub const CAUTIOUS_MAX: u8 = 33;
/// Highest score still labelled Average
pub const AVERAGE_MAX: u8 = 66;

// ============================================================================
// Risk Profile
// ============================================================================

/// Categorical play-style label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskProfile {
    Cautious,
    Average,
    Reckless,
}

impl RiskProfile {
    /// Label for a risk score. Scores above 100 are treated as Reckless.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=CAUTIOUS_MAX => RiskProfile::Cautious,
            s if s <= AVERAGE_MAX => RiskProfile::Average,
            _ => RiskProfile::Reckless,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Cautious => "Cautious",
            RiskProfile::Average => "Average",
            RiskProfile::Reckless => "Reckless",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label that is not one of Cautious, Average or Reckless
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown risk profile: {0}")]
pub struct UnknownProfile(pub String);

impl FromStr for RiskProfile {
    type Err = UnknownProfile;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cautious" => Ok(RiskProfile::Cautious),
            "average" => Ok(RiskProfile::Average),
            "reckless" => Ok(RiskProfile::Reckless),
            _ => Err(UnknownProfile(s.to_string())),
        }
    }
}

// ============================================================================
// Rates and Factors
// ============================================================================

/// Time-normalised metrics. Both are 0 when the game lasted 0 seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRates {
    pub turns_per_minute: f64,
    pub movements_per_second: f64,
}

impl MetricRates {
    pub fn from_metrics(metrics: &GameplayMetrics) -> Self {
        if metrics.game_duration == 0.0 {
            return Self::default();
        }

        Self {
            turns_per_minute: metrics.unnecessary_turns / metrics.game_duration * 60.0,
            movements_per_second: metrics.risky_body_movements / metrics.game_duration,
        }
    }
}

/// Per-metric contributions, each in `0..=100`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
    pub turn: f64,
    pub wall: f64,
    pub movement: f64,
    pub miss: f64,
    pub decision: f64,
}

impl RiskFactors {
    pub fn from_metrics(metrics: &GameplayMetrics) -> Self {
        let rates = MetricRates::from_metrics(metrics);

        Self {
            turn: clamp_factor(rates.turns_per_minute * 2.0),
            wall: clamp_factor(metrics.wall_proximity_percentage * 1.2),
            movement: clamp_factor(rates.movements_per_second * 10.0),
            miss: clamp_factor(metrics.near_misses * 5.0),
            decision: decision_factor(metrics.avg_decision_time),
        }
    }

    /// Weighted blend of all factors, in `0.0..=100.0`
    pub fn weighted_sum(&self) -> f64 {
        self.turn * TURN_WEIGHT
            + self.wall * WALL_WEIGHT
            + self.movement * MOVEMENT_WEIGHT
            + self.miss * MISS_WEIGHT
            + self.decision * DECISION_WEIGHT
    }
}

fn clamp_factor(value: f64) -> f64 {
    value.clamp(0.0, FACTOR_CEILING)
}

/// Factor for the average decision time in milliseconds.
///
/// 0 means the time was never measured and contributes nothing.
pub fn decision_factor(avg_decision_time: f64) -> f64 {
    if avg_decision_time == 0.0 {
        0.0
    } else if avg_decision_time < FAST_DECISION_MS {
        FAST_DECISION_FACTOR
    } else if avg_decision_time > SLOW_DECISION_MS {
        SLOW_DECISION_FACTOR
    } else {
        MODERATE_DECISION_FACTOR
    }
}

// ============================================================================
// Risk Score
// ============================================================================

/// Score and the label derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScore {
    pub risk_score: u8,
    pub risk_profile: RiskProfile,
}

impl RiskScore {
    /// Pair a score with its label; scores above 100 are capped
    pub fn from_score(score: u8) -> Self {
        let risk_score = score.min(FACTOR_CEILING as u8);
        Self {
            risk_score,
            risk_profile: RiskProfile::from_score(risk_score),
        }
    }
}

/// Score a game. Pure: identical input always yields identical output.
pub fn compute_risk(metrics: &GameplayMetrics) -> RiskScore {
    let raw = RiskFactors::from_metrics(metrics).weighted_sum();
    // f64::round rounds half away from zero
    let rounded = raw.round().clamp(0.0, FACTOR_CEILING) as u8;
    RiskScore::from_score(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(duration: f64, turns: f64, wall: f64, moves: f64, misses: f64, decision: f64) -> GameplayMetrics {
        GameplayMetrics {
            score: 0.0,
            game_duration: duration,
            unnecessary_turns: turns,
            wall_proximity_percentage: wall,
            risky_body_movements: moves,
            near_misses: misses,
            avg_decision_time: decision,
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total = TURN_WEIGHT + WALL_WEIGHT + MOVEMENT_WEIGHT + MISS_WEIGHT + DECISION_WEIGHT;
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_duration_rates_are_zero() {
        let m = metrics(0.0, 50.0, 0.0, 40.0, 0.0, 0.0);
        let rates = MetricRates::from_metrics(&m);
        assert_eq!(rates.turns_per_minute, 0.0);
        assert_eq!(rates.movements_per_second, 0.0);

        let factors = RiskFactors::from_metrics(&m);
        assert_eq!(factors.turn, 0.0);
        assert_eq!(factors.movement, 0.0);
    }

    #[test]
    fn test_rates() {
        let rates = MetricRates::from_metrics(&metrics(30.0, 15.0, 0.0, 6.0, 0.0, 0.0));
        assert_eq!(rates.turns_per_minute, 30.0);
        assert_eq!(rates.movements_per_second, 0.2);
    }

    #[test]
    fn test_decision_factor_boundaries() {
        assert_eq!(decision_factor(0.0), 0.0);
        assert_eq!(decision_factor(1.0), 70.0);
        assert_eq!(decision_factor(249.0), 70.0);
        assert_eq!(decision_factor(250.0), 30.0);
        assert_eq!(decision_factor(1000.0), 30.0);
        assert_eq!(decision_factor(1001.0), 60.0);
    }

    #[test]
    fn test_profile_boundaries() {
        assert_eq!(RiskProfile::from_score(0), RiskProfile::Cautious);
        assert_eq!(RiskProfile::from_score(33), RiskProfile::Cautious);
        assert_eq!(RiskProfile::from_score(34), RiskProfile::Average);
        assert_eq!(RiskProfile::from_score(66), RiskProfile::Average);
        assert_eq!(RiskProfile::from_score(67), RiskProfile::Reckless);
        assert_eq!(RiskProfile::from_score(100), RiskProfile::Reckless);
    }

    #[test]
    fn test_factors_clamped() {
        let factors = RiskFactors::from_metrics(&metrics(1.0, 1000.0, 500.0, 1000.0, 1000.0, 100.0));
        assert_eq!(factors.turn, 100.0);
        assert_eq!(factors.wall, 100.0);
        assert_eq!(factors.movement, 100.0);
        assert_eq!(factors.miss, 100.0);

        let factors = RiskFactors::from_metrics(&metrics(10.0, -5.0, -20.0, -3.0, -1.0, 0.0));
        assert_eq!(factors.turn, 0.0);
        assert_eq!(factors.wall, 0.0);
        assert_eq!(factors.movement, 0.0);
        assert_eq!(factors.miss, 0.0);
    }

    #[test]
    fn test_calm_game_scores_zero() {
        let mut m = metrics(60.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        m.score = 100.0;
        let result = compute_risk(&m);
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.risk_profile, RiskProfile::Cautious);
    }

    #[test]
    fn test_reckless_game() {
        // 20 + 25 + 1.5 + 15 + 7 = 68.5, rounds up to 69
        let m = metrics(60.0, 60.0, 100.0, 30.0, 20.0, 100.0);
        let factors = RiskFactors::from_metrics(&m);
        assert_eq!(factors.turn, 100.0);
        assert_eq!(factors.wall, 100.0);
        assert_eq!(factors.movement, 5.0);
        assert_eq!(factors.miss, 100.0);
        assert_eq!(factors.decision, 70.0);

        let result = compute_risk(&m);
        assert_eq!(result.risk_score, 69);
        assert_eq!(result.risk_profile, RiskProfile::Reckless);
    }

    #[test]
    fn test_everything_maxed() {
        let result = compute_risk(&metrics(1.0, 1000.0, 100.0, 1000.0, 1000.0, 100.0));
        // decision caps at 70, so 90 + 7 = 97
        assert_eq!(result.risk_score, 97);
        assert_eq!(result.risk_profile, RiskProfile::Reckless);
    }

    #[test]
    fn test_moderate_game() {
        // wall 50*1.2=60 -> 15, misses 4*5=20 -> 3, decision 30 -> 3
        let result = compute_risk(&metrics(120.0, 0.0, 50.0, 0.0, 4.0, 500.0));
        assert_eq!(result.risk_score, 21);
        assert_eq!(result.risk_profile, RiskProfile::Cautious);
    }

    #[test]
    fn test_idempotent() {
        let m = metrics(42.0, 7.0, 33.0, 9.0, 3.0, 180.0);
        assert_eq!(compute_risk(&m), compute_risk(&m));
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("Reckless".parse::<RiskProfile>().unwrap(), RiskProfile::Reckless);
        assert_eq!(" cautious ".parse::<RiskProfile>().unwrap(), RiskProfile::Cautious);
        assert_eq!("AVERAGE".parse::<RiskProfile>().unwrap(), RiskProfile::Average);
        assert!("wild".parse::<RiskProfile>().is_err());
    }

    #[test]
    fn test_risk_score_caps_at_100() {
        let capped = RiskScore::from_score(150);
        assert_eq!(capped.risk_score, 100);
        assert_eq!(capped.risk_profile, RiskProfile::Reckless);
    }

    #[test]
    fn test_profile_serializes_as_label() {
        let value = serde_json::to_value(RiskProfile::Average).unwrap();
        assert_eq!(value, serde_json::json!("Average"));
    }
}
