//! Shared types and the deterministic scoring for the Snake risk service.
//!
//! Nothing in this crate performs I/O. The daemon decodes requests into
//! [`GameplayMetrics`], scores them with [`compute_risk`], and wraps the
//! outcome in an [`AnalyzeResponse`].

pub mod assessment;
pub mod metrics;
pub mod scoring;

pub use assessment::{AnalyzeResponse, RiskAssessment};
pub use metrics::{AnalyzeRequest, GameplayMetrics};
pub use scoring::{
    compute_risk, decision_factor, MetricRates, RiskFactors, RiskProfile, RiskScore,
    UnknownProfile,
};

/// Liveness acknowledgment returned by the health endpoint
pub const HEALTH_STATUS: &str = "ok";
