//! Deterministic risk tiering for inventoried AI systems.
//!
//! Scoring is a pure function of a system record's closed-set
//! attributes: fixed lookup tables per dimension, a summed total, and
//! threshold-based tier assignment. The tables and the per-tier control
//! lists are governance policy constants frozen under
//! [`SCORING_VERSION`]; amending any of them means publishing a new
//! version tag, never rewriting results computed under an old one.

use crate::system::{
    AiType, AutomationLevel, DataSensitivity, DecisionCriticality, DeploymentMode, SystemRecord,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version tag stamped onto every result produced by this rubric.
pub const SCORING_VERSION: &str = "1.0";

/// Minimum total score for TIER_1.
pub const TIER_1_MIN: u32 = 22;
/// Minimum total score for TIER_2.
pub const TIER_2_MIN: u32 = 15;

/// Ordinal risk tier; TIER_1 carries the highest control burden.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskTier {
    #[serde(rename = "TIER_1")]
    Tier1,
    #[serde(rename = "TIER_2")]
    Tier2,
    #[serde(rename = "TIER_3")]
    Tier3,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Tier1 => write!(f, "TIER_1"),
            RiskTier::Tier2 => write!(f, "TIER_2"),
            RiskTier::Tier3 => write!(f, "TIER_3"),
        }
    }
}

/// Per-dimension score breakdown for one classification.
///
/// Every field is always serialized so exported results stay
/// byte-diffable across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub decision_criticality_score: u32,
    pub data_sensitivity_score: u32,
    pub automation_level_score: u32,
    pub ai_type_score: u32,
    pub deployment_mode_score: u32,
    pub external_dependencies_score: u32,
    pub total_score: u32,
}

/// The classification outcome for exactly one system record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskTierResult {
    /// The system this result classifies.
    pub system_id: Uuid,
    /// Assigned tier.
    pub risk_tier: RiskTier,
    /// Per-dimension scores plus the total.
    pub score_breakdown: ScoreBreakdown,
    /// Derived explanation of the assignment. A human may overwrite
    /// this; the engine only regenerates it on an explicit recompute.
    pub justification: String,
    /// Controls required at the assigned tier.
    pub required_controls: Vec<String>,
    /// When this result was computed.
    pub computed_at: DateTime<Utc>,
    /// Rubric version that produced this result.
    pub scoring_version: String,
}

fn criticality_score(value: DecisionCriticality) -> u32 {
    match value {
        DecisionCriticality::Low => 1,
        DecisionCriticality::Medium => 3,
        DecisionCriticality::High => 5,
    }
}

fn sensitivity_score(value: DataSensitivity) -> u32 {
    match value {
        DataSensitivity::Public => 1,
        DataSensitivity::Internal => 2,
        DataSensitivity::Confidential => 4,
        DataSensitivity::RegulatedPii => 5,
    }
}

fn automation_score(value: AutomationLevel) -> u32 {
    match value {
        AutomationLevel::Advisory => 1,
        AutomationLevel::HumanApproval => 3,
        AutomationLevel::FullyAutomated => 5,
    }
}

fn ai_type_score(value: AiType) -> u32 {
    match value {
        AiType::Ml => 3,
        AiType::Llm => 4,
        AiType::Agent => 5,
    }
}

fn deployment_score(value: DeploymentMode) -> u32 {
    match value {
        DeploymentMode::InternalOnly => 1,
        DeploymentMode::Batch => 2,
        DeploymentMode::HumanInLoop => 3,
        DeploymentMode::RealTime => 4,
    }
}

/// Flat 2 points when any external dependency exists, count-insensitive.
fn external_dependencies_score(dependencies: &[String]) -> u32 {
    if dependencies.is_empty() {
        0
    } else {
        2
    }
}

fn tier_for_total(total: u32) -> RiskTier {
    if total >= TIER_1_MIN {
        RiskTier::Tier1
    } else if total >= TIER_2_MIN {
        RiskTier::Tier2
    } else {
        RiskTier::Tier3
    }
}

/// Controls required at each tier, non-overlapping across tiers.
pub fn required_controls(tier: RiskTier) -> Vec<String> {
    let controls: &[&str] = match tier {
        RiskTier::Tier1 => &[
            "Independent validation",
            "Full documentation pack",
            "Robustness & security testing",
            "Bias & interpretability assessment",
            "Monitoring dashboards",
            "Formal change control & rollback",
            "Incident response plan",
        ],
        RiskTier::Tier2 => &[
            "Peer validation",
            "Standard documentation",
            "Basic robustness & security tests",
            "Periodic monitoring",
        ],
        RiskTier::Tier3 => &["Basic documentation", "Basic testing", "Periodic review"],
    };
    controls.iter().map(|c| c.to_string()).collect()
}

/// Classifies one system record.
///
/// Deterministic over the record's attributes: identical inputs yield
/// an identical breakdown, tier, and control list. Only `computed_at`
/// varies between invocations.
pub fn score_system(system: &SystemRecord) -> RiskTierResult {
    let decision_criticality_score = criticality_score(system.decision_criticality);
    let data_sensitivity_score = sensitivity_score(system.data_sensitivity);
    let automation_level_score = automation_score(system.automation_level);
    let ai_type_score = ai_type_score(system.ai_type);
    let deployment_mode_score = deployment_score(system.deployment_mode);
    let external_dependencies_score = external_dependencies_score(&system.external_dependencies);

    let total_score = decision_criticality_score
        + data_sensitivity_score
        + automation_level_score
        + ai_type_score
        + deployment_mode_score
        + external_dependencies_score;

    let risk_tier = tier_for_total(total_score);

    let justification = format!(
        "The AI system '{}' scored {} points, placing it in {} based on its characteristics.",
        system.name, total_score, risk_tier
    );

    tracing::debug!(
        system_id = %system.system_id,
        total_score,
        tier = %risk_tier,
        "Scored system"
    );

    RiskTierResult {
        system_id: system.system_id,
        risk_tier,
        score_breakdown: ScoreBreakdown {
            decision_criticality_score,
            data_sensitivity_score,
            automation_level_score,
            ai_type_score,
            deployment_mode_score,
            external_dependencies_score,
            total_score,
        },
        justification,
        required_controls: required_controls(risk_tier),
        computed_at: Utc::now(),
        scoring_version: SCORING_VERSION.to_string(),
    }
}
