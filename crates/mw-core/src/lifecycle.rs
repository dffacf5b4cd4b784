//! Lifecycle risk catalog entries.
//!
//! A lifecycle risk ties a risk statement to one inventoried system and
//! one phase of its operational lifecycle. Severity is always impact
//! multiplied by likelihood; it is recomputed on every assessment
//! change and can never be set independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lowest accepted impact/likelihood rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted impact/likelihood rating.
pub const RATING_MAX: u8 = 5;

/// Phase of the AI system lifecycle a risk attaches to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecyclePhase {
    Design,
    Development,
    Training,
    Testing,
    Deployment,
    Monitoring,
    Maintenance,
    Decommissioning,
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecyclePhase::Design => write!(f, "DESIGN"),
            LifecyclePhase::Development => write!(f, "DEVELOPMENT"),
            LifecyclePhase::Training => write!(f, "TRAINING"),
            LifecyclePhase::Testing => write!(f, "TESTING"),
            LifecyclePhase::Deployment => write!(f, "DEPLOYMENT"),
            LifecyclePhase::Monitoring => write!(f, "MONITORING"),
            LifecyclePhase::Maintenance => write!(f, "MAINTENANCE"),
            LifecyclePhase::Decommissioning => write!(f, "DECOMMISSIONING"),
        }
    }
}

impl std::str::FromStr for LifecyclePhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DESIGN" => Ok(LifecyclePhase::Design),
            "DEVELOPMENT" => Ok(LifecyclePhase::Development),
            "TRAINING" => Ok(LifecyclePhase::Training),
            "TESTING" => Ok(LifecyclePhase::Testing),
            "DEPLOYMENT" => Ok(LifecyclePhase::Deployment),
            "MONITORING" => Ok(LifecyclePhase::Monitoring),
            "MAINTENANCE" => Ok(LifecyclePhase::Maintenance),
            "DECOMMISSIONING" => Ok(LifecyclePhase::Decommissioning),
            _ => Err(format!("Invalid lifecycle_phase: {}", s)),
        }
    }
}

/// Category of harm the risk concerns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    BiasFairness,
    PerformanceRobustness,
    DataPrivacySecurity,
    Interpretability,
    OperationalReliability,
    LegalRegulatory,
    Reputational,
    EnvironmentalSocial,
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskCategory::BiasFairness => write!(f, "BIAS_FAIRNESS"),
            RiskCategory::PerformanceRobustness => write!(f, "PERFORMANCE_ROBUSTNESS"),
            RiskCategory::DataPrivacySecurity => write!(f, "DATA_PRIVACY_SECURITY"),
            RiskCategory::Interpretability => write!(f, "INTERPRETABILITY"),
            RiskCategory::OperationalReliability => write!(f, "OPERATIONAL_RELIABILITY"),
            RiskCategory::LegalRegulatory => write!(f, "LEGAL_REGULATORY"),
            RiskCategory::Reputational => write!(f, "REPUTATIONAL"),
            RiskCategory::EnvironmentalSocial => write!(f, "ENVIRONMENTAL_SOCIAL"),
        }
    }
}

impl std::str::FromStr for RiskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BIAS_FAIRNESS" => Ok(RiskCategory::BiasFairness),
            "PERFORMANCE_ROBUSTNESS" => Ok(RiskCategory::PerformanceRobustness),
            "DATA_PRIVACY_SECURITY" => Ok(RiskCategory::DataPrivacySecurity),
            "INTERPRETABILITY" => Ok(RiskCategory::Interpretability),
            "OPERATIONAL_RELIABILITY" => Ok(RiskCategory::OperationalReliability),
            "LEGAL_REGULATORY" => Ok(RiskCategory::LegalRegulatory),
            "REPUTATIONAL" => Ok(RiskCategory::Reputational),
            "ENVIRONMENTAL_SOCIAL" => Ok(RiskCategory::EnvironmentalSocial),
            _ => Err(format!("Invalid risk_category: {}", s)),
        }
    }
}

/// Rejection of an out-of-range risk assessment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RiskValidationError {
    #[error("impact must be between 1 and 5, got {0}")]
    ImpactOutOfRange(u8),

    #[error("likelihood must be between 1 and 5, got {0}")]
    LikelihoodOutOfRange(u8),
}

/// One identified risk tied to a system and a lifecycle phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleRisk {
    /// Unique identifier for this risk entry.
    pub risk_id: Uuid,
    /// The inventoried system this risk concerns.
    pub system_id: Uuid,
    /// Lifecycle phase in which the risk manifests.
    pub lifecycle_phase: LifecyclePhase,
    /// Category of harm.
    pub risk_category: RiskCategory,
    /// Statement of the risk.
    pub risk_statement: String,
    /// Impact rating, 1-5.
    pub impact: u8,
    /// Likelihood rating, 1-5.
    pub likelihood: u8,
    /// Derived prioritization score, impact x likelihood.
    pub severity: u8,
    /// Planned mitigation, if any.
    pub mitigation: Option<String>,
    /// Role owning the mitigation, if assigned.
    pub owner_role: Option<String>,
    /// URIs of supporting evidence.
    pub evidence_links: Vec<String>,
    /// When the risk was recorded.
    pub created_at: DateTime<Utc>,
}

impl LifecycleRisk {
    /// Creates a risk entry, validating the assessment ratings and
    /// computing severity.
    pub fn new(
        system_id: Uuid,
        lifecycle_phase: LifecyclePhase,
        risk_category: RiskCategory,
        risk_statement: impl Into<String>,
        impact: u8,
        likelihood: u8,
    ) -> Result<Self, RiskValidationError> {
        validate_rating(impact, likelihood)?;
        let mut risk = Self {
            risk_id: Uuid::new_v4(),
            system_id,
            lifecycle_phase,
            risk_category,
            risk_statement: risk_statement.into(),
            impact,
            likelihood,
            severity: 0,
            mitigation: None,
            owner_role: None,
            evidence_links: Vec::new(),
            created_at: Utc::now(),
        };
        risk.recompute_severity();
        Ok(risk)
    }

    /// Sets the mitigation text.
    pub fn with_mitigation(mut self, mitigation: impl Into<String>) -> Self {
        self.mitigation = Some(mitigation.into());
        self
    }

    /// Sets the owning role.
    pub fn with_owner_role(mut self, owner_role: impl Into<String>) -> Self {
        self.owner_role = Some(owner_role.into());
        self
    }

    /// Sets the evidence links.
    pub fn with_evidence_links(mut self, links: Vec<String>) -> Self {
        self.evidence_links = links;
        self
    }

    /// Replaces the impact/likelihood assessment and recomputes
    /// severity. Rejected ratings leave the entry unchanged.
    pub fn reassess(&mut self, impact: u8, likelihood: u8) -> Result<(), RiskValidationError> {
        validate_rating(impact, likelihood)?;
        self.impact = impact;
        self.likelihood = likelihood;
        self.recompute_severity();
        Ok(())
    }

    fn recompute_severity(&mut self) {
        self.severity = self.impact * self.likelihood;
    }
}

fn validate_rating(impact: u8, likelihood: u8) -> Result<(), RiskValidationError> {
    if !(RATING_MIN..=RATING_MAX).contains(&impact) {
        return Err(RiskValidationError::ImpactOutOfRange(impact));
    }
    if !(RATING_MIN..=RATING_MAX).contains(&likelihood) {
        return Err(RiskValidationError::LikelihoodOutOfRange(likelihood));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk(impact: u8, likelihood: u8) -> Result<LifecycleRisk, RiskValidationError> {
        LifecycleRisk::new(
            Uuid::new_v4(),
            LifecyclePhase::Design,
            RiskCategory::BiasFairness,
            "Bias in historical training data",
            impact,
            likelihood,
        )
    }

    #[test]
    fn test_severity_is_impact_times_likelihood() {
        for impact in RATING_MIN..=RATING_MAX {
            for likelihood in RATING_MIN..=RATING_MAX {
                let entry = risk(impact, likelihood).unwrap();
                assert_eq!(entry.severity, impact * likelihood);
            }
        }
    }

    #[test]
    fn test_out_of_range_ratings_rejected() {
        assert_eq!(
            risk(0, 3).unwrap_err(),
            RiskValidationError::ImpactOutOfRange(0)
        );
        assert_eq!(
            risk(6, 3).unwrap_err(),
            RiskValidationError::ImpactOutOfRange(6)
        );
        assert_eq!(
            risk(3, 0).unwrap_err(),
            RiskValidationError::LikelihoodOutOfRange(0)
        );
        assert_eq!(
            risk(3, 9).unwrap_err(),
            RiskValidationError::LikelihoodOutOfRange(9)
        );
    }

    #[test]
    fn test_reassess_recomputes_severity() {
        let mut entry = risk(5, 4).unwrap();
        assert_eq!(entry.severity, 20);

        entry.reassess(2, 2).unwrap();
        assert_eq!(entry.impact, 2);
        assert_eq!(entry.likelihood, 2);
        assert_eq!(entry.severity, 4);
    }

    #[test]
    fn test_rejected_reassessment_leaves_entry_unchanged() {
        let mut entry = risk(5, 4).unwrap();
        let result = entry.reassess(7, 1);
        assert!(result.is_err());
        assert_eq!(entry.impact, 5);
        assert_eq!(entry.likelihood, 4);
        assert_eq!(entry.severity, 20);
    }

    #[test]
    fn test_builder_fields() {
        let entry = risk(3, 3)
            .unwrap()
            .with_mitigation("Re-balance training data")
            .with_owner_role("Data Scientist Lead")
            .with_evidence_links(vec!["https://evidence.example/report".to_string()]);
        assert_eq!(
            entry.mitigation.as_deref(),
            Some("Re-balance training data")
        );
        assert_eq!(entry.owner_role.as_deref(), Some("Data Scientist Lead"));
        assert_eq!(entry.evidence_links.len(), 1);
    }

    #[test]
    fn test_phase_and_category_tags() {
        assert_eq!(
            serde_json::to_string(&LifecyclePhase::Decommissioning).unwrap(),
            "\"DECOMMISSIONING\""
        );
        assert_eq!(
            serde_json::to_string(&RiskCategory::DataPrivacySecurity).unwrap(),
            "\"DATA_PRIVACY_SECURITY\""
        );
        assert!("PERFORMANCE_ROBUSTNESS".parse::<RiskCategory>().is_ok());
        assert!("UNKNOWN_CATEGORY".parse::<RiskCategory>().is_err());
    }
}
