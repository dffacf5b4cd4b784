//! Inventory data model for Model Warden.
//!
//! This module defines the system record that describes one inventoried
//! AI system, together with the closed-set attribute tags used by the
//! risk scoring engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of AI system being inventoried.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiType {
    /// Classical machine-learning model.
    Ml,
    /// Large language model.
    Llm,
    /// Autonomous or tool-using agent.
    Agent,
}

impl std::fmt::Display for AiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiType::Ml => write!(f, "ML"),
            AiType::Llm => write!(f, "LLM"),
            AiType::Agent => write!(f, "AGENT"),
        }
    }
}

impl std::str::FromStr for AiType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ML" => Ok(AiType::Ml),
            "LLM" => Ok(AiType::Llm),
            "AGENT" => Ok(AiType::Agent),
            _ => Err(format!("Invalid ai_type: {}", s)),
        }
    }
}

/// How the system is deployed into its operating environment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentMode {
    /// Scheduled or on-demand batch execution.
    Batch,
    /// Serving live traffic with immediate effect.
    RealTime,
    /// Outputs pass through a human before taking effect.
    HumanInLoop,
    /// Only reachable from inside the organization.
    InternalOnly,
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentMode::Batch => write!(f, "BATCH"),
            DeploymentMode::RealTime => write!(f, "REAL_TIME"),
            DeploymentMode::HumanInLoop => write!(f, "HUMAN_IN_LOOP"),
            DeploymentMode::InternalOnly => write!(f, "INTERNAL_ONLY"),
        }
    }
}

impl std::str::FromStr for DeploymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BATCH" => Ok(DeploymentMode::Batch),
            "REAL_TIME" => Ok(DeploymentMode::RealTime),
            "HUMAN_IN_LOOP" => Ok(DeploymentMode::HumanInLoop),
            "INTERNAL_ONLY" => Ok(DeploymentMode::InternalOnly),
            _ => Err(format!("Invalid deployment_mode: {}", s)),
        }
    }
}

/// How consequential the decisions driven by the system are.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionCriticality {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for DecisionCriticality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionCriticality::Low => write!(f, "LOW"),
            DecisionCriticality::Medium => write!(f, "MEDIUM"),
            DecisionCriticality::High => write!(f, "HIGH"),
        }
    }
}

impl std::str::FromStr for DecisionCriticality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(DecisionCriticality::Low),
            "MEDIUM" => Ok(DecisionCriticality::Medium),
            "HIGH" => Ok(DecisionCriticality::High),
            _ => Err(format!("Invalid decision_criticality: {}", s)),
        }
    }
}

/// How much of the decision loop is automated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutomationLevel {
    /// System output is advice only.
    Advisory,
    /// A human approves each action before it takes effect.
    HumanApproval,
    /// Actions take effect without human review.
    FullyAutomated,
}

impl std::fmt::Display for AutomationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomationLevel::Advisory => write!(f, "ADVISORY"),
            AutomationLevel::HumanApproval => write!(f, "HUMAN_APPROVAL"),
            AutomationLevel::FullyAutomated => write!(f, "FULLY_AUTOMATED"),
        }
    }
}

impl std::str::FromStr for AutomationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADVISORY" => Ok(AutomationLevel::Advisory),
            "HUMAN_APPROVAL" => Ok(AutomationLevel::HumanApproval),
            "FULLY_AUTOMATED" => Ok(AutomationLevel::FullyAutomated),
            _ => Err(format!("Invalid automation_level: {}", s)),
        }
    }
}

/// Sensitivity classification of the data the system touches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSensitivity {
    Public,
    Internal,
    Confidential,
    RegulatedPii,
}

impl std::fmt::Display for DataSensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSensitivity::Public => write!(f, "PUBLIC"),
            DataSensitivity::Internal => write!(f, "INTERNAL"),
            DataSensitivity::Confidential => write!(f, "CONFIDENTIAL"),
            DataSensitivity::RegulatedPii => write!(f, "REGULATED_PII"),
        }
    }
}

impl std::str::FromStr for DataSensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PUBLIC" => Ok(DataSensitivity::Public),
            "INTERNAL" => Ok(DataSensitivity::Internal),
            "CONFIDENTIAL" => Ok(DataSensitivity::Confidential),
            "REGULATED_PII" => Ok(DataSensitivity::RegulatedPii),
            _ => Err(format!("Invalid data_sensitivity: {}", s)),
        }
    }
}

/// One inventoried AI system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemRecord {
    /// Unique identifier, immutable once assigned.
    pub system_id: Uuid,
    /// Human-readable system name.
    pub name: String,
    /// Free-text description of what the system does.
    pub description: String,
    /// Business domain the system operates in.
    pub domain: String,
    /// Kind of AI system.
    pub ai_type: AiType,
    /// Role accountable for the system.
    pub owner_role: String,
    /// How the system is deployed.
    pub deployment_mode: DeploymentMode,
    /// How consequential its decisions are.
    pub decision_criticality: DecisionCriticality,
    /// How much of the decision loop is automated.
    pub automation_level: AutomationLevel,
    /// Sensitivity of the data it touches.
    pub data_sensitivity: DataSensitivity,
    /// Names of external services the system depends on (may be empty).
    pub external_dependencies: Vec<String>,
    /// Timestamp of the last modification.
    pub last_updated: DateTime<Utc>,
}

impl SystemRecord {
    /// Creates a new record with a fresh identifier.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        domain: impl Into<String>,
        ai_type: AiType,
        owner_role: impl Into<String>,
        deployment_mode: DeploymentMode,
        decision_criticality: DecisionCriticality,
        automation_level: AutomationLevel,
        data_sensitivity: DataSensitivity,
        external_dependencies: Vec<String>,
    ) -> Self {
        Self {
            system_id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            domain: domain.into(),
            ai_type,
            owner_role: owner_role.into(),
            deployment_mode,
            decision_criticality,
            automation_level,
            data_sensitivity,
            external_dependencies,
            last_updated: Utc::now(),
        }
    }

    /// Applies an edit, bumping the last-modified timestamp.
    pub fn apply_update(&mut self, update: SystemRecordUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(domain) = update.domain {
            self.domain = domain;
        }
        if let Some(ai_type) = update.ai_type {
            self.ai_type = ai_type;
        }
        if let Some(owner_role) = update.owner_role {
            self.owner_role = owner_role;
        }
        if let Some(deployment_mode) = update.deployment_mode {
            self.deployment_mode = deployment_mode;
        }
        if let Some(decision_criticality) = update.decision_criticality {
            self.decision_criticality = decision_criticality;
        }
        if let Some(automation_level) = update.automation_level {
            self.automation_level = automation_level;
        }
        if let Some(data_sensitivity) = update.data_sensitivity {
            self.data_sensitivity = data_sensitivity;
        }
        if let Some(external_dependencies) = update.external_dependencies {
            self.external_dependencies = external_dependencies;
        }
        self.last_updated = Utc::now();
    }
}

/// Partial update for a system record; unset fields are left unchanged.
///
/// The identifier is deliberately absent: it is immutable for the life
/// of the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemRecordUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub ai_type: Option<AiType>,
    pub owner_role: Option<String>,
    pub deployment_mode: Option<DeploymentMode>,
    pub decision_criticality: Option<DecisionCriticality>,
    pub automation_level: Option<AutomationLevel>,
    pub data_sensitivity: Option<DataSensitivity>,
    pub external_dependencies: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> SystemRecord {
        SystemRecord::new(
            "Credit Underwriting Model",
            "Automates credit assessment for loan applications",
            "Retail Banking",
            AiType::Ml,
            "Head of Lending Products",
            DeploymentMode::RealTime,
            DecisionCriticality::High,
            AutomationLevel::FullyAutomated,
            DataSensitivity::RegulatedPii,
            vec!["Credit Bureau API".to_string()],
        )
    }

    #[test]
    fn test_tag_serialization() {
        assert_eq!(
            serde_json::to_string(&DataSensitivity::RegulatedPii).unwrap(),
            "\"REGULATED_PII\""
        );
        assert_eq!(
            serde_json::to_string(&DeploymentMode::HumanInLoop).unwrap(),
            "\"HUMAN_IN_LOOP\""
        );
        assert_eq!(serde_json::to_string(&AiType::Llm).unwrap(), "\"LLM\"");
    }

    #[test]
    fn test_tag_parse_rejects_out_of_domain() {
        assert!("REGULATED_PII".parse::<DataSensitivity>().is_ok());
        assert!("TOP_SECRET".parse::<DataSensitivity>().is_err());
        assert!("QUANTUM".parse::<AiType>().is_err());
        let err = serde_json::from_str::<AutomationLevel>("\"SELF_DRIVING\"");
        assert!(err.is_err());
    }

    #[test]
    fn test_display_matches_wire_tag() {
        assert_eq!(DataSensitivity::RegulatedPii.to_string(), "REGULATED_PII");
        assert_eq!(DeploymentMode::RealTime.to_string(), "REAL_TIME");
        assert_eq!(AutomationLevel::HumanApproval.to_string(), "HUMAN_APPROVAL");
        assert_eq!(DecisionCriticality::Medium.to_string(), "MEDIUM");
    }

    #[test]
    fn test_apply_update_preserves_id_and_bumps_timestamp() {
        let mut record = sample_record();
        let id = record.system_id;
        let before = record.last_updated;

        record.apply_update(SystemRecordUpdate {
            decision_criticality: Some(DecisionCriticality::Medium),
            ..Default::default()
        });

        assert_eq!(record.system_id, id);
        assert_eq!(record.decision_criticality, DecisionCriticality::Medium);
        // Untouched fields survive a partial update.
        assert_eq!(record.data_sensitivity, DataSensitivity::RegulatedPii);
        assert!(record.last_updated >= before);
    }

    #[test]
    fn test_record_round_trip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let restored: SystemRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.system_id, record.system_id);
        assert_eq!(restored.ai_type, record.ai_type);
        assert_eq!(restored.external_dependencies, record.external_dependencies);
    }
}
