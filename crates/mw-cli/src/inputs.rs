//! Input documents accepted by the CLI.
//!
//! These are the validated, already-typed values the core expects from
//! its form surface: deserialization rejects any out-of-domain tag
//! before a record can reach the store or the scoring engine.

use anyhow::{bail, Context, Result};
use mw_core::{
    AiType, AutomationLevel, DataSensitivity, DecisionCriticality, DeploymentMode, LifecyclePhase,
    LifecycleRisk, RecordStore, RiskCategory, SystemRecord,
};
use serde::Deserialize;
use std::path::Path;

/// One system record as supplied in an inventory file.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemRecordInput {
    pub name: String,
    pub description: String,
    pub domain: String,
    pub ai_type: AiType,
    pub owner_role: String,
    pub deployment_mode: DeploymentMode,
    pub decision_criticality: DecisionCriticality,
    pub automation_level: AutomationLevel,
    pub data_sensitivity: DataSensitivity,
    #[serde(default)]
    pub external_dependencies: Vec<String>,
}

impl SystemRecordInput {
    /// Converts the input into a record with a fresh identifier.
    pub fn into_record(self) -> SystemRecord {
        SystemRecord::new(
            self.name,
            self.description,
            self.domain,
            self.ai_type,
            self.owner_role,
            self.deployment_mode,
            self.decision_criticality,
            self.automation_level,
            self.data_sensitivity,
            self.external_dependencies,
        )
    }
}

/// One lifecycle risk as supplied in a risks file. The referenced
/// system is named, not identified, since identifiers are assigned at
/// registration.
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleRiskInput {
    pub system: String,
    pub lifecycle_phase: LifecyclePhase,
    pub risk_category: RiskCategory,
    pub risk_statement: String,
    pub impact: u8,
    pub likelihood: u8,
    #[serde(default)]
    pub mitigation: Option<String>,
    #[serde(default)]
    pub owner_role: Option<String>,
    #[serde(default)]
    pub evidence_links: Vec<String>,
}

impl LifecycleRiskInput {
    /// Resolves the named system against the store and builds the
    /// validated risk entry.
    pub fn into_risk(self, store: &RecordStore) -> Result<LifecycleRisk> {
        let Some(system) = store.system_by_name(&self.system) else {
            bail!("Risk references unknown system: {}", self.system);
        };
        let mut risk = LifecycleRisk::new(
            system.system_id,
            self.lifecycle_phase,
            self.risk_category,
            self.risk_statement,
            self.impact,
            self.likelihood,
        )
        .with_context(|| format!("Invalid risk assessment for system {}", self.system))?;
        risk.mitigation = self.mitigation;
        risk.owner_role = self.owner_role;
        risk.evidence_links = self.evidence_links;
        Ok(risk)
    }
}

/// Reads an inventory file (JSON array of system record inputs).
pub fn load_inventory(path: &Path) -> Result<Vec<SystemRecordInput>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read inventory file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse inventory file: {}", path.display()))
}

/// Reads a risks file (JSON array of lifecycle risk inputs).
pub fn load_risks(path: &Path) -> Result<Vec<LifecycleRiskInput>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read risks file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse risks file: {}", path.display()))
}
