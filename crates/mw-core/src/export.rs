//! Audit artifact export.
//!
//! Serializes the record store's contents into the external
//! representations the audit package carries: the tabular model
//! inventory, the two structured-document exports, and the executive
//! summary. Structured exports serialize every field, defaults
//! included, so byte-level diffing between runs stays meaningful.

use crate::store::RecordStore;
use crate::system::SystemRecord;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// File name of the tabular inventory export.
pub const INVENTORY_CSV: &str = "model_inventory.csv";
/// File name of the risk tiering export.
pub const RISK_TIERING_JSON: &str = "risk_tiering.json";
/// File name of the lifecycle risk map export.
pub const LIFECYCLE_RISK_MAP_JSON: &str = "lifecycle_risk_map.json";
/// File name of the executive summary document.
pub const EXECUTIVE_SUMMARY_MD: &str = "executive_summary.md";

/// Errors raised while writing export artifacts.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize artifact {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Paths of the artifacts produced by one export pass, in manifest
/// order.
#[derive(Debug, Clone)]
pub struct ExportedArtifacts {
    pub inventory_csv: PathBuf,
    pub risk_tiering_json: PathBuf,
    pub lifecycle_risk_map_json: PathBuf,
    pub executive_summary_md: PathBuf,
}

impl ExportedArtifacts {
    /// The artifact paths in their canonical (manifest) order.
    pub fn paths(&self) -> Vec<&Path> {
        vec![
            &self.inventory_csv,
            &self.risk_tiering_json,
            &self.lifecycle_risk_map_json,
            &self.executive_summary_md,
        ]
    }
}

/// Writes all four audit artifacts under `out_dir`.
///
/// Every file either commits in full or the export fails with the
/// offending path; a failed export leaves no stage output to build on.
pub fn export_artifacts(
    store: &RecordStore,
    out_dir: &Path,
) -> Result<ExportedArtifacts, ExportError> {
    fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let inventory_csv = out_dir.join(INVENTORY_CSV);
    write_artifact(&inventory_csv, render_inventory_csv(store).as_bytes())?;

    let risk_tiering_json = out_dir.join(RISK_TIERING_JSON);
    let tiering = serde_json::to_vec_pretty(&store.tier_results()).map_err(|source| {
        ExportError::Serialization {
            path: risk_tiering_json.clone(),
            source,
        }
    })?;
    write_artifact(&risk_tiering_json, &tiering)?;

    let lifecycle_risk_map_json = out_dir.join(LIFECYCLE_RISK_MAP_JSON);
    let risk_map = serde_json::to_vec_pretty(&store.risks_by_severity()).map_err(|source| {
        ExportError::Serialization {
            path: lifecycle_risk_map_json.clone(),
            source,
        }
    })?;
    write_artifact(&lifecycle_risk_map_json, &risk_map)?;

    let executive_summary_md = out_dir.join(EXECUTIVE_SUMMARY_MD);
    write_artifact(&executive_summary_md, render_executive_summary(store).as_bytes())?;

    info!(out_dir = %out_dir.display(), "Exported audit artifacts");

    Ok(ExportedArtifacts {
        inventory_csv,
        risk_tiering_json,
        lifecycle_risk_map_json,
        executive_summary_md,
    })
}

fn write_artifact(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders the model inventory as CSV, one row per system record.
///
/// Enumerations appear as their literal tags; the dependency set is a
/// single bracketed-list text field since CSV has no nested structure.
fn render_inventory_csv(store: &RecordStore) -> String {
    let mut out = String::from(
        "system_id,name,description,domain,ai_type,owner_role,deployment_mode,\
         decision_criticality,automation_level,data_sensitivity,external_dependencies,\
         last_updated\n",
    );
    for record in store.records() {
        out.push_str(&inventory_row(record));
        out.push('\n');
    }
    out
}

fn inventory_row(record: &SystemRecord) -> String {
    let dependencies =
        serde_json::to_string(&record.external_dependencies).unwrap_or_else(|_| "[]".to_string());
    [
        record.system_id.to_string(),
        record.name.clone(),
        record.description.clone(),
        record.domain.clone(),
        record.ai_type.to_string(),
        record.owner_role.clone(),
        record.deployment_mode.to_string(),
        record.decision_criticality.to_string(),
        record.automation_level.to_string(),
        record.data_sensitivity.to_string(),
        dependencies,
        record.last_updated.to_rfc3339(),
    ]
    .iter()
    .map(|field| csv_field(field))
    .collect::<Vec<_>>()
    .join(",")
}

/// Minimal RFC 4180 quoting: fields containing a comma, quote, or line
/// break are quoted, with embedded quotes doubled.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Renders the human-readable executive summary.
fn render_executive_summary(store: &RecordStore) -> String {
    let mut out = String::new();
    out.push_str("# AI Governance Audit Executive Summary\n\n");
    out.push_str(&format!(
        "**Date:** {}\n\n",
        chrono::Utc::now().format("%Y-%m-%d")
    ));

    out.push_str("## AI System Inventory\n\n");
    out.push_str("| System Name | AI Type | Decision Criticality | Data Sensitivity |\n");
    out.push_str("|---|---|---|---|\n");
    for record in store.records() {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            record.name, record.ai_type, record.decision_criticality, record.data_sensitivity
        ));
    }

    out.push_str("\n## Risk Tiering Results\n\n");
    out.push_str("| System Name | Risk Tier | Total Score |\n");
    out.push_str("|---|---|---|\n");
    for record in store.records() {
        if let Some(result) = store.tier_result(record.system_id) {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                record.name, result.risk_tier, result.score_breakdown.total_score
            ));
        }
    }

    out.push_str("\n## Top Lifecycle Risks\n\n");
    out.push_str("| System | Risk Statement | Severity | Lifecycle Phase |\n");
    out.push_str("|---|---|---|---|\n");
    for risk in store.risks_by_severity().into_iter().take(3) {
        let system_name = store
            .system(risk.system_id)
            .map(|r| r.name.as_str())
            .unwrap_or("Unknown");
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            system_name, risk.risk_statement, risk.severity, risk.lifecycle_phase
        ));
    }

    out.push_str(
        "\nRisks are prioritized by severity (impact x likelihood). The accompanying \
         evidence manifest records a SHA-256 digest for every artifact in this package.\n",
    );
    out
}
