//! Canonical demo inventory.
//!
//! Three representative AI systems and their lifecycle risks, used to
//! drive the pipeline end to end without an inventory file.

use anyhow::Result;
use mw_core::{
    AiType, AutomationLevel, DataSensitivity, DecisionCriticality, DeploymentMode, LifecyclePhase,
    LifecycleRisk, RecordStore, RiskCategory, SystemRecord,
};
use uuid::Uuid;

/// Builds a store populated with the demo inventory and risks.
pub fn demo_store() -> Result<RecordStore> {
    let mut store = RecordStore::new();

    let credit_model = store.register(SystemRecord::new(
        "ML-based Credit Underwriting Model",
        "Automates credit assessment for loan applications.",
        "Retail Banking",
        AiType::Ml,
        "Head of Lending Products",
        DeploymentMode::RealTime,
        DecisionCriticality::High,
        AutomationLevel::FullyAutomated,
        DataSensitivity::RegulatedPii,
        vec![
            "Credit Bureau API".to_string(),
            "Fraud Detection Service".to_string(),
        ],
    ))?;

    let support_assistant = store.register(SystemRecord::new(
        "LLM-based Customer Support Assistant",
        "Provides initial support to customers by answering FAQs and routing queries.",
        "Customer Service",
        AiType::Llm,
        "Head of Customer Experience",
        DeploymentMode::HumanInLoop,
        DecisionCriticality::Medium,
        AutomationLevel::Advisory,
        DataSensitivity::Confidential,
        vec!["Internal Knowledge Base API".to_string()],
    ))?;

    let report_generator = store.register(SystemRecord::new(
        "Agentic Internal Report Generator",
        "Automates the generation of internal compliance and operational reports.",
        "Internal Operations",
        AiType::Agent,
        "Head of Operations",
        DeploymentMode::InternalOnly,
        DecisionCriticality::Low,
        AutomationLevel::FullyAutomated,
        DataSensitivity::Internal,
        vec![
            "Internal Reporting DB".to_string(),
            "Document Management System API".to_string(),
        ],
    ))?;

    seed_credit_model_risks(&mut store, credit_model)?;
    seed_support_assistant_risks(&mut store, support_assistant)?;
    seed_report_generator_risks(&mut store, report_generator)?;

    Ok(store)
}

fn seed_credit_model_risks(store: &mut RecordStore, system_id: Uuid) -> Result<()> {
    store.record_risk(
        LifecycleRisk::new(
            system_id,
            LifecyclePhase::Design,
            RiskCategory::BiasFairness,
            "Bias in historical training data leads to unfair lending decisions for certain demographics.",
            5,
            4,
        )?
        .with_mitigation(
            "Implement fairness metrics, re-balance training data, and conduct adversarial testing.",
        )
        .with_owner_role("Data Scientist Lead"),
    )?;
    store.record_risk(
        LifecycleRisk::new(
            system_id,
            LifecyclePhase::Development,
            RiskCategory::PerformanceRobustness,
            "Model overfits to training data, leading to poor generalization on new applicants.",
            4,
            3,
        )?
        .with_mitigation("Utilize regularization techniques, cross-validation, and hold-out test sets.")
        .with_owner_role("ML Engineer"),
    )?;
    store.record_risk(
        LifecycleRisk::new(
            system_id,
            LifecyclePhase::Monitoring,
            RiskCategory::OperationalReliability,
            "Data drift leads to degradation of model performance in production over time.",
            5,
            4,
        )?
        .with_mitigation(
            "Implement continuous monitoring of input data and model predictions, with alerts for drift.",
        )
        .with_owner_role("Model Operations"),
    )?;
    store.record_risk(
        LifecycleRisk::new(
            system_id,
            LifecyclePhase::Deployment,
            RiskCategory::LegalRegulatory,
            "Inability to explain model decisions to regulators or customers, leading to compliance issues.",
            5,
            3,
        )?
        .with_mitigation("Develop explainability tooling and documentation for model interpretations.")
        .with_owner_role("Compliance Officer"),
    )?;
    Ok(())
}

fn seed_support_assistant_risks(store: &mut RecordStore, system_id: Uuid) -> Result<()> {
    store.record_risk(
        LifecycleRisk::new(
            system_id,
            LifecyclePhase::Training,
            RiskCategory::DataPrivacySecurity,
            "Assistant ingests sensitive customer information during retrieval and potentially exposes it.",
            4,
            3,
        )?
        .with_mitigation("Implement strict access controls for retrieval sources and data anonymization.")
        .with_owner_role("Information Security"),
    )?;
    store.record_risk(
        LifecycleRisk::new(
            system_id,
            LifecyclePhase::Deployment,
            RiskCategory::Reputational,
            "Assistant generates incorrect or misleading information, damaging customer trust.",
            4,
            4,
        )?
        .with_mitigation(
            "Implement human-in-the-loop review, strict prompt engineering, and output guardrails.",
        )
        .with_owner_role("Product Manager"),
    )?;
    store.record_risk(
        LifecycleRisk::new(
            system_id,
            LifecyclePhase::Monitoring,
            RiskCategory::OperationalReliability,
            "Assistant hallucinates or fails to respond on unforeseen edge cases.",
            3,
            3,
        )?
        .with_mitigation("Continuously log and review interactions, update knowledge base and guardrails.")
        .with_owner_role("ML Engineer"),
    )?;
    Ok(())
}

fn seed_report_generator_risks(store: &mut RecordStore, system_id: Uuid) -> Result<()> {
    store.record_risk(
        LifecycleRisk::new(
            system_id,
            LifecyclePhase::Design,
            RiskCategory::OperationalReliability,
            "Agent misunderstands query intent leading to irrelevant or incorrect reports.",
            3,
            2,
        )?
        .with_mitigation("Implement clear tool descriptions and validation of generated report content.")
        .with_owner_role("AI Architect"),
    )?;
    store.record_risk(
        LifecycleRisk::new(
            system_id,
            LifecyclePhase::Deployment,
            RiskCategory::DataPrivacySecurity,
            "Agent accesses unauthorized internal data sources during report generation.",
            3,
            2,
        )?
        .with_mitigation("Enforce strict access control policies for the agent's service account.")
        .with_owner_role("Information Security"),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mw_core::RiskTier;

    #[test]
    fn test_demo_store_contents() {
        let store = demo_store().unwrap();
        assert_eq!(store.system_count(), 3);
        assert_eq!(store.risk_count(), 9);
    }

    #[test]
    fn test_demo_store_tiers() {
        let mut store = demo_store().unwrap();
        store.recompute_all_tiers();
        let tiers: Vec<RiskTier> = store.tier_results().iter().map(|r| r.risk_tier).collect();
        assert_eq!(
            tiers,
            vec![RiskTier::Tier1, RiskTier::Tier2, RiskTier::Tier2]
        );
    }

    #[test]
    fn test_top_demo_risk_is_severity_20() {
        let store = demo_store().unwrap();
        let ranked = store.risks_by_severity();
        assert_eq!(ranked[0].severity, 20);
        assert_eq!(ranked.last().unwrap().severity, 6);
    }
}
