//! In-memory record store for the governance inventory.
//!
//! The store is an explicit object owned by the calling application and
//! passed by reference into every core operation; there is no ambient
//! global registry. It enforces referential integrity between systems,
//! tier results, and lifecycle risks: a tier result or risk can never
//! reference a system the store does not hold, and deleting a system
//! cascades over its dependents in one operation.
//!
//! Dependent risks are tracked in an index keyed by system id so the
//! cascade touches only the dependents of the deleted system. A
//! monotonically increasing insertion sequence gives the catalog its
//! deterministic severity tie-break.

use crate::lifecycle::{LifecycleRisk, RiskValidationError};
use crate::scoring::{self, RiskTierResult};
use crate::system::{SystemRecord, SystemRecordUpdate};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Errors raised by store operations. The store is left unchanged by
/// any operation that returns an error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unknown system id: {0}")]
    UnknownSystem(Uuid),

    #[error("Duplicate system id: {0}")]
    DuplicateSystem(Uuid),

    #[error("Unknown risk id: {0}")]
    UnknownRisk(Uuid),

    #[error("No tier result for system: {0}")]
    NoTierResult(Uuid),

    #[error(transparent)]
    InvalidRisk(#[from] RiskValidationError),
}

/// Counts of dependent records removed by a cascading delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeSummary {
    /// Tier results removed (0 or 1).
    pub tier_results: usize,
    /// Lifecycle risks removed.
    pub lifecycle_risks: usize,
}

#[derive(Debug, Clone)]
struct StoredSystem {
    record: SystemRecord,
    seq: u64,
}

#[derive(Debug, Clone)]
struct StoredRisk {
    risk: LifecycleRisk,
    seq: u64,
}

/// In-memory collection of system records and their dependents.
#[derive(Debug, Default)]
pub struct RecordStore {
    systems: HashMap<Uuid, StoredSystem>,
    tier_results: HashMap<Uuid, RiskTierResult>,
    risks: HashMap<Uuid, StoredRisk>,
    risks_by_system: HashMap<Uuid, Vec<Uuid>>,
    next_seq: u64,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Registers a new system record.
    ///
    /// The record's identifier must not already be present.
    pub fn register(&mut self, record: SystemRecord) -> Result<Uuid, StoreError> {
        let id = record.system_id;
        if self.systems.contains_key(&id) {
            return Err(StoreError::DuplicateSystem(id));
        }
        let seq = self.next_seq();
        self.systems.insert(id, StoredSystem { record, seq });
        info!(system_id = %id, "Registered system");
        Ok(id)
    }

    /// Applies a partial edit to an existing record.
    pub fn update_system(
        &mut self,
        system_id: Uuid,
        update: SystemRecordUpdate,
    ) -> Result<&SystemRecord, StoreError> {
        let stored = self
            .systems
            .get_mut(&system_id)
            .ok_or(StoreError::UnknownSystem(system_id))?;
        stored.record.apply_update(update);
        debug!(system_id = %system_id, "Updated system");
        Ok(&stored.record)
    }

    /// Deletes a system and everything referencing it, atomically.
    ///
    /// Returns how many dependent records were removed with it.
    pub fn delete_system(&mut self, system_id: Uuid) -> Result<CascadeSummary, StoreError> {
        if self.systems.remove(&system_id).is_none() {
            return Err(StoreError::UnknownSystem(system_id));
        }

        let tier_results = usize::from(self.tier_results.remove(&system_id).is_some());

        let risk_ids = self.risks_by_system.remove(&system_id).unwrap_or_default();
        for risk_id in &risk_ids {
            self.risks.remove(risk_id);
        }

        let summary = CascadeSummary {
            tier_results,
            lifecycle_risks: risk_ids.len(),
        };
        info!(
            system_id = %system_id,
            tier_results = summary.tier_results,
            lifecycle_risks = summary.lifecycle_risks,
            "Deleted system with cascade"
        );
        Ok(summary)
    }

    /// Recomputes the tier classification for one system, replacing any
    /// previous result. This is the only path that regenerates a
    /// justification.
    pub fn recompute_tier(&mut self, system_id: Uuid) -> Result<&RiskTierResult, StoreError> {
        let stored = self
            .systems
            .get(&system_id)
            .ok_or(StoreError::UnknownSystem(system_id))?;
        let result = scoring::score_system(&stored.record);
        self.tier_results.insert(system_id, result);
        Ok(&self.tier_results[&system_id])
    }

    /// Recomputes tier classifications for every registered system.
    pub fn recompute_all_tiers(&mut self) {
        let ids: Vec<Uuid> = self.systems.keys().copied().collect();
        for id in ids {
            // Ids were just read from the map, so recompute cannot fail.
            let _ = self.recompute_tier(id);
        }
    }

    /// Overwrites the justification on a system's current tier result.
    ///
    /// The edit survives until the next explicit [`recompute_tier`]
    /// request for that system.
    ///
    /// [`recompute_tier`]: RecordStore::recompute_tier
    pub fn set_justification(
        &mut self,
        system_id: Uuid,
        justification: impl Into<String>,
    ) -> Result<(), StoreError> {
        let result = self
            .tier_results
            .get_mut(&system_id)
            .ok_or(StoreError::NoTierResult(system_id))?;
        result.justification = justification.into();
        Ok(())
    }

    /// Records a lifecycle risk, enforcing referential integrity
    /// against the inventory.
    pub fn record_risk(&mut self, risk: LifecycleRisk) -> Result<Uuid, StoreError> {
        if !self.systems.contains_key(&risk.system_id) {
            return Err(StoreError::UnknownSystem(risk.system_id));
        }
        let risk_id = risk.risk_id;
        let system_id = risk.system_id;
        let seq = self.next_seq();
        self.risks.insert(risk_id, StoredRisk { risk, seq });
        self.risks_by_system.entry(system_id).or_default().push(risk_id);
        debug!(risk_id = %risk_id, system_id = %system_id, "Recorded lifecycle risk");
        Ok(risk_id)
    }

    /// Replaces a risk's impact/likelihood assessment, recomputing its
    /// severity.
    pub fn update_risk_assessment(
        &mut self,
        risk_id: Uuid,
        impact: u8,
        likelihood: u8,
    ) -> Result<&LifecycleRisk, StoreError> {
        let stored = self
            .risks
            .get_mut(&risk_id)
            .ok_or(StoreError::UnknownRisk(risk_id))?;
        stored.risk.reassess(impact, likelihood)?;
        Ok(&stored.risk)
    }

    /// Looks up one system record.
    pub fn system(&self, system_id: Uuid) -> Option<&SystemRecord> {
        self.systems.get(&system_id).map(|s| &s.record)
    }

    /// All system records in registration order.
    pub fn records(&self) -> Vec<&SystemRecord> {
        let mut stored: Vec<&StoredSystem> = self.systems.values().collect();
        stored.sort_by_key(|s| s.seq);
        stored.into_iter().map(|s| &s.record).collect()
    }

    /// Finds a system by exact name.
    pub fn system_by_name(&self, name: &str) -> Option<&SystemRecord> {
        self.records().into_iter().find(|r| r.name == name)
    }

    /// The current tier result for one system, if computed.
    pub fn tier_result(&self, system_id: Uuid) -> Option<&RiskTierResult> {
        self.tier_results.get(&system_id)
    }

    /// All current tier results, in system registration order.
    pub fn tier_results(&self) -> Vec<&RiskTierResult> {
        self.records()
            .into_iter()
            .filter_map(|r| self.tier_results.get(&r.system_id))
            .collect()
    }

    /// Lifecycle risks for one system, in insertion order.
    pub fn risks_for_system(&self, system_id: Uuid) -> Vec<&LifecycleRisk> {
        self.risks_by_system
            .get(&system_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.risks.get(id).map(|s| &s.risk))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The catalog's canonical read view: severity descending, with
    /// ties broken by insertion order (earlier first).
    pub fn risks_by_severity(&self) -> Vec<&LifecycleRisk> {
        let mut stored: Vec<&StoredRisk> = self.risks.values().collect();
        stored.sort_by(|a, b| {
            b.risk
                .severity
                .cmp(&a.risk.severity)
                .then(a.seq.cmp(&b.seq))
        });
        stored.into_iter().map(|s| &s.risk).collect()
    }

    /// Number of registered systems.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Number of recorded lifecycle risks.
    pub fn risk_count(&self) -> usize {
        self.risks.len()
    }

    /// True when no systems are registered.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{LifecyclePhase, RiskCategory};
    use crate::system::{
        AiType, AutomationLevel, DataSensitivity, DecisionCriticality, DeploymentMode,
    };

    fn sample_record(name: &str) -> SystemRecord {
        SystemRecord::new(
            name,
            "description",
            "domain",
            AiType::Ml,
            "owner",
            DeploymentMode::Batch,
            DecisionCriticality::Medium,
            AutomationLevel::HumanApproval,
            DataSensitivity::Internal,
            vec![],
        )
    }

    fn sample_risk(system_id: Uuid, impact: u8, likelihood: u8) -> LifecycleRisk {
        LifecycleRisk::new(
            system_id,
            LifecyclePhase::Monitoring,
            RiskCategory::OperationalReliability,
            "Data drift degrades performance",
            impact,
            likelihood,
        )
        .unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut store = RecordStore::new();
        let id = store.register(sample_record("A")).unwrap();
        assert_eq!(store.system(id).unwrap().name, "A");
        assert_eq!(store.system_count(), 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut store = RecordStore::new();
        let record = sample_record("A");
        let copy = record.clone();
        store.register(record).unwrap();
        let result = store.register(copy);
        assert!(matches!(result, Err(StoreError::DuplicateSystem(_))));
        assert_eq!(store.system_count(), 1);
    }

    #[test]
    fn test_records_in_registration_order() {
        let mut store = RecordStore::new();
        store.register(sample_record("first")).unwrap();
        store.register(sample_record("second")).unwrap();
        store.register(sample_record("third")).unwrap();
        let names: Vec<&str> = store.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_risk_requires_known_system() {
        let mut store = RecordStore::new();
        let risk = sample_risk(Uuid::new_v4(), 3, 3);
        let result = store.record_risk(risk);
        assert!(matches!(result, Err(StoreError::UnknownSystem(_))));
        assert_eq!(store.risk_count(), 0);
    }

    #[test]
    fn test_recompute_replaces_previous_result() {
        let mut store = RecordStore::new();
        let id = store.register(sample_record("A")).unwrap();
        store.recompute_tier(id).unwrap();
        let first_computed_at = store.tier_result(id).unwrap().computed_at;

        store
            .update_system(
                id,
                SystemRecordUpdate {
                    decision_criticality: Some(DecisionCriticality::High),
                    ..Default::default()
                },
            )
            .unwrap();
        store.recompute_tier(id).unwrap();

        assert_eq!(store.tier_results().len(), 1);
        let result = store.tier_result(id).unwrap();
        assert_eq!(result.score_breakdown.decision_criticality_score, 5);
        assert!(result.computed_at >= first_computed_at);
    }

    #[test]
    fn test_justification_edit_survives_until_explicit_recompute() {
        let mut store = RecordStore::new();
        let id = store.register(sample_record("A")).unwrap();
        store.recompute_tier(id).unwrap();

        store
            .set_justification(id, "Reviewed and accepted by the model risk committee.")
            .unwrap();
        assert_eq!(
            store.tier_result(id).unwrap().justification,
            "Reviewed and accepted by the model risk committee."
        );

        store.recompute_tier(id).unwrap();
        assert!(store
            .tier_result(id)
            .unwrap()
            .justification
            .contains("scored"));
    }

    #[test]
    fn test_set_justification_requires_existing_result() {
        let mut store = RecordStore::new();
        let id = store.register(sample_record("A")).unwrap();
        let result = store.set_justification(id, "text");
        assert!(matches!(result, Err(StoreError::NoTierResult(_))));
    }

    #[test]
    fn test_cascading_delete_removes_all_dependents() {
        let mut store = RecordStore::new();
        let id = store.register(sample_record("A")).unwrap();
        let other = store.register(sample_record("B")).unwrap();

        store.recompute_tier(id).unwrap();
        store.record_risk(sample_risk(id, 5, 4)).unwrap();
        store.record_risk(sample_risk(id, 3, 2)).unwrap();
        store.record_risk(sample_risk(other, 2, 2)).unwrap();

        let summary = store.delete_system(id).unwrap();
        assert_eq!(
            summary,
            CascadeSummary {
                tier_results: 1,
                lifecycle_risks: 2
            }
        );

        assert!(store.system(id).is_none());
        assert!(store.tier_result(id).is_none());
        assert!(store.risks_for_system(id).is_empty());
        assert!(store
            .risks_by_severity()
            .iter()
            .all(|r| r.system_id != id));
        // The other system's records are untouched.
        assert_eq!(store.risks_for_system(other).len(), 1);
    }

    #[test]
    fn test_delete_unknown_system() {
        let mut store = RecordStore::new();
        let result = store.delete_system(Uuid::new_v4());
        assert!(matches!(result, Err(StoreError::UnknownSystem(_))));
    }

    #[test]
    fn test_severity_ranking_with_insertion_tie_break() {
        let mut store = RecordStore::new();
        let id = store.register(sample_record("A")).unwrap();

        let first_16 = sample_risk(id, 4, 4); // severity 16, inserted first
        let top = sample_risk(id, 5, 4); // severity 20
        let second_16 = sample_risk(id, 4, 4); // severity 16, inserted later
        let low = sample_risk(id, 2, 2); // severity 4
        let first_16_id = first_16.risk_id;
        let top_id = top.risk_id;
        let second_16_id = second_16.risk_id;
        let low_id = low.risk_id;

        store.record_risk(first_16).unwrap();
        store.record_risk(top).unwrap();
        store.record_risk(second_16).unwrap();
        store.record_risk(low).unwrap();

        let ranked: Vec<Uuid> = store.risks_by_severity().iter().map(|r| r.risk_id).collect();
        assert_eq!(ranked, vec![top_id, first_16_id, second_16_id, low_id]);
    }

    #[test]
    fn test_ranking_stable_across_reads() {
        let mut store = RecordStore::new();
        let id = store.register(sample_record("A")).unwrap();
        for (impact, likelihood) in [(3, 3), (5, 5), (3, 3), (1, 2), (5, 1)] {
            store.record_risk(sample_risk(id, impact, likelihood)).unwrap();
        }
        let first: Vec<Uuid> = store.risks_by_severity().iter().map(|r| r.risk_id).collect();
        let second: Vec<Uuid> = store.risks_by_severity().iter().map(|r| r.risk_id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_update_risk_assessment_recomputes_severity() {
        let mut store = RecordStore::new();
        let id = store.register(sample_record("A")).unwrap();
        let risk_id = store.record_risk(sample_risk(id, 2, 2)).unwrap();

        let updated = store.update_risk_assessment(risk_id, 5, 5).unwrap();
        assert_eq!(updated.severity, 25);

        let result = store.update_risk_assessment(risk_id, 0, 5);
        assert!(matches!(
            result,
            Err(StoreError::InvalidRisk(
                RiskValidationError::ImpactOutOfRange(0)
            ))
        ));
    }
}
