//! Governance audit trail for Model Warden.
//!
//! Records every inventory mutation and export-run stage for
//! compliance review. Entries live in a bounded in-memory ring and are
//! mirrored to tracing. The trail is synchronous: the pipeline is
//! single-threaded by contract, so a plain `RwLock` suffices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// An entry in the governance audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique entry ID.
    pub id: Uuid,
    /// Timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event_type: AuditEventType,
    /// Actor (operator or system component).
    pub actor: String,
    /// Inventoried system the event concerns (if applicable).
    pub system_id: Option<Uuid>,
    /// Export run the event concerns (if applicable).
    pub run_id: Option<Uuid>,
    /// Description of the event.
    pub description: String,
    /// Result/outcome.
    pub result: AuditResult,
}

/// Types of auditable governance events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// System record registered.
    SystemRegistered,
    /// System record edited.
    SystemUpdated,
    /// System record deleted (with cascade).
    SystemDeleted,
    /// Risk tier recomputed.
    TierComputed,
    /// Tier justification overwritten by a human.
    JustificationEdited,
    /// Lifecycle risk recorded.
    RiskRecorded,
    /// Lifecycle risk assessment changed.
    RiskReassessed,
    /// Audit artifacts exported.
    ArtifactsExported,
    /// Evidence manifest built.
    ManifestBuilt,
    /// Audit package created.
    PackageCreated,
    /// Custom event.
    Custom(String),
}

/// Result of an audited operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditResult {
    Success,
    Failure(String),
}

/// Bounded in-memory audit trail.
pub struct GovernanceAuditLog {
    entries: RwLock<VecDeque<AuditLogEntry>>,
    max_entries: usize,
    log_to_tracing: bool,
}

impl GovernanceAuditLog {
    /// Creates a new audit log.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(max_entries)),
            max_entries,
            log_to_tracing: true,
        }
    }

    /// Creates an audit log without tracing output.
    pub fn without_tracing(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(max_entries)),
            max_entries,
            log_to_tracing: false,
        }
    }

    /// Appends an entry, evicting the oldest when full.
    pub fn log(&self, entry: AuditLogEntry) {
        if self.log_to_tracing {
            info!(
                event_type = ?entry.event_type,
                actor = %entry.actor,
                system_id = ?entry.system_id,
                run_id = ?entry.run_id,
                result = ?entry.result,
                "Audit: {}",
                entry.description
            );
        }

        let mut entries = self.entries.write().expect("audit lock poisoned");
        if entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Logs an event with no system or run association.
    pub fn log_event(
        &self,
        event_type: AuditEventType,
        actor: &str,
        description: &str,
        result: AuditResult,
    ) {
        self.log(AuditLogEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type,
            actor: actor.to_string(),
            system_id: None,
            run_id: None,
            description: description.to_string(),
            result,
        });
    }

    /// Logs an event concerning one inventoried system.
    pub fn log_system_event(
        &self,
        event_type: AuditEventType,
        actor: &str,
        system_id: Uuid,
        description: &str,
        result: AuditResult,
    ) {
        self.log(AuditLogEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type,
            actor: actor.to_string(),
            system_id: Some(system_id),
            run_id: None,
            description: description.to_string(),
            result,
        });
    }

    /// Logs an event concerning one export run.
    pub fn log_run_event(
        &self,
        event_type: AuditEventType,
        actor: &str,
        run_id: Uuid,
        description: &str,
        result: AuditResult,
    ) {
        self.log(AuditLogEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type,
            actor: actor.to_string(),
            system_id: None,
            run_id: Some(run_id),
            description: description.to_string(),
            result,
        });
    }

    /// Snapshot of the current entries, oldest first.
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries
            .read()
            .expect("audit lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.read().expect("audit lock poisoned").len()
    }

    /// True when no entries are retained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_and_snapshot() {
        let log = GovernanceAuditLog::without_tracing(10);
        log.log_event(
            AuditEventType::SystemRegistered,
            "operator",
            "Registered credit model",
            AuditResult::Success,
        );
        log.log_system_event(
            AuditEventType::TierComputed,
            "operator",
            Uuid::new_v4(),
            "Recomputed tier",
            AuditResult::Success,
        );

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event_type, AuditEventType::SystemRegistered);
        assert!(entries[1].system_id.is_some());
    }

    #[test]
    fn test_ring_evicts_oldest() {
        let log = GovernanceAuditLog::without_tracing(2);
        for i in 0..3 {
            log.log_event(
                AuditEventType::Custom(format!("event-{i}")),
                "operator",
                "event",
                AuditResult::Success,
            );
        }
        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].event_type,
            AuditEventType::Custom("event-1".to_string())
        );
    }

    #[test]
    fn test_failure_result_is_preserved() {
        let log = GovernanceAuditLog::without_tracing(10);
        log.log_run_event(
            AuditEventType::ManifestBuilt,
            "operator",
            Uuid::new_v4(),
            "Manifest build failed",
            AuditResult::Failure("artifact missing".to_string()),
        );
        let entries = log.entries();
        assert_eq!(
            entries[0].result,
            AuditResult::Failure("artifact missing".to_string())
        );
        assert!(entries[0].run_id.is_some());
    }

    #[test]
    fn test_entries_in_insertion_order() {
        let log = GovernanceAuditLog::without_tracing(10);
        log.log_event(
            AuditEventType::SystemRegistered,
            "a",
            "first",
            AuditResult::Success,
        );
        log.log_event(
            AuditEventType::SystemUpdated,
            "b",
            "second",
            AuditResult::Success,
        );
        let entries = log.entries();
        assert_eq!(entries[0].description, "first");
        assert_eq!(entries[1].description, "second");
    }
}
