//! # mw-observability
//!
//! Logging and audit infrastructure for Model Warden.
//!
//! This crate provides structured logging with tracing and the
//! governance audit trail that records every inventory mutation and
//! export-run stage.

pub mod audit;
pub mod logging;

pub use audit::{AuditEventType, AuditLogEntry, AuditResult, GovernanceAuditLog};
pub use logging::{init_logging, init_logging_with_config, LoggingConfig};
