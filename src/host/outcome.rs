//! What the host harvests from one request

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::diagnostics::{Diagnostic, Severity};
use crate::effects::{EffectMap, FieldEffect};

/// How the entry point ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Returned normally; effects are authoritative
    Completed { effects: EffectMap },
    /// Trapped or returned a fatal outcome; a validator defect, not a
    /// listing defect
    Aborted { reason: String },
}

/// Result of one validation request
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub request_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub host_calls: u64,
    /// In the order the guest reported them, kept even on abort
    pub diagnostics: Vec<Diagnostic>,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl ValidationOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self.status, OutcomeStatus::Aborted { .. })
    }

    pub fn is_completed(&self) -> bool {
        !self.is_aborted()
    }

    pub fn abort_reason(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Aborted { reason } => Some(reason),
            OutcomeStatus::Completed { .. } => None,
        }
    }

    /// Final effects; `None` for an aborted request
    pub fn effects(&self) -> Option<&EffectMap> {
        match &self.status {
            OutcomeStatus::Completed { effects } => Some(effects),
            OutcomeStatus::Aborted { .. } => None,
        }
    }

    pub fn effect(&self, field: &str) -> Option<&FieldEffect> {
        self.effects().and_then(|effects| effects.get(field))
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: OutcomeStatus) -> ValidationOutcome {
        ValidationOutcome {
            request_id: Uuid::new_v4(),
            started_at: Utc::now(),
            duration_ms: 0,
            host_calls: 0,
            diagnostics: vec![
                Diagnostic::info("note"),
                Diagnostic::error("ListPrice", "List price must be greater than $0"),
                Diagnostic::warning("MlsStatus", "Mls status should be a string"),
            ],
            status,
        }
    }

    #[test]
    fn test_counts() {
        let o = outcome(OutcomeStatus::Completed {
            effects: EffectMap::new(),
        });
        assert_eq!(o.error_count(), 1);
        assert_eq!(o.warnings().count(), 1);
        assert!(o.is_completed());
    }

    #[test]
    fn test_serialized_status_tag() {
        let o = outcome(OutcomeStatus::Aborted {
            reason: "trap".into(),
        });
        let value = serde_json::to_value(&o).unwrap();
        assert_eq!(value["status"], "aborted");
        assert_eq!(value["reason"], "trap");
        assert!(value.get("effects").is_none());
        assert_eq!(value["diagnostics"].as_array().unwrap().len(), 3);
    }
}
