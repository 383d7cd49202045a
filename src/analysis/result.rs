use super::evidence::Evidence;
use super::framework::PlatformLabel;
use super::workspace::AnalysisTarget;
use crate::error::AnalysisError;
use serde::Serialize;

/// Verdict for one package, with the evidence behind it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub target: AnalysisTarget,
    pub label: PlatformLabel,
    pub evidence: Evidence,
    pub elapsed_ms: u64,
}

/// Outcome of one target in a batch
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TargetReport {
    Classified(ClassificationResult),
    Failed {
        target: AnalysisTarget,
        category: String,
        error: String,
    },
}

impl TargetReport {
    pub fn failed(target: AnalysisTarget, error: &AnalysisError) -> Self {
        Self::Failed {
            target,
            category: error.category().to_string(),
            error: error.to_string(),
        }
    }

    pub fn target(&self) -> &AnalysisTarget {
        match self {
            Self::Classified(result) => &result.target,
            Self::Failed { target, .. } => target,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_failed_report_serialization() {
        let target = AnalysisTarget::resolve("/apps/a.apk").unwrap();
        let err = AnalysisError::BytecodeNotFound {
            dir: PathBuf::from("/apps/a - content"),
        };

        let json = serde_json::to_value(TargetReport::failed(target, &err)).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["target"], "/apps/a.apk");
        assert_eq!(json["category"], "missing-evidence");
    }

    #[test]
    fn test_classified_report_serialization() {
        let report = TargetReport::Classified(ClassificationResult {
            target: AnalysisTarget::resolve("/apps/b.apk").unwrap(),
            label: PlatformLabel::Flutter,
            evidence: Evidence::new(),
            elapsed_ms: 12,
        });

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "classified");
        assert_eq!(json["label"], "flutter");
        assert_eq!(json["elapsed_ms"], 12);
        assert!(!report.is_failed());
    }
}
