//! Concurrent per-run transformation diagnostics.
//!
//! The report is how a run's outcome is surfaced for audit logging without
//! threading mutable state through the stages. Workers transforming distinct
//! class units write into it concurrently; the deployment collaborator reads
//! it after the run. Dropping the report changes nothing about pipeline
//! output - it is observability, not a correctness mechanism.

use dashmap::DashMap;

/// What happened to one class during a toolchain run.
#[derive(Debug, Clone, Default)]
pub struct ClassOutcome {
    /// Total call sites rewritten across all stages
    pub rewritten_calls: u64,
    /// Names of the stages that rewrote at least one call
    pub stages: Vec<&'static str>,
    /// Rejection diagnostic, if the class was rejected
    pub rejection: Option<String>,
}

/// Per-run transformation outcomes, keyed by class symbol.
///
/// Backed by a [`DashMap`] so parallel workers record outcomes without a shared
/// lock. One report instance belongs to one [`crate::toolchain::Toolchain`]
/// run (or batch run); the toolchain itself stays stateless.
#[derive(Debug, Default)]
pub struct TransformReport {
    classes: DashMap<String, ClassOutcome>,
}

impl TransformReport {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        TransformReport {
            classes: DashMap::new(),
        }
    }

    /// Record that `stage` rewrote `count` call sites in `class`.
    ///
    /// A zero count is not an outcome and is ignored.
    pub fn note_rewrites(&self, class: &str, stage: &'static str, count: u64) {
        if count == 0 {
            return;
        }

        let mut outcome = self.classes.entry(class.to_string()).or_default();
        outcome.rewritten_calls += count;
        if !outcome.stages.contains(&stage) {
            outcome.stages.push(stage);
        }
    }

    /// Record that `class` was rejected with the given diagnostic.
    pub fn note_rejection(&self, class: &str, message: &str) {
        let mut outcome = self.classes.entry(class.to_string()).or_default();
        outcome.rejection = Some(message.to_string());
    }

    /// The recorded outcome for `class`, if any stage touched or rejected it.
    #[must_use]
    pub fn outcome(&self, class: &str) -> Option<ClassOutcome> {
        self.classes.get(class).map(|entry| entry.value().clone())
    }

    /// Number of classes with a recorded outcome.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no outcome has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_accumulate() {
        let report = TransformReport::new();
        report.note_rewrites("u/A", "api-remap", 2);
        report.note_rewrites("u/A", "api-remap", 1);
        report.note_rewrites("u/A", "shadow-namespace", 4);
        report.note_rewrites("u/A", "shadow-namespace", 0);

        let outcome = report.outcome("u/A").unwrap();
        assert_eq!(outcome.rewritten_calls, 7);
        assert_eq!(outcome.stages, vec!["api-remap", "shadow-namespace"]);
        assert!(outcome.rejection.is_none());
    }

    #[test]
    fn test_zero_count_records_nothing() {
        let report = TransformReport::new();
        report.note_rewrites("u/A", "api-remap", 0);
        assert!(report.is_empty());
        assert!(report.outcome("u/A").is_none());
    }

    #[test]
    fn test_concurrent_recording() {
        use rayon::prelude::*;

        let report = TransformReport::new();
        (0..128u64).into_par_iter().for_each(|i| {
            report.note_rewrites(&format!("u/C{}", i % 8), "api-remap", 1);
        });

        assert_eq!(report.class_count(), 8);
        let total: u64 = (0..8)
            .map(|i| report.outcome(&format!("u/C{i}")).unwrap().rewritten_calls)
            .sum();
        assert_eq!(total, 128);
    }
}
