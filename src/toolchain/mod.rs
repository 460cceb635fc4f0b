//! The ordered transformation pipeline.
//!
//! A [`Toolchain`] is an ordered composition of [`Stage`] values, configured
//! once at engine startup and immutable thereafter. Each class unit is folded
//! through every stage left to right; the first stage error fails the whole
//! unit with no partial application of later stages and no retry.
//!
//! Stage order is a correctness contract, not an implementation detail: a stage
//! that depends on an invariant established by an earlier stage (the API remap
//! stage relies on platform symbols already being shadowed) declares that
//! dependency through [`Stage::requires`] / [`Stage::establishes`], and
//! [`ToolchainBuilder::build`] rejects any ordering that violates it - a
//! configuration error at startup instead of a subtle miscompilation at
//! runtime.
//!
//! # Architecture
//!
//! - [`Stage`] - One rewrite pass: `apply(ClassUnit) -> Result<ClassUnit>`
//! - [`PipelineInvariant`] - The ordering vocabulary stages declare dependencies in
//! - [`Toolchain`] / [`ToolchainBuilder`] - Validated, immutable composition
//! - [`TransformReport`] - Concurrent per-run diagnostics
//!
//! # Example
//!
//! ```rust
//! use classweave::model::ClassUnit;
//! use classweave::stages::{host_api_table, ApiRemapStage, ShadowNamespaceStage, ShadowMap};
//! use classweave::toolchain::{Toolchain, TransformReport};
//!
//! let shadow_map = ShadowMap::builder()
//!     .prefix("java/", "s/java/")
//!     .prefix("score/", "p/score/")
//!     .build()?;
//!
//! let toolchain = Toolchain::builder()
//!     .stage(Box::new(ShadowNamespaceStage::new(shadow_map, "u/")))
//!     .stage(Box::new(ApiRemapStage::new(host_api_table()?)))
//!     .build()?;
//!
//! let unit = ClassUnit {
//!     name: "com/example/Empty".to_string(),
//!     super_name: "java/lang/Object".to_string(),
//!     interfaces: vec![],
//!     fields: vec![],
//!     methods: vec![],
//! };
//!
//! let report = TransformReport::new();
//! let rewritten = toolchain.run(unit, &report)?;
//! assert_eq!(rewritten.super_name, "s/java/lang/Object");
//! # Ok::<(), classweave::Error>(())
//! ```

mod report;

pub use report::{ClassOutcome, TransformReport};

use rayon::prelude::*;
use strum::Display;

use crate::{model::ClassUnit, Error, Result};

/// A named property a stage establishes for the stages after it.
///
/// Invariants are the vocabulary of the toolchain's ordering validation. They
/// carry no data; a stage either may assume an invariant holds for its input
/// (it appears in [`Stage::requires`]) or guarantees it for its output (it
/// appears in [`Stage::establishes`]).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum PipelineInvariant {
    /// Every call instruction targets an allowed namespace
    CallTargetsVetted,
    /// Platform symbols have been rewritten into the shadow namespace
    ShadowedPlatformSymbols,
    /// Host API call signatures have been retargeted to their shadow variants
    ApiCallsRemapped,
}

/// One rewrite pass over a class unit.
///
/// A stage is a pure function from class unit to class unit, total and
/// side-effect-free except for read access to its injected configuration and
/// appends to the run report. A stage may leave the unit untouched, replace
/// selected instructions in place, or reject the whole unit with
/// [`crate::Error::Rejected`].
///
/// No stage may observe or depend on another stage's internal state;
/// composition happens only in the [`Toolchain`].
pub trait Stage: Send + Sync {
    /// Stable stage name, used in reports and configuration diagnostics.
    fn name(&self) -> &'static str;

    /// Invariants this stage assumes already hold for its input.
    fn requires(&self) -> &[PipelineInvariant] {
        &[]
    }

    /// Invariants this stage guarantees for its output.
    fn establishes(&self) -> &[PipelineInvariant] {
        &[]
    }

    /// Transform one class unit.
    ///
    /// # Errors
    /// Returns [`crate::Error::Rejected`] if the unit is structurally valid but
    /// semantically disallowed by this stage's policy.
    fn apply(&self, unit: ClassUnit, report: &TransformReport) -> Result<ClassUnit>;
}

/// Builder for a [`Toolchain`].
///
/// Collects stages in the order they will run; [`ToolchainBuilder::build`]
/// validates the ordering against the stages' declared invariants.
#[derive(Default)]
pub struct ToolchainBuilder {
    stages: Vec<Box<dyn Stage>>,
}

impl ToolchainBuilder {
    /// Append a stage to the end of the pipeline.
    #[must_use]
    pub fn stage(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Validate stage ordering and freeze the pipeline.
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] if any stage requires an invariant that
    /// no earlier stage establishes.
    pub fn build(self) -> Result<Toolchain> {
        let mut established: Vec<PipelineInvariant> = Vec::new();

        for stage in &self.stages {
            for required in stage.requires() {
                if !established.contains(required) {
                    return Err(config_error!(
                        "Stage '{}' requires invariant {} which no earlier stage establishes",
                        stage.name(),
                        required
                    ));
                }
            }
            established.extend_from_slice(stage.establishes());
        }

        Ok(Toolchain {
            stages: self.stages,
        })
    }
}

/// An ordered, validated, immutable composition of transformation stages.
///
/// The toolchain holds no per-run state, which is what makes it safe to share
/// across worker threads without synchronization. All mutation happens on the
/// class units flowing through it, each owned by exactly one worker at a time.
pub struct Toolchain {
    stages: Vec<Box<dyn Stage>>,
}

impl Toolchain {
    /// Start building a toolchain.
    #[must_use]
    pub fn builder() -> ToolchainBuilder {
        ToolchainBuilder::default()
    }

    /// The configured stages, in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Fold one class unit through every stage, left to right.
    ///
    /// The moment any stage fails, the whole run fails with that error; later
    /// stages never observe a partially processed unit, and no partially
    /// rewritten output escapes.
    ///
    /// # Errors
    /// Propagates the first stage error unchanged. Rejections are additionally
    /// recorded in the report under the class's name.
    pub fn run(&self, unit: ClassUnit, report: &TransformReport) -> Result<ClassUnit> {
        let class = unit.name.clone();

        let mut current = unit;
        for stage in &self.stages {
            match stage.apply(current, report) {
                Ok(next) => current = next,
                Err(error) => {
                    if let Error::Rejected { message, .. } = &error {
                        report.note_rejection(&class, message);
                    }
                    return Err(error);
                }
            }
        }
        Ok(current)
    }

    /// Transform a batch of class units in parallel.
    ///
    /// Distinct units share no mutable state, so the batch maps over the rayon
    /// pool. Output order matches input order exactly; the first failing unit
    /// fails the whole batch result, though outcomes of units that completed on
    /// other workers remain visible in the report.
    ///
    /// # Errors
    /// Returns the first per-unit error, as [`Toolchain::run`] would.
    pub fn run_all(
        &self,
        units: Vec<ClassUnit>,
        report: &TransformReport,
    ) -> Result<Vec<ClassUnit>> {
        units
            .into_par_iter()
            .map(|unit| self.run(unit, report))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct MarkerStage {
        name: &'static str,
        requires: Vec<PipelineInvariant>,
        establishes: Vec<PipelineInvariant>,
    }

    impl Stage for MarkerStage {
        fn name(&self) -> &'static str {
            self.name
        }

        fn requires(&self) -> &[PipelineInvariant] {
            &self.requires
        }

        fn establishes(&self) -> &[PipelineInvariant] {
            &self.establishes
        }

        fn apply(&self, unit: ClassUnit, _report: &TransformReport) -> Result<ClassUnit> {
            Ok(unit)
        }
    }

    fn empty_unit(name: &str) -> ClassUnit {
        ClassUnit {
            name: name.to_string(),
            super_name: "s/java/lang/Object".to_string(),
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
        }
    }

    #[test]
    fn test_ordering_validated() {
        let result = Toolchain::builder()
            .stage(Box::new(MarkerStage {
                name: "remap",
                requires: vec![PipelineInvariant::ShadowedPlatformSymbols],
                establishes: vec![PipelineInvariant::ApiCallsRemapped],
            }))
            .build();
        assert!(matches!(result, Err(Error::Config(_))));

        let result = Toolchain::builder()
            .stage(Box::new(MarkerStage {
                name: "shadow",
                requires: vec![],
                establishes: vec![PipelineInvariant::ShadowedPlatformSymbols],
            }))
            .stage(Box::new(MarkerStage {
                name: "remap",
                requires: vec![PipelineInvariant::ShadowedPlatformSymbols],
                establishes: vec![PipelineInvariant::ApiCallsRemapped],
            }))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_toolchain_is_identity() {
        let toolchain = Toolchain::builder().build().unwrap();
        let report = TransformReport::new();
        let unit = empty_unit("u/A");
        let out = toolchain.run(unit.clone(), &report).unwrap();
        assert_eq!(out, unit);
    }

    #[test]
    fn test_rejection_recorded_and_propagated() {
        struct RejectAll;
        impl Stage for RejectAll {
            fn name(&self) -> &'static str {
                "reject-all"
            }
            fn apply(&self, unit: ClassUnit, _report: &TransformReport) -> Result<ClassUnit> {
                Err(Error::Rejected {
                    class: unit.name,
                    context: "<class>".to_string(),
                    message: "nothing is allowed".to_string(),
                })
            }
        }

        let toolchain = Toolchain::builder().stage(Box::new(RejectAll)).build().unwrap();
        let report = TransformReport::new();
        let result = toolchain.run(empty_unit("u/B"), &report);
        assert!(matches!(result, Err(Error::Rejected { .. })));

        let outcome = report.outcome("u/B").unwrap();
        assert_eq!(outcome.rejection.as_deref(), Some("nothing is allowed"));
    }

    #[test]
    fn test_run_all_preserves_order() {
        let toolchain = Toolchain::builder().build().unwrap();
        let report = TransformReport::new();
        let units: Vec<ClassUnit> = (0..64).map(|i| empty_unit(&format!("u/C{i}"))).collect();
        let names: Vec<String> = units.iter().map(|u| u.name.clone()).collect();

        let out = toolchain.run_all(units, &report).unwrap();
        let out_names: Vec<String> = out.iter().map(|u| u.name.clone()).collect();
        assert_eq!(out_names, names);
    }
}
