//! The API remap stage: signature retargeting for known host API calls.

use crate::{
    model::{ClassUnit, Instruction},
    stages::RemapRuleTable,
    toolchain::{PipelineInvariant, Stage, TransformReport},
    Result,
};

/// Rewrites call sites that target known host/library members, retargeting
/// their type signature to the shadow signature.
///
/// The traversal is a single, stateless pass over each method body, in order.
/// For every call instruction the owner's API surface is resolved first; within
/// that surface the rule keyed by (owner, name, signature, dispatch kind) is
/// looked up. On a hit only the signature field is replaced - owner, name,
/// dispatch kind, and the owner-is-interface flag are left untouched, because
/// the host-side implementation is resolved separately by symbol plus new
/// signature. On a miss (including "no surface claims this owner") the
/// instruction is forwarded unmodified.
///
/// No instruction's rewrite depends on any other instruction, so sequence
/// length and order are preserved by construction.
pub struct ApiRemapStage {
    table: RemapRuleTable,
}

impl ApiRemapStage {
    /// Create the stage over a validated rule table.
    #[must_use]
    pub fn new(table: RemapRuleTable) -> Self {
        ApiRemapStage { table }
    }
}

impl Stage for ApiRemapStage {
    fn name(&self) -> &'static str {
        "api-remap"
    }

    fn requires(&self) -> &[PipelineInvariant] {
        // The rule tables reference shadowed owner symbols; before shadowing
        // ran there is nothing they could match.
        &[PipelineInvariant::ShadowedPlatformSymbols]
    }

    fn establishes(&self) -> &[PipelineInvariant] {
        &[PipelineInvariant::ApiCallsRemapped]
    }

    fn apply(&self, mut unit: ClassUnit, report: &TransformReport) -> Result<ClassUnit> {
        let mut rewritten: u64 = 0;

        for method in &mut unit.methods {
            for instruction in &mut method.instructions {
                let Instruction::Call(call) = instruction else {
                    continue;
                };
                if let Some(replacement) = self.table.replacement_for(call) {
                    call.descriptor = replacement.clone();
                    rewritten += 1;
                }
            }
        }

        report.note_rewrites(&unit.name, self.name(), rewritten);
        Ok(unit)
    }
}
