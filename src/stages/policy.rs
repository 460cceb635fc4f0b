//! The call policy stage: allowlist vetting of call targets.

use crate::{
    descriptor::format_method_descriptor,
    model::{ClassUnit, Instruction},
    toolchain::{PipelineInvariant, Stage, TransformReport},
    Error, Result,
};

/// Rejects classes that call into platform namespaces outside the allowlist.
///
/// A call owner under one of the configured platform roots must also fall
/// under an allowed prefix; otherwise the whole class is rejected with a
/// diagnostic naming the class, method, instruction index, and owner. Owners
/// outside every platform root are user code and pass freely - the sandbox
/// constrains what contracts may reach, not how they structure themselves.
///
/// Runs first in the default pipeline, on raw (pre-shadowing) symbols.
pub struct CallPolicyStage {
    platform_roots: Vec<String>,
    allowed: Vec<String>,
}

impl CallPolicyStage {
    /// Create the stage from platform roots and the allowed subset.
    pub fn new(platform_roots: &[&str], allowed: &[&str]) -> Self {
        CallPolicyStage {
            platform_roots: platform_roots.iter().map(|s| (*s).to_string()).collect(),
            allowed: allowed.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    fn is_forbidden(&self, owner: &str) -> bool {
        self.platform_roots
            .iter()
            .any(|root| owner.starts_with(root.as_str()))
            && !self
                .allowed
                .iter()
                .any(|prefix| owner.starts_with(prefix.as_str()))
    }
}

impl Stage for CallPolicyStage {
    fn name(&self) -> &'static str {
        "call-policy"
    }

    fn establishes(&self) -> &[PipelineInvariant] {
        &[PipelineInvariant::CallTargetsVetted]
    }

    fn apply(&self, unit: ClassUnit, _report: &TransformReport) -> Result<ClassUnit> {
        for method in &unit.methods {
            for (index, instruction) in method.instructions.iter().enumerate() {
                let Instruction::Call(call) = instruction else {
                    continue;
                };
                if self.is_forbidden(&call.owner) {
                    return Err(Error::Rejected {
                        class: unit.name.clone(),
                        context: format!(
                            "{}{} instruction {}",
                            method.name,
                            format_method_descriptor(&method.descriptor),
                            index
                        ),
                        message: format!(
                            "call to forbidden platform member {}.{}",
                            call.owner, call.name
                        ),
                    });
                }
            }
        }
        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        descriptor::parse_method_descriptor,
        model::{AccessFlags, CallSite, DispatchKind, MethodUnit},
    };

    fn default_policy() -> CallPolicyStage {
        CallPolicyStage::new(
            &["java/", "javax/", "jdk/", "sun/"],
            &["java/lang/", "java/util/", "java/math/"],
        )
    }

    fn unit_calling(owner: &str) -> ClassUnit {
        ClassUnit {
            name: "com/example/Token".to_string(),
            super_name: "java/lang/Object".to_string(),
            interfaces: vec![],
            fields: vec![],
            methods: vec![MethodUnit {
                flags: AccessFlags::from_wire(0x0001),
                name: "run".to_string(),
                descriptor: parse_method_descriptor("()V").unwrap(),
                instructions: vec![Instruction::Call(CallSite {
                    dispatch: DispatchKind::Virtual,
                    owner: owner.to_string(),
                    name: "touch".to_string(),
                    descriptor: parse_method_descriptor("()V").unwrap(),
                    owner_is_interface: false,
                })],
            }],
        }
    }

    #[test]
    fn test_allowed_platform_call_passes() {
        let stage = default_policy();
        let unit = unit_calling("java/util/ArrayList");
        assert!(stage.apply(unit, &TransformReport::new()).is_ok());
    }

    #[test]
    fn test_user_call_passes() {
        let stage = default_policy();
        let unit = unit_calling("com/example/Helper");
        assert!(stage.apply(unit, &TransformReport::new()).is_ok());
    }

    #[test]
    fn test_forbidden_platform_call_rejected() {
        let stage = default_policy();
        let unit = unit_calling("java/io/File");
        let result = stage.apply(unit, &TransformReport::new());

        let Err(Error::Rejected {
            class,
            context,
            message,
        }) = result
        else {
            panic!("expected rejection");
        };
        assert_eq!(class, "com/example/Token");
        assert!(context.contains("run()V"));
        assert!(context.contains("instruction 0"));
        assert!(message.contains("java/io/File"));
    }
}
