//! The shadow namespace stage: symbol relocation into the sandbox.
//!
//! The sandbox never lets contract code name a real platform class. This stage
//! relocates every class symbol a unit mentions: platform namespaces move under
//! their configured shadow prefixes, everything else - user code - moves under
//! the user prefix. Wrapper and internal symbols emitted by other pipeline
//! components are already inside the sandbox and pass through unchanged.

use crate::{
    descriptor::{MethodDescriptor, TypeDescriptor},
    model::{ClassUnit, Instruction},
    toolchain::{PipelineInvariant, Stage, TransformReport},
    Result,
};

/// Namespaces other pipeline components own; never relocated
const INTERNAL_PREFIXES: &[&str] = &["i/", "w/"];

/// An ordered prefix-rewrite table for class symbols.
///
/// Longest source prefix wins, so `java/util/concurrent/` may map differently
/// from `java/util/` within one table.
#[derive(Debug, Clone)]
pub struct ShadowMap {
    /// (source, target) pairs, sorted longest source first
    entries: Vec<(String, String)>,
}

/// Builder for a [`ShadowMap`].
#[derive(Debug, Default)]
pub struct ShadowMapBuilder {
    entries: Vec<(String, String)>,
}

impl ShadowMapBuilder {
    /// Map symbols starting with `from` to start with `to` instead.
    #[must_use]
    pub fn prefix(mut self, from: &str, to: &str) -> Self {
        self.entries.push((from.to_string(), to.to_string()));
        self
    }

    /// Validate and freeze the map.
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] if a source prefix is empty or listed
    /// twice.
    pub fn build(self) -> Result<ShadowMap> {
        let mut entries = self.entries;
        for (index, (source, _)) in entries.iter().enumerate() {
            if source.is_empty() {
                return Err(config_error!("Shadow map has an empty source prefix"));
            }
            if entries[index + 1..]
                .iter()
                .any(|(other, _)| other == source)
            {
                return Err(config_error!(
                    "Shadow map lists source prefix '{}' twice",
                    source
                ));
            }
        }

        entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Ok(ShadowMap { entries })
    }
}

impl ShadowMap {
    /// Start building a map.
    #[must_use]
    pub fn builder() -> ShadowMapBuilder {
        ShadowMapBuilder::default()
    }

    /// Rewrite `symbol` through the longest matching source prefix, if any.
    #[must_use]
    pub fn rewrite(&self, symbol: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|(source, _)| symbol.starts_with(source.as_str()))
            .map(|(source, target)| format!("{}{}", target, &symbol[source.len()..]))
    }

    /// Returns `true` if `symbol` already lives under a target prefix.
    #[must_use]
    pub fn is_shadowed(&self, symbol: &str) -> bool {
        self.entries
            .iter()
            .any(|(_, target)| symbol.starts_with(target.as_str()))
    }
}

/// Relocates every class symbol of a unit into the sandbox namespaces.
///
/// Covers the class's own name, its supertypes, field and method descriptors,
/// and the owner and descriptor of every call instruction. Member names and
/// non-call instructions are never touched.
pub struct ShadowNamespaceStage {
    map: ShadowMap,
    user_prefix: String,
}

impl ShadowNamespaceStage {
    /// Create the stage over a validated map and the user-code prefix.
    #[must_use]
    pub fn new(map: ShadowMap, user_prefix: &str) -> Self {
        ShadowNamespaceStage {
            map,
            user_prefix: user_prefix.to_string(),
        }
    }

    fn rewrite_symbol(&self, symbol: &str) -> String {
        if let Some(mapped) = self.map.rewrite(symbol) {
            return mapped;
        }
        if symbol.starts_with(self.user_prefix.as_str())
            || self.map.is_shadowed(symbol)
            || INTERNAL_PREFIXES
                .iter()
                .any(|prefix| symbol.starts_with(prefix))
        {
            return symbol.to_string();
        }
        format!("{}{}", self.user_prefix, symbol)
    }

    fn rewrite_type(&self, descriptor: &mut TypeDescriptor) {
        match descriptor {
            TypeDescriptor::Object(symbol) => *symbol = self.rewrite_symbol(symbol),
            TypeDescriptor::Array(component) => self.rewrite_type(component),
            _ => {}
        }
    }

    fn rewrite_method_descriptor(&self, descriptor: &mut MethodDescriptor) {
        for param in &mut descriptor.params {
            self.rewrite_type(param);
        }
        self.rewrite_type(&mut descriptor.ret);
    }
}

impl Stage for ShadowNamespaceStage {
    fn name(&self) -> &'static str {
        "shadow-namespace"
    }

    fn establishes(&self) -> &[PipelineInvariant] {
        &[PipelineInvariant::ShadowedPlatformSymbols]
    }

    fn apply(&self, mut unit: ClassUnit, report: &TransformReport) -> Result<ClassUnit> {
        unit.name = self.rewrite_symbol(&unit.name);
        unit.super_name = self.rewrite_symbol(&unit.super_name);
        for interface in &mut unit.interfaces {
            *interface = self.rewrite_symbol(interface);
        }
        for field in &mut unit.fields {
            self.rewrite_type(&mut field.descriptor);
        }

        let mut rewritten: u64 = 0;
        for method in &mut unit.methods {
            self.rewrite_method_descriptor(&mut method.descriptor);
            for instruction in &mut method.instructions {
                let Instruction::Call(call) = instruction else {
                    continue;
                };
                let owner = self.rewrite_symbol(&call.owner);
                let mut descriptor = call.descriptor.clone();
                self.rewrite_method_descriptor(&mut descriptor);

                if owner != call.owner || descriptor != call.descriptor {
                    call.owner = owner;
                    call.descriptor = descriptor;
                    rewritten += 1;
                }
            }
        }

        report.note_rewrites(&unit.name, self.name(), rewritten);
        Ok(unit)
    }
}
