use crate::{
    descriptor::{MethodDescriptor, TypeDescriptor},
    model::{AccessFlags, MethodUnit},
};

/// One field within a [`ClassUnit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUnit {
    /// Access and property flags, preserved verbatim
    pub flags: AccessFlags,
    /// Field name
    pub name: String,
    /// Structured field type
    pub descriptor: TypeDescriptor,
}

/// Structural model of one compiled class.
///
/// Identity is the fully-qualified class symbol, unique within one
/// transformation run. A unit is constructed once from decoded input bytes,
/// passed by exclusive ownership through the pipeline - each stage consumes it
/// and returns either a modified or the unchanged instance - and serialized
/// back to bytes or discarded after the last stage.
///
/// Interface and member order is irrelevant to semantics but preserved exactly
/// for deterministic re-encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassUnit {
    /// Fully-qualified class symbol
    pub name: String,
    /// Superclass symbol
    pub super_name: String,
    /// Implemented-interface symbols, in decoded order
    pub interfaces: Vec<String>,
    /// Fields, in decoded order
    pub fields: Vec<FieldUnit>,
    /// Methods, in decoded order; (name, descriptor) pairs are unique
    pub methods: Vec<MethodUnit>,
}

impl ClassUnit {
    /// Look up a method by its (name, descriptor) identity.
    #[must_use]
    pub fn method(&self, name: &str, descriptor: &MethodDescriptor) -> Option<&MethodUnit> {
        self.methods
            .iter()
            .find(|method| method.name == name && &method.descriptor == descriptor)
    }

    /// Total number of instructions across all method bodies.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.methods
            .iter()
            .map(|method| method.instructions.len())
            .sum()
    }
}
