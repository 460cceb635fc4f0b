use crate::{
    descriptor::MethodDescriptor,
    model::{AccessFlags, Instruction},
};

/// One method within a [`crate::model::ClassUnit`].
///
/// Identity is the (name, descriptor) pair, unique within the owning class. The
/// instruction sequence is ordered and order is semantically significant - it
/// is the program's control and data flow - so stages may replace instructions
/// in place but the model offers nothing that reorders them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodUnit {
    /// Access and property flags, preserved verbatim
    pub flags: AccessFlags,
    /// Method name
    pub name: String,
    /// Structured argument/return signature
    pub descriptor: MethodDescriptor,
    /// The executable body, in program order
    pub instructions: Vec<Instruction>,
}

impl MethodUnit {
    /// Number of call instructions in the body.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|insn| insn.call_site().is_some())
            .count()
    }
}
