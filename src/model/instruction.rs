use strum::Display;

use crate::descriptor::MethodDescriptor;

/// How a call site resolves its target.
///
/// Dispatch kind is part of a call's identity, not incidental metadata: a remap
/// rule applies only when all four of owner, name, descriptor, and dispatch
/// kind match exactly.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchKind {
    /// Resolved at link time against the owner class itself
    Static,
    /// Resolved through the receiver's virtual dispatch table
    Virtual,
    /// Resolved through an interface contract
    Interface,
}

/// The full identity and operands of one call instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Dispatch kind, matched exactly by remap rules
    pub dispatch: DispatchKind,
    /// Fully-qualified symbol of the class or interface owning the member
    pub owner: String,
    /// Member name
    pub name: String,
    /// Structured argument/return signature
    pub descriptor: MethodDescriptor,
    /// Whether the owner symbol names an interface.
    ///
    /// Statically dispatched calls can still target interface members; the flag
    /// is carried and re-encoded verbatim but takes no part in rule matching.
    pub owner_is_interface: bool,
}

/// One operation within a method body.
///
/// Only call operations are modeled semantically; everything else passes
/// through the pipeline as opaque bytes, which guarantees that stages cannot
/// accidentally alter operations they do not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// A call operation carrying its full matching identity
    Call(CallSite),
    /// Any non-call operation, preserved verbatim
    Other {
        /// Raw opcode byte
        opcode: u8,
        /// Raw operand bytes, never inspected
        operands: Vec<u8>,
    },
}

impl Instruction {
    /// The call site of this instruction, if it is a call.
    #[must_use]
    pub fn call_site(&self) -> Option<&CallSite> {
        match self {
            Instruction::Call(call) => Some(call),
            Instruction::Other { .. } => None,
        }
    }
}
