//! # classweave Prelude
//!
//! This module provides a convenient prelude for the most commonly used types of the
//! library. Import it to configure a toolchain and transform class units without
//! spelling out every module path.

/// The main error type for all classweave operations
pub use crate::Error;

/// The result type used throughout classweave
pub use crate::Result;

/// The unit of work of the whole pipeline
pub use crate::model::{
    AccessFlags, CallSite, ClassUnit, DispatchKind, FieldUnit, Instruction, MethodUnit,
};

/// Structured descriptors and their text form
pub use crate::descriptor::{
    format_method_descriptor, parse_method_descriptor, MethodDescriptor, TypeDescriptor,
};

/// Pipeline composition and per-run reporting
pub use crate::toolchain::{
    ClassOutcome, PipelineInvariant, Stage, Toolchain, ToolchainBuilder, TransformReport,
};

/// The shipped stages and their configuration
pub use crate::stages::{
    host_api_table, ApiRemapStage, ApiSurface, CallPolicyStage, RemapRule, RemapRuleTable,
    ShadowMap, ShadowNamespaceStage,
};
