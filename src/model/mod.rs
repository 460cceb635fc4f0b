//! Structural model of one compiled class and its method bodies.
//!
//! A [`ClassUnit`] is the unit of work of the whole pipeline: it is decoded once
//! from the symbolic wire format, passed by exclusive ownership through every
//! transformation stage, and re-encoded (or discarded) at the end. The model is
//! lossless in both directions - identical model values always re-encode to
//! byte-identical output.
//!
//! # Key Types
//! - [`ClassUnit`] - One compiled class: supertypes, fields, methods
//! - [`MethodUnit`] - One method's ordered instruction sequence
//! - [`Instruction`] / [`CallSite`] - Tagged operations; calls carry their full identity
//! - [`DispatchKind`] - Static / virtual / interface resolution, part of a call's identity
//! - [`AccessFlags`] - Raw access bits, preserved verbatim across the pipeline

pub mod codec;

mod class;
mod flags;
mod instruction;
mod method;

pub use class::{ClassUnit, FieldUnit};
pub use flags::AccessFlags;
pub use instruction::{CallSite, DispatchKind, Instruction};
pub use method::MethodUnit;
