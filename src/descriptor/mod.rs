//! Structured method and type descriptors.
//!
//! Call sites are matched and rewritten as structured values - an argument-type
//! list plus a return type - never as descriptor text. Parsing and formatting of
//! the canonical text form (`(Lp/score/Value;Lp/score/Value;)V`) live here at the
//! wire boundary; everything past the boundary compares descriptors by value
//! equality, which rules out false negatives from cosmetically different
//! encodings.
//!
//! # Key Types
//! - [`TypeDescriptor`] - One parsed type (primitive, object, or array)
//! - [`MethodDescriptor`] - Argument types plus return type of one member
//!
//! # Main Functions
//! - [`parse_type_descriptor`] / [`parse_method_descriptor`] - Text to value
//! - [`format_type_descriptor`] / [`format_method_descriptor`] - Value to text
//!
//! The two directions are exact inverses: the descriptor grammar has a unique
//! encoding for every value, so `format(parse(t)) == t` for every valid `t`.
//!
//! # Example
//! ```rust
//! use classweave::descriptor::{parse_method_descriptor, TypeDescriptor};
//!
//! let descriptor = parse_method_descriptor("(Li/IObjectArray;)V")?;
//! assert_eq!(descriptor.params.len(), 1);
//! assert_eq!(descriptor.ret, TypeDescriptor::Void);
//! # Ok::<(), classweave::Error>(())
//! ```

mod encoders;
mod parser;
mod types;

pub use encoders::{format_method_descriptor, format_type_descriptor};
pub use parser::{parse_method_descriptor, parse_type_descriptor};
pub use types::{MethodDescriptor, TypeDescriptor};
