//! Low-level byte stream access for the symbolic class-unit format.
//!
//! This module provides the cursor-based [`Parser`] for bounds-checked reads and the
//! append-only [`Writer`] for deterministic encoding. Both operate on the big-endian,
//! length-prefixed layout described in the [`crate::model::codec`] module; neither knows
//! anything about class semantics.
//!
//! # Key Types
//! - [`Parser`] - Bounds-checked cursor over an input byte slice
//! - [`Writer`] - Deterministic append-only emitter
//!
//! # Example
//! ```rust
//! use classweave::file::{Parser, Writer};
//!
//! let mut writer = Writer::new();
//! writer.write_u16(0x0102);
//! writer.write_str("score/Context")?;
//!
//! let bytes = writer.into_bytes();
//! let mut parser = Parser::new(&bytes);
//! assert_eq!(parser.read_u16()?, 0x0102);
//! assert_eq!(parser.read_str()?, "score/Context");
//! # Ok::<(), classweave::Error>(())
//! ```

mod parser;
mod writer;

pub use parser::Parser;
pub use writer::Writer;
