// Copyright 2026 The classweave contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # classweave
//!
//! A deterministic class-rewriting toolchain for sandboxed smart-contract execution engines.
//!
//! Before a submitted contract's compiled code may run inside the engine, every class passes
//! through an ordered pipeline of transformation stages that rewrites call sites, class
//! structure, and type signatures, so the contract can only ever reach a controlled, shadowed
//! surface of host and library APIs. The sandbox's guarantees are enforced purely through the
//! rewritten code, which is why this layer preserves program semantics byte-exactly for
//! everything it does not intentionally alter, and rejects - never silently corrupts -
//! anything it cannot recognize.
//!
//! ## Features
//!
//! - **Lossless class model** - Symbolic class units decode and re-encode byte-identically
//! - **Validated pipeline** - Stage ordering is data, checked at construction, immutable after
//! - **Versioned API surfaces** - Remap rules for multiple SDK generations stay active side by
//!   side without cross-matching
//! - **Structured signatures** - Call sites are matched as values, never as descriptor text
//! - **Parallel batch transform** - Distinct class units rewrite concurrently on the rayon pool
//! - **Fail-safe errors** - Malformed input, policy rejection, and configuration errors are
//!   distinct, and none of them ever yields partial output
//!
//! ## Quick Start
//!
//! ```rust
//! use classweave::prelude::*;
//!
//! // Configure once, at engine startup
//! let shadow_map = ShadowMap::builder()
//!     .prefix("java/", "s/java/")
//!     .prefix("score/", "p/score/")
//!     .build()?;
//!
//! let toolchain = Toolchain::builder()
//!     .stage(Box::new(CallPolicyStage::new(
//!         &["java/", "javax/", "jdk/", "sun/"],
//!         &["java/lang/", "java/util/", "java/math/"],
//!     )))
//!     .stage(Box::new(ShadowNamespaceStage::new(shadow_map, "u/")))
//!     .stage(Box::new(ApiRemapStage::new(host_api_table()?)))
//!     .build()?;
//!
//! // Then, per deployed class
//! let unit = ClassUnit {
//!     name: "com/example/Empty".to_string(),
//!     super_name: "java/lang/Object".to_string(),
//!     interfaces: vec![],
//!     fields: vec![],
//!     methods: vec![],
//! };
//! let report = TransformReport::new();
//! let rewritten = toolchain.run(unit, &report)?;
//! assert_eq!(rewritten.name, "u/com/example/Empty");
//! # Ok::<(), classweave::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`model`] - The class unit, method unit, and instruction model, plus the wire codec
//! - [`descriptor`] - Structured method/type descriptors and their canonical text form
//! - [`toolchain`] - The stage trait and the validated, ordered pipeline
//! - [`stages`] - The shipped stages: call policy, shadow namespace, API remap
//! - [`file`] - Bounds-checked byte reader and deterministic writer
//! - [`Error`] and [`Result`] - Crate-wide error handling
//!
//! The pipeline operates on already-decoded class units supplied by an external class-loading
//! collaborator and hands its output to an external verification collaborator; it has no wire
//! protocol of its own beyond the symbolic class-unit format in [`model::codec`].

#[macro_use]
pub(crate) mod error;

pub use crate::error::{Error, Result};
pub use crate::model::ClassUnit;

/// Convenient re-exports of the most commonly used types and traits.
pub mod prelude;

/// Structured method and type descriptors, parsed and formatted at the wire boundary.
pub mod descriptor;

/// Low-level byte stream reader and writer for the symbolic class-unit format.
pub mod file;

/// The class unit, method unit, and instruction model, plus the lossless wire codec.
pub mod model;

/// The shipped transformation stages and their static configuration.
pub mod stages;

/// The transformation-stage abstraction and the validated pipeline.
pub mod toolchain;
