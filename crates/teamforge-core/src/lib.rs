//! # TeamForge Core Library
//!
//! Forms teams from a pool of people tagged with a role, an experience level and an
//! evaluation score, against one or more team templates, then evens out team strength
//! by swapping same-role members.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Immutable data models (`Person`, `Roster`, `TeamTemplate`,
//!   `Team`) and the tabular/TOML I/O used by loaders and reporters.
//!
//! - **[`engine`]: The Logic Core.** The stateful part of a run: the `PersonPool` with its
//!   exclusive claim operations, and the three phases of formation
//!   (`allocation`, `redistribution`, `balancing`).
//!
//! - **[`workflows`]: The Public API.** Ties the engine phases together into a single
//!   formation run with progress reporting and a final conservation check.

pub mod core;
pub mod engine;
pub mod workflows;
