//! # Engine Module
//!
//! The stateful part of team formation. Everything that changes during a run lives here:
//! who is still available, which teams exist, and how members move between them.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Templates, redistribution toggle and balancing limits
//! - **Availability** ([`pool`]) - The [`pool::PersonPool`] and its exclusive claim operations
//! - **Measurement** ([`metrics`]) - Per-team tallies and the imbalance metric
//! - **Phases** ([`tasks`]) - Allocation, redistribution and balancing
//! - **Outcomes** ([`state`]) - Stop reasons, floor-fill records, placements and swaps
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Phase Hand-off
//!
//! Allocation owns the pool until it returns its teams and leftover list. Redistribution
//! then owns the leftover list, and balancing owns the teams. No phase reaches back into
//! a previous phase's state, so a person is always either available or assigned.

pub mod config;
pub mod error;
pub mod metrics;
pub mod pool;
pub mod progress;
pub mod state;
pub mod tasks;
