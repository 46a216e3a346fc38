//! # Workflows Module
//!
//! High-level entry points that run the engine phases end to end.
//!
//! - [`form`]: allocation, optional redistribution and optional balancing of a roster
//!   against a [`crate::engine::config::FormationConfig`].

pub mod form;
