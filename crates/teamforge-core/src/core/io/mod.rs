//! # Core I/O Module
//!
//! Readers and writers used by the collaborators around the engine.
//!
//! - [`roster`] - Reads person records from CSV with tolerant header matching
//! - [`templates`] - Reads team template catalogues from TOML
//! - [`assignments`] - Writes the outcome of a formation run as CSV

pub mod assignments;
pub mod roster;
pub mod templates;
