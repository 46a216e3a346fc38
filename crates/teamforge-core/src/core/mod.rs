//! # Core Module
//!
//! Stateless building blocks shared by the engine and by external collaborators.
//!
//! - **Data Models** ([`models`]) - People, roles, rosters, templates and teams
//! - **File I/O** ([`io`]) - Roster CSV reading, assignment CSV writing, template catalogues
//!
//! Nothing in this module mutates a person once it has been registered in a
//! [`models::roster::Roster`]; all assignment state lives in the engine.

pub mod io;
pub mod models;
