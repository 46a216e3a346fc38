//! # Core Models Module
//!
//! Data structures describing who can be placed and where.
//!
//! ## Key Components
//!
//! - [`ids`] - Slot-map keys identifying registered people
//! - [`person`] - The immutable person record and its normalized [`person::Role`]
//! - [`roster`] - The owning collection of people for one formation run
//! - [`template`] - Team types: size bounds and per-role requirements
//! - [`team`] - A formed team referencing roster members
//!
//! ## Usage
//!
//! ```ignore
//! use teamforge::core::models::{roster::Roster, person::PersonRecord};
//!
//! let mut roster = Roster::new();
//! let id = roster.add(PersonRecord::new("p1", "Ada", "Full Stack", 3.0, 91.5))?;
//! assert_eq!(roster.person(id).unwrap().role.key(), "full stack");
//! ```

pub mod ids;
pub mod person;
pub mod roster;
pub mod team;
pub mod template;
