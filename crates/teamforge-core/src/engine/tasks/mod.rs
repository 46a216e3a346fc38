//! The three phases of a formation run, in execution order.

pub mod allocation;
pub mod balancing;
pub mod redistribution;
