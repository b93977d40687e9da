//! caselint: MedSim case lint
//!
//! Structural conformance checker for the clinical cases consumed by the
//! MedSim simulator. Cases are extracted from the simulator's script data
//! file and checked against a minimal schema; every violation is reported.

pub mod cases;
pub mod cli;
pub mod core;
pub mod schema;
