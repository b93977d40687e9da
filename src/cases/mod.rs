//! Case data - extraction from the simulator's script encoding

pub mod diagnostics;
pub mod extract;

pub use extract::{extract_cases, extract_cases_named, FormatError, CASES_MARKER};
