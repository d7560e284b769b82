// src/instructions/mod.rs
// =============================================================================
// Extracting the workflow instructions from a local document.
// =============================================================================

mod extract;

pub use extract::{write_section, ExtractPolicy};
