// src/sync/mod.rs
// =============================================================================
// Sequencing the sync: instructions, confirmation, listing, per-file copy.
// =============================================================================

mod orchestrator;

pub use orchestrator::SyncOrchestrator;
