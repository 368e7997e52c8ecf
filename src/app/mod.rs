// SocLookup - app/mod.rs
//
// Application layer: shared state and background batch orchestration.
// Dependencies: core layer, platform config.

pub mod batch;
pub mod state;
