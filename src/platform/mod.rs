// SocLookup - platform/mod.rs
//
// Platform abstraction layer: config and data directories, file-backed
// persistence, browser launching.
// Dependencies: standard library, directories crate, core port traits.
// Must NOT depend on: app.

pub mod browser;
pub mod config;
pub mod store;
