// SocLookup - core/mod.rs
//
// Core business logic layer: classification, service catalog, URL
// resolution, search history, export.
// Dependencies: util layer and pure-data crates only.
// Must NOT depend on: app, platform, or any process/filesystem API.
// Persistence and browser dispatch are reached through the port traits
// in `store` and `dispatch`.

pub mod catalog;
pub mod classifier;
pub mod dispatch;
pub mod export;
pub mod history;
pub mod model;
pub mod resolver;
pub mod store;
