// SocLookup - lib.rs
//
// Library entry point, exposing every module for integration testing and
// programmatic use.
//
// The command-line front end lives in `main.rs` and `cli.rs` and is not part
// of the library surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
