//! Command-line interface for imageforge.
//!
//! A thin harness over the library: one command to run a reconciliation
//! pass against a file-backed store, one to render the generated
//! artifacts for a request document without persisting anything.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli};
