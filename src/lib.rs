//! Runsight inspects the extracted analysis of a source repository and
//! reports how the software is meant to be invoked: as an installable
//! package or library, a runnable service, a plain script, or a test file.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
