//! Library side of the tollgrid command-line tool.
//!
//! The binary parses arguments and prints; logging setup, the per-command
//! transform chains and result rendering live here so they can be tested.

pub mod logging;
pub mod render;
pub mod report;
