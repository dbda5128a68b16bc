//! Command line handling for the `nitf` tool
//!

pub mod commands;
