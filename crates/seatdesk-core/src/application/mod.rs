//! Application layer
//!
//! Use-case implementations and their input/output types.

pub mod dto;
pub mod commands;

pub use commands::*;
