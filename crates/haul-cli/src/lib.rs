//! # haulhub CLI — Handler Modules
//!
//! Subcommand argument structs and handlers. The binary in `main.rs`
//! assembles these and dispatches.

pub mod demo;
pub mod fee;
