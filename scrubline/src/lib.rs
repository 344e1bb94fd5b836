// scrubline/src/lib.rs
//! # scrubline CLI Application
//!
//! This crate provides the command line interface on top of `scrubline-core`:
//! scrubbing JSON documents read from a file or stdin, and emitting single
//! structured log lines the way a handler would.

pub mod cli;
pub mod commands;
pub mod logger;
