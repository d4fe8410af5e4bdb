//! eventer: a synthetic event generator service. This crate wires the
//! composer/generator/sink engine (in the `eventer-*` crates) to a process:
//! config loading, the HTTP control plane, and the CLI entry point.

pub mod config;
pub mod http;
