//! `raglib-docs` CLI library.
//!
//! Exposes the argument definitions, command implementations, and summary
//! formatters so they can be tested without spawning the binary.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::format_push_string)]

pub mod cli;
pub mod commands;
pub mod formatters;

pub use cli::{Cli, Commands};
pub use commands::{Project, execute};
