//! Core types, traits, and errors for the RAGLib documentation pipeline.
//!
//! This crate provides the foundational types shared by every other crate
//! in the workspace: the technique registry, the introspector, the code
//! generators, and the pipeline orchestrator.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`TechniqueName`, `Category`, `Version`)
//! - The immutable [`TechniqueMetadata`] descriptor
//! - The [`Component`] plugin trait and its explicit [`ComponentContract`]
//! - Benchmark records written by generated benchmark programs
//! - Project configuration loaded from `raglib-docs.toml`
//! - Error hierarchy with contextual information

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod benchmark;
mod component;
mod error;
mod metadata;
mod types;

pub mod cli;
pub mod config;

pub use benchmark::{BenchmarkReport, BenchmarkResult, average_item_length};
pub use component::{ApplyOutcome, Component, ComponentConfig, ComponentContract, Document};
pub use config::DocsConfig;
pub use error::{Error, Result};
pub use metadata::TechniqueMetadata;
pub use types::{Category, TechniqueName, Version};
