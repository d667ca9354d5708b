//! CLI module for tasklet - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for tasks, folders, views
//! and export, plus parsing of user-typed dates and record references.

pub mod commands;
pub mod parse;

pub use commands::Cli;
