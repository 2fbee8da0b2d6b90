//! Core types and definitions for the SKYRAID progression engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! commands, events, configuration, state snapshots, and constants.
//! It has no dependency on any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
