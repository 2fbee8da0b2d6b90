//! Progression engine for SKYRAID.
//!
//! Owns the hecs ECS world, runs timed spawners and the completion
//! tracker at a fixed tick rate, and produces SessionSnapshots.
//! Completely headless, enabling deterministic testing.

pub mod bus;
pub mod coordinator;
pub mod engine;
pub mod profile;
pub mod scenario;
pub mod scheduler;
pub mod systems;
pub mod tracker;
pub mod world_setup;

pub use skyraid_core as core;

pub use engine::SessionEngine;

#[cfg(test)]
mod tests;
