//! Systems that operate on the session world.
//!
//! Movement, bounds, cleanup, and snapshot are per-tick passes over the
//! ECS world. The three spawners are timer-driven: they hold their own
//! state and are invoked by the engine when their scheduler timers fire.

pub mod bounds;
pub mod cleanup;
pub mod hazard_spawner;
pub mod movement;
pub mod pickup_spawner;
pub mod snapshot;
pub mod wave_spawner;
