//! Headless runner for the skyraid session engine.

pub mod game_loop;
