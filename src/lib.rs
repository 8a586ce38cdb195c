//! Collision and motion core for a lane-crossing arcade game.
//!
//! A single player box crosses road and river lanes populated by moving
//! objects. [`sim::Simulation`] owns the object registry (a `hecs::World`)
//! and runs one fixed tick at a time; rendering and input devices stay
//! outside this crate.

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod fsm;
pub mod logging;
pub mod scene;
pub mod sim;
pub mod systems;

pub use config::Config;
