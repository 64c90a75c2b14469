//! Event-driven simulation of elastic discs in the unit square.
//!
//! Simulated time jumps straight to the next predicted collision. Predictions
//! live in a binary min-heap and are invalidated lazily through per-particle
//! collision counts.

pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::core::{Color, Particle, RandomSource, Simulation, StepOutcome};
pub use crate::error::{Error, Result};
