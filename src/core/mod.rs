//! Core engine types: particles, events, the event queue and the simulation
//! that ties them together.

pub mod event;
pub mod particle;
pub mod queue;
pub mod random;
pub mod sim;

pub use event::{Event, EventKind, Slot};
pub use particle::{Color, Particle};
pub use queue::EventQueue;
pub use random::RandomSource;
pub use sim::{ParticleView, RunStats, Simulation, StepOutcome};
