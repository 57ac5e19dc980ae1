//! Simulation context and command dispatch.
//!
//! Provides the [`Simulator`] context that owns every engine, the [`Command`]
//! vocabulary it accepts, and the typed [`Response`] each command produces.

/// Command parsing.
pub mod command;

/// Command results and their text rendering.
pub mod response;

/// The simulator context.
pub mod simulator;

pub use command::Command;
pub use response::Response;
pub use simulator::Simulator;
