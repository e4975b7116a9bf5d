//! HabSim Core - habitat session engine
//!
//! Owns one session: the habitat being designed, the mission it is designed
//! for, the crew living in it, and the clock that drives the simulation.
//! Pure rules live in `habsim-logic`; this crate sequences them.
//!
//! # Architecture
//!
//! - **State**: [`state::GameState`], a versioned value the host renders
//! - **Commands**: every host mutation is a [`command::Command`] applied
//!   through [`engine::SimulationEngine::apply`]
//! - **Clock**: wall time becomes ordered tick and crew-move events
//!   ([`clock`]), drained by [`engine::SimulationEngine::advance`]
//! - **Drags**: [`drag::RoomDrag`] previews a move locally and commits once
//!
//! # Example
//!
//! ```rust,no_run
//! use habsim_core::prelude::*;
//!
//! let mut engine = SimulationEngine::with_builtin_catalog(42).unwrap();
//! engine
//!     .apply(Command::StartMission { mission_id: "lunar-short".into() })
//!     .unwrap();
//! engine.apply(Command::AutoArrange).unwrap();
//!
//! loop {
//!     let report = engine.advance(16);
//!     if report.failed {
//!         break;
//!     }
//! }
//! ```

pub mod clock;
pub mod command;
pub mod drag;
pub mod engine;
pub mod state;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::command::{Command, Notice, Rejection};
    pub use crate::drag::RoomDrag;
    pub use crate::engine::{AdvanceReport, SimulationEngine};
    pub use crate::state::{GameState, MissionFailure, SimSpeed};
}
