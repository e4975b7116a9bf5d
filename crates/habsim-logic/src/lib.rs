//! Pure habitat layout and crew simulation logic for HabSim.
//!
//! Everything here is a function over plain data: no clock, no owned
//! session state, no rendering. Randomized operations take an injected
//! `Rng` so callers (and tests) control determinism. The session
//! coordinator lives in `habsim-core`.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Object types, mission presets, crew names; validated at load |
//! | [`collision`] | AABB bounds, overlap, placement search, auto-arrange, move validation |
//! | [`config`] | Tunable rates, cadence, score weights and search budget |
//! | [`constants`] | Grid extent, projection scale, camera limits, needs range |
//! | [`crew`] | Crew needs drift, derived mood, generation, cosmetic wandering |
//! | [`error`] | Placement, object and catalog error types |
//! | [`habitat`] | Habitat designs, mission scenarios, room bookkeeping |
//! | [`objects`] | Placeable object types and in-room placement |
//! | [`projection`] | Isometric grid ↔ surface transform, camera, picking |
//! | [`resources`] | Linear per-crew consumption of oxygen, water, power, food |
//! | [`room`] | Positions, dimensions, rotation, room types and their rules |
//! | [`simulation`] | One ordered tick: resources → crew → validation → score |
//! | [`validation`] | Design rules, compliance score, crew happiness |

pub mod catalog;
pub mod collision;
pub mod config;
pub mod constants;
pub mod crew;
pub mod error;
pub mod habitat;
pub mod objects;
pub mod projection;
pub mod resources;
pub mod room;
pub mod simulation;
pub mod validation;
