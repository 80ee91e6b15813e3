//! Shared test fixtures and utilities for Waymark crates.
//!
//! Provides mock collaborators (simulator, display) and deterministic RNG
//! helpers for pose property tests.

pub mod mocks;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use mocks::{MockSimulator, RecordingDisplay};
pub use rng::{random_position, random_unit_quaternion, seeded_rng};
