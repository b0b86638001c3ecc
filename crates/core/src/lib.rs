//! Commit accounting and run control for a cycle-level RISC-V simulator.
//!
//! This crate drives an external RTL design one clock edge at a time and turns its
//! commit port into prediction-accuracy statistics. It provides:
//! 1. **Driver:** Clock stepping, reset, and the bounded commit poll.
//! 2. **ISA:** Major opcodes, B-type immediate decode, and control-flow classification.
//! 3. **Statistics:** Cumulative and windowed next-PC prediction counters with reporting.
//! 4. **Run control:** The running/stopped/ended/aborted/quit state machine and execution loop.
//! 5. **Collaborators:** Design port trait, replay design, waveform/itrace/difftest hooks.

/// Common types and constants (boot address, poll ceiling, errors).
pub mod common;
/// Simulator configuration (defaults, batch controls, tracing options).
pub mod config;
/// Simulated design port list, halt signal, and the commit-log replay design.
pub mod design;
/// Clock-step driver and commit poller.
pub mod driver;
/// Instruction set helpers (opcodes, immediate decode, classification).
pub mod isa;
/// Run-control state machine and execution loop.
pub mod sim;
/// Prediction statistics collection and reporting.
pub mod stats;
/// Waveform, instruction-trace, and differential-test collaborator interfaces.
pub mod trace;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Error type shared by every fallible operation in the crate.
pub use crate::common::SimError;
/// Trait implemented by anything that can stand in for the simulated design.
pub use crate::design::Design;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
