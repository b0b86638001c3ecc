//! Run control and the execution loop.
//!
//! Provides the [`Simulator`] that ties the clock driver, commit poller, classifier,
//! and statistics together, and the run-control state machine it consults.

/// Execution loop and top-level simulator.
pub mod simulator;
/// Run-control state machine.
pub mod state;

pub use simulator::{RunSummary, Simulator};
pub use state::{RunControl, RunEvent, RunState, Transition};
