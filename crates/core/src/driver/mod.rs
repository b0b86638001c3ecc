//! Clock-level driver of the simulated design.
//!
//! 1. **Clock:** One full cycle per `step`, reset sequencing, cycle counting, waveform hook.
//! 2. **Commit:** Bounded polling for the design's commit pulse.

/// Clock-step driver.
pub mod clock;
/// Commit poller.
pub mod commit;

pub use clock::ClockDriver;
pub use commit::{CommitPoll, CommitPoller, Retirement};
