//! Common utilities and types shared across the simulator.
//!
//! 1. **Constants:** Boot address, commit-poll ceiling, and instruction field masks.
//! 2. **Error Handling:** The crate-wide `SimError` type.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types.
pub mod error;

pub use constants::{BOOT_PC, COMMIT_TIMEOUT_CYCLES, OPCODE_MASK};
pub use error::SimError;
