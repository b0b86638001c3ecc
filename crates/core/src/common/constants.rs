//! Global System Constants.
//!
//! This module defines system-wide constants used across the simulator. It includes:
//! 1. **Boot Constants:** The reset vector the design must present after reset.
//! 2. **Instruction Constants:** Opcode masks for classifying committed encodings.
//! 3. **Simulation Constants:** Poll ceilings and print thresholds for the execution loop.

/// Program counter the design must expose after the startup reset.
pub const BOOT_PC: u32 = 0x8000_0000;

/// Number of reset cycles issued at startup.
pub const RESET_CYCLES: u32 = 1;

/// Maximum number of cycles the commit poller waits for a retirement.
///
/// Covers stalls and multi-cycle execution units; exhausting it is not an error.
pub const COMMIT_TIMEOUT_CYCLES: u32 = 20;

/// Bit mask for extracting the opcode field from a RISC-V instruction.
pub const OPCODE_MASK: u32 = 0x7F;

/// Number of general-purpose registers mirrored from the design.
pub const NUM_GPRS: usize = 32;

/// Run requests shorter than this log every committed instruction.
pub const MAX_INST_TO_PRINT: u64 = 100;
