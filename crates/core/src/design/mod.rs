//! Simulated design interface.
//!
//! The processor itself lives outside this crate (typically a Verilated RTL model).
//! This module defines the port list the driver relies on. It provides:
//! 1. **`Design`:** Clock/reset inputs, evaluation, and the commit-port outputs.
//! 2. **`Halt`:** The design's halt output (program end with return code, or abort).
//! 3. **`ArchState`:** The PC/register mirror refreshed after every cycle.
//! 4. **`ReplayDesign`:** A cycle-level stand-in that replays a recorded commit log.

/// Commit-log replay design.
pub mod replay;

pub use replay::{CommitRecord, ReplayDesign};

use crate::common::constants::NUM_GPRS;

/// Halt request raised by the design (e.g. on `ebreak` or a fatal internal condition).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// Program finished; `code` is its return value (0 means success).
    End {
        /// Return code, normally `a0` at the trap.
        code: u32,
    },
    /// The design hit a condition it cannot continue from.
    Abort,
}

/// Port list of a simulated processor design.
///
/// Inputs are latched by the setters and take effect on the next [`eval`](Design::eval).
/// Outputs reflect the last evaluation. `commit` is a one-cycle pulse; the `commit_*`
/// outputs and `instr` are only meaningful while it is high.
pub trait Design {
    /// Drives the clock input.
    fn set_clock(&mut self, high: bool);
    /// Drives the synchronous reset input.
    fn set_reset(&mut self, asserted: bool);
    /// Evaluates the design with the current inputs.
    fn eval(&mut self);

    /// PC of the instruction currently being fetched.
    fn pc(&self) -> u32;
    /// High for one cycle when an instruction retires.
    fn commit(&self) -> bool;
    /// PC of the retiring instruction.
    fn commit_pc(&self) -> u32;
    /// Resolved next PC of the retiring instruction.
    fn commit_next_pc(&self) -> u32;
    /// Next PC the predictor fetched after the retiring instruction.
    fn commit_pred_pc(&self) -> u32;
    /// Encoding of the retiring instruction.
    fn instr(&self) -> u32;
    /// Architectural integer registers.
    fn gprs(&self) -> [u32; NUM_GPRS];
    /// Pending halt request, if any.
    fn halt(&self) -> Option<Halt>;
}

/// Architectural state mirrored from the design after each cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchState {
    /// Current fetch PC.
    pub pc: u32,
    /// Integer register file.
    pub gpr: [u32; NUM_GPRS],
}

impl ArchState {
    /// Copies PC and registers out of the design.
    #[inline]
    pub fn refresh<D: Design + ?Sized>(&mut self, design: &D) {
        self.pc = design.pc();
        self.gpr = design.gprs();
    }

    /// Dumps PC and the register file at `info` level.
    pub fn dump(&self) {
        tracing::info!("pc  = {:#010x}", self.pc);
        for (row, regs) in self.gpr.chunks(4).enumerate() {
            let base = row * 4;
            tracing::info!(
                "x{:<2} = {:#010x}  x{:<2} = {:#010x}  x{:<2} = {:#010x}  x{:<2} = {:#010x}",
                base,
                regs[0],
                base + 1,
                regs[1],
                base + 2,
                regs[2],
                base + 3,
                regs[3]
            );
        }
    }
}
