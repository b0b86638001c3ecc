//! Tracing and checking collaborators.
//!
//! The simulator calls out to optional collaborators around every cycle and every
//! retirement. It provides:
//! 1. **`WaveformSink`:** Receives a sample per half-cycle (e.g. a VCD writer).
//! 2. **`InstructionTracer`:** Notified of each committed instruction; `CommitRing` keeps
//!    the most recent ones for post-mortem dumps.
//! 3. **`DifferentialTester`:** Checks each retirement against a reference model.

use std::collections::VecDeque;
use std::io;

use crate::common::SimError;

/// Waveform recorder driven by the clock-step driver.
pub trait WaveformSink {
    /// Opens the underlying trace; called once before the startup reset.
    fn open(&mut self) -> io::Result<()>;
    /// Records every signal at `timestamp` (one tick per half-cycle).
    fn dump(&mut self, timestamp: u64) -> io::Result<()>;
    /// Flushes and closes the trace.
    fn close(&mut self) -> io::Result<()>;
}

/// Observer of committed instructions.
pub trait InstructionTracer {
    /// Called once per retirement with its PC and encoding.
    fn trace(&mut self, pc: u32, instr: u32);

    /// Writes whatever history the tracer holds to the log; used when a run aborts.
    fn dump(&self) {}
}

/// Reference-model checker stepped in lockstep with the design.
pub trait DifferentialTester {
    /// Advances the reference by one instruction and compares.
    ///
    /// # Arguments
    ///
    /// * `pc` - Committed PC.
    /// * `next_pc` - Next PC the design resolved for it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::DiffMismatch`] when the reference disagrees.
    fn step(&mut self, pc: u32, next_pc: u32) -> Result<(), SimError>;
}

/// Bounded ring of the most recent commits.
#[derive(Debug, Clone)]
pub struct CommitRing {
    entries: VecDeque<(u32, u32)>,
    depth: usize,
}

impl CommitRing {
    /// Creates a ring holding at most `depth` commits (at least one).
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            entries: VecDeque::with_capacity(depth),
            depth,
        }
    }

    /// Retained `(pc, instr)` pairs, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of retained commits.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` before the first commit.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl InstructionTracer for CommitRing {
    fn trace(&mut self, pc: u32, instr: u32) {
        if self.entries.len() == self.depth {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back((pc, instr));
    }

    fn dump(&self) {
        tracing::warn!("last {} committed instructions:", self.entries.len());
        let newest = self.entries.len().saturating_sub(1);
        for (i, (pc, instr)) in self.entries.iter().enumerate() {
            let marker = if i == newest { "-->" } else { "   " };
            tracing::warn!("{marker} {pc:#010x}: {instr:08x}");
        }
    }
}
