//! Clock-step driver.
//!
//! Owns the design and advances it one full clock cycle at a time. Each cycle
//! evaluates the falling and rising edge, samples the waveform sink after each
//! evaluation, counts the cycle, and refreshes the [`ArchState`] mirror.

use std::fmt;

use crate::common::SimError;
use crate::design::{ArchState, Design};
use crate::trace::WaveformSink;

/// Drives a [`Design`]'s clock and reset inputs.
pub struct ClockDriver<D> {
    design: D,
    waveform: Option<Box<dyn WaveformSink>>,
    sim_time: u64,
    cycles: u64,
    arch: ArchState,
}

impl<D: fmt::Debug> fmt::Debug for ClockDriver<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockDriver")
            .field("design", &self.design)
            .field("waveform", &self.waveform.is_some())
            .field("sim_time", &self.sim_time)
            .field("cycles", &self.cycles)
            .field("arch", &self.arch)
            .finish()
    }
}

impl<D: Design> ClockDriver<D> {
    /// Wraps a design; no cycles are issued until `reset` or `step`.
    pub fn new(design: D) -> Self {
        Self {
            design,
            waveform: None,
            sim_time: 0,
            cycles: 0,
            arch: ArchState::default(),
        }
    }

    /// Attaches a waveform sink sampled on every half-cycle.
    pub fn set_waveform(&mut self, sink: Box<dyn WaveformSink>) {
        self.waveform = Some(sink);
    }

    /// Opens the waveform sink, if one is attached.
    pub fn open_waveform(&mut self) -> Result<(), SimError> {
        if let Some(sink) = self.waveform.as_mut() {
            sink.open()?;
            tracing::info!("waveform recording opened");
        }
        Ok(())
    }

    /// Closes and detaches the waveform sink, if one is attached.
    pub fn close_waveform(&mut self) -> Result<(), SimError> {
        if let Some(mut sink) = self.waveform.take() {
            sink.close()?;
            tracing::info!("waveform recording closed");
        }
        Ok(())
    }

    /// Runs one full clock cycle.
    ///
    /// Clock low, evaluate, sample; clock high, evaluate, sample; then the cycle counter
    /// is incremented and the architectural mirror refreshed.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.half_cycle(false)?;
        self.half_cycle(true)?;
        self.cycles += 1;
        self.arch.refresh(&self.design);
        Ok(())
    }

    fn half_cycle(&mut self, high: bool) -> Result<(), SimError> {
        self.design.set_clock(high);
        self.design.eval();
        if let Some(sink) = self.waveform.as_mut() {
            sink.dump(self.sim_time)?;
            self.sim_time += 1;
        }
        Ok(())
    }

    /// Holds reset asserted for `cycles` full cycles, then releases it.
    pub fn reset(&mut self, cycles: u32) -> Result<(), SimError> {
        self.design.set_reset(true);
        for _ in 0..cycles {
            self.step()?;
        }
        self.design.set_reset(false);
        Ok(())
    }

    /// Re-reads PC and registers from the design.
    pub fn refresh(&mut self) {
        self.arch.refresh(&self.design);
    }

    /// The driven design.
    pub const fn design(&self) -> &D {
        &self.design
    }

    /// Full clock cycles issued, reset included.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Waveform timestamps emitted so far.
    pub const fn sim_time(&self) -> u64 {
        self.sim_time
    }

    /// Architectural mirror as of the last cycle.
    pub const fn arch(&self) -> &ArchState {
        &self.arch
    }
}
