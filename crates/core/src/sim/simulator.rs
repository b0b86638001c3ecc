//! Simulator: owns the clock driver, commit poller, statistics, and run control.
//!
//! One `Simulator` drives one design for the whole process. `init` resets the design
//! and checks the boot PC; each `run(n)` request then retires up to `n` instructions,
//! scoring every control-flow retirement, until the budget runs out or the run-control
//! machine leaves `Running`.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info, warn};

use super::state::{RunControl, RunEvent, RunState, Transition};
use crate::common::SimError;
use crate::common::constants::MAX_INST_TO_PRINT;
use crate::config::Config;
use crate::design::{ArchState, Design, Halt};
use crate::driver::{ClockDriver, CommitPoller, Retirement};
use crate::isa::classify;
use crate::stats::PredictionStats;
use crate::trace::{CommitRing, DifferentialTester, InstructionTracer, WaveformSink};

/// Top-level simulator.
pub struct Simulator<D> {
    clock: ClockDriver<D>,
    poller: CommitPoller,
    stats: PredictionStats,
    control: RunControl,
    config: Config,
    tracer: Option<Box<dyn InstructionTracer>>,
    difftest: Option<Box<dyn DifferentialTester>>,
    retired: u64,
    host_time: Duration,
    terminal_entry: Option<RunState>,
}

impl<D: fmt::Debug> fmt::Debug for Simulator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("clock", &self.clock)
            .field("poller", &self.poller)
            .field("stats", &self.stats)
            .field("control", &self.control)
            .field("retired", &self.retired)
            .field("host_time", &self.host_time)
            .finish_non_exhaustive()
    }
}

/// Serializable snapshot of a simulator's counters.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Run state at the time of the snapshot.
    pub state: RunState,
    /// PC recorded on the last halt, abort, or quit.
    pub halt_pc: u32,
    /// Return code recorded when the program ended.
    pub halt_ret: u32,
    /// Instructions retired across all run requests.
    pub retired: u64,
    /// Clock cycles issued, reset included.
    pub cycles: u64,
    /// Commit polls that ran out of cycles.
    pub commit_timeouts: u64,
    /// Host time spent inside run requests, in microseconds.
    pub host_us: u64,
    /// Next-PC prediction counters.
    pub prediction: PredictionStats,
}

impl RunSummary {
    /// Pretty-printed JSON rendering.
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<D: Design> Simulator<D> {
    /// Creates a simulator around `design`.
    ///
    /// When `config.trace.itrace` is set a [`CommitRing`] is installed as the instruction
    /// tracer.
    pub fn new(design: D, config: Config) -> Self {
        let tracer: Option<Box<dyn InstructionTracer>> = if config.trace.itrace {
            Some(Box::new(CommitRing::new(config.trace.itrace_depth)))
        } else {
            None
        };
        Self {
            clock: ClockDriver::new(design),
            poller: CommitPoller::new(config.general.commit_timeout),
            stats: PredictionStats::new(config.batch.report_interval),
            control: RunControl::new(),
            config,
            tracer,
            difftest: None,
            retired: 0,
            host_time: Duration::ZERO,
            terminal_entry: None,
        }
    }

    /// Attaches a waveform sink; call before `init` so the reset is recorded.
    pub fn set_waveform(&mut self, sink: Box<dyn WaveformSink>) {
        self.clock.set_waveform(sink);
    }

    /// Replaces the instruction tracer.
    pub fn set_tracer(&mut self, tracer: Box<dyn InstructionTracer>) {
        self.tracer = Some(tracer);
    }

    /// Attaches a differential tester.
    pub fn set_difftest(&mut self, difftest: Box<dyn DifferentialTester>) {
        self.difftest = Some(difftest);
    }

    /// Enables or disables quit-on-limit for subsequent run requests.
    pub const fn set_quit_on_limit(&mut self, enabled: bool) {
        self.config.batch.quit_on_limit = enabled;
    }

    /// Sets the periodic report interval (0 disables).
    pub const fn set_report_interval(&mut self, interval: u64) {
        self.config.batch.report_interval = interval;
        self.stats.set_report_interval(interval);
    }

    /// Opens the waveform, resets the design, and checks the boot PC.
    ///
    /// # Errors
    ///
    /// [`SimError::BootPcMismatch`] when the design does not come out of reset at the
    /// configured boot address. The waveform is closed first so the partial trace stays
    /// readable.
    pub fn init(&mut self) -> Result<(), SimError> {
        self.clock.open_waveform()?;
        self.clock.reset(self.config.general.reset_cycles)?;

        let expected = self.config.general.boot_pc;
        let actual = self.clock.arch().pc;
        if actual != expected {
            self.clock.close_waveform()?;
            error!(
                "after reset the design PC is {:#010x}, expected {:#010x}",
                actual, expected
            );
            return Err(SimError::BootPcMismatch { expected, actual });
        }
        info!("design out of reset at pc = {:#010x}", actual);
        Ok(())
    }

    /// Executes a run request of up to `n` instructions.
    ///
    /// Returns the run state once the request finishes. Entering `Ended`, `Aborted`, or
    /// `Quit` during the request produces the final report.
    ///
    /// # Errors
    ///
    /// [`SimError::ProgramEnded`] if the program already ended or aborted; nothing is
    /// touched in that case. Waveform I/O failures propagate.
    pub fn run(&mut self, n: u64) -> Result<RunState, SimError> {
        if self.transition(RunEvent::Start) == Transition::Rejected {
            warn!("{}", SimError::ProgramEnded);
            return Err(SimError::ProgramEnded);
        }

        let start = Instant::now();
        let result = self.execute(n);
        self.host_time += start.elapsed();

        // A failed request still leaves `Running` and owes any pending final report.
        let _ = self.transition(RunEvent::BudgetExhausted);
        let report = match self.terminal_entry.take() {
            Some(state) => self.on_terminal(state),
            None => Ok(()),
        };
        result?;
        report?;
        Ok(self.control.state())
    }

    fn execute(&mut self, n: u64) -> Result<(), SimError> {
        let print_step = n < MAX_INST_TO_PRINT;
        for remaining in (1..=n).rev() {
            if self.control.state() != RunState::Running {
                break;
            }

            let poll = self.poller.await_commit(&mut self.clock)?;
            let retired = poll.retirement;
            let halt = self.clock.design().halt();
            // Halted while waiting: nothing retired, so the halt is pinned to the fetch PC.
            let halted_idle = halt.is_some() && !poll.committed;

            if let Some(halt) = halt {
                let pc = if halted_idle {
                    self.clock.arch().pc
                } else {
                    retired.pc
                };
                let event = match halt {
                    Halt::End { code } => RunEvent::Halt { pc, code },
                    Halt::Abort => RunEvent::Abort { pc },
                };
                let _ = self.transition(event);
            }
            if halted_idle {
                break;
            }
            self.retired += 1;

            self.account(retired, print_step);

            if let Some(report) = self.stats.maybe_report(self.retired) {
                info!("{report}");
            }

            if self.config.batch.quit_on_limit
                && remaining == 1
                && self.control.state() == RunState::Running
            {
                let _ = self.transition(RunEvent::LimitReached { pc: retired.pc });
                break;
            }
        }
        Ok(())
    }

    /// Scores one retirement and hands it to the tracer and the differential tester.
    fn account(&mut self, retired: Retirement, print_step: bool) {
        if let Some(outcome) = classify(retired.instr, retired.pred_pc, retired.next_pc) {
            self.stats.record(outcome);
        }
        if print_step {
            info!("{:#010x}: {:08x}", retired.pc, retired.instr);
        }
        if let Some(tracer) = self.tracer.as_mut() {
            tracer.trace(retired.pc, retired.instr);
        }
        if let Some(difftest) = self.difftest.as_mut()
            && let Err(e) = difftest.step(retired.pc, retired.next_pc)
        {
            error!("{e}");
            let _ = self.transition(RunEvent::Abort { pc: retired.pc });
        }
    }

    fn transition(&mut self, event: RunEvent) -> Transition {
        let transition = self.control.apply(event);
        if transition.emits_final_report()
            && let Transition::Entered(state) = transition
        {
            self.terminal_entry = Some(state);
        }
        transition
    }

    fn on_terminal(&mut self, state: RunState) -> Result<(), SimError> {
        let pc = self.control.halt_pc();
        match state {
            RunState::Aborted => {
                error!("SIM: ABORT at pc = {:#010x}", pc);
                if let Some(tracer) = self.tracer.as_ref() {
                    tracer.dump();
                }
            }
            RunState::Ended if self.control.halt_ret() == 0 => {
                info!("SIM: HIT GOOD TRAP at pc = {:#010x}", pc);
            }
            RunState::Ended => {
                error!(
                    "SIM: HIT BAD TRAP at pc = {:#010x} (code {})",
                    pc,
                    self.control.halt_ret()
                );
            }
            RunState::Quit => {
                info!("SIM: QUIT at pc = {:#010x} (instruction limit)", pc);
            }
            RunState::Running | RunState::Stopped => return Ok(()),
        }
        if matches!(state, RunState::Ended | RunState::Aborted) {
            info!("processor ran {} clock cycles", self.clock.cycles());
        }
        self.statistic()
    }

    /// Closes the waveform and logs host time, throughput, and prediction statistics.
    pub fn statistic(&mut self) -> Result<(), SimError> {
        self.clock.close_waveform()?;
        info!("host time spent = {} us", self.host_time.as_micros());
        info!("total guest instructions = {}", self.retired);
        match self.frequency() {
            Some(freq) => info!("simulation frequency = {} inst/s", freq),
            None => info!(
                "Finish running in less than 1 us and can not calculate the simulation frequency"
            ),
        }
        info!("commit poll timeouts = {}", self.poller.timeouts());
        for line in self.stats.to_string().lines() {
            info!("{line}");
        }
        Ok(())
    }

    /// Retired instructions per host second, or `None` under one microsecond.
    pub fn frequency(&self) -> Option<u64> {
        let us = self.host_time.as_micros();
        if us == 0 {
            None
        } else {
            Some((u128::from(self.retired) * 1_000_000 / us) as u64)
        }
    }

    /// Current run state.
    pub const fn state(&self) -> RunState {
        self.control.state()
    }

    /// Run-control machine, including the recorded halt PC and return code.
    pub const fn control(&self) -> &RunControl {
        &self.control
    }

    /// Prediction statistics.
    pub const fn stats(&self) -> &PredictionStats {
        &self.stats
    }

    /// Instructions retired across all run requests.
    pub const fn retired(&self) -> u64 {
        self.retired
    }

    /// Clock cycles issued, reset included.
    pub const fn cycles(&self) -> u64 {
        self.clock.cycles()
    }

    /// Commit polls that ran out of cycles.
    pub const fn commit_timeouts(&self) -> u64 {
        self.poller.timeouts()
    }

    /// Host time accumulated inside run requests.
    pub const fn host_time(&self) -> Duration {
        self.host_time
    }

    /// Architectural mirror of the design.
    pub const fn arch(&self) -> &ArchState {
        self.clock.arch()
    }

    /// The simulated design.
    pub const fn design(&self) -> &D {
        self.clock.design()
    }

    /// Effective configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Serializable snapshot of every counter.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            state: self.control.state(),
            halt_pc: self.control.halt_pc(),
            halt_ret: self.control.halt_ret(),
            retired: self.retired,
            cycles: self.clock.cycles(),
            commit_timeouts: self.poller.timeouts(),
            host_us: u64::try_from(self.host_time.as_micros()).unwrap_or(u64::MAX),
            prediction: self.stats.clone(),
        }
    }
}
