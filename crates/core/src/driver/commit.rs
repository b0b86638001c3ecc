//! Commit Poller.
//!
//! Steps the clock until the design raises its commit pulse, but never more than a
//! fixed number of cycles. An instruction can legitimately take several cycles to
//! retire (stalls, multi-cycle units); the ceiling only keeps a deadlocked design
//! from hanging the driver. Running out of cycles is not an error: the caller gets
//! whatever the commit port shows, flagged with `committed == false`, and the poller
//! counts the event.

use crate::common::SimError;
use crate::design::Design;
use crate::driver::ClockDriver;

/// Commit-port values sampled for one retirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retirement {
    /// PC of the retired instruction.
    pub pc: u32,
    /// Next PC resolved at commit.
    pub next_pc: u32,
    /// Next PC the predictor chose.
    pub pred_pc: u32,
    /// Instruction encoding.
    pub instr: u32,
}

impl Retirement {
    /// Samples the commit port of `design`.
    #[inline]
    pub fn sample<D: Design + ?Sized>(design: &D) -> Self {
        Self {
            pc: design.commit_pc(),
            next_pc: design.commit_next_pc(),
            pred_pc: design.commit_pred_pc(),
            instr: design.instr(),
        }
    }
}

/// Outcome of one bounded commit poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitPoll {
    /// Commit-port values at the end of the poll.
    pub retirement: Retirement,
    /// Cycles stepped while waiting (the trailing advance cycle excluded).
    pub waited: u32,
    /// `false` when the ceiling ran out, or the design halted, before a commit was seen.
    pub committed: bool,
}

/// Bounded commit poller.
#[derive(Debug, Clone)]
pub struct CommitPoller {
    timeout: u32,
    timeouts: u64,
}

impl CommitPoller {
    /// Creates a poller that gives up after `timeout` cycles.
    pub const fn new(timeout: u32) -> Self {
        Self {
            timeout,
            timeouts: 0,
        }
    }

    /// Polls that ran out of cycles without seeing a commit.
    pub const fn timeouts(&self) -> u64 {
        self.timeouts
    }

    /// Waits for the next retirement.
    ///
    /// Steps until `commit` is high, the design raises its halt output, or the ceiling
    /// is reached; samples the commit port; then steps once more so the design moves
    /// past the retiring instruction. A halted design never commits, so a poll cut short
    /// by a halt is not counted as a timeout.
    pub fn await_commit<D: Design>(
        &mut self,
        clock: &mut ClockDriver<D>,
    ) -> Result<CommitPoll, SimError> {
        let mut waited = 0;
        let mut committed = clock.design().commit();
        while !committed && waited < self.timeout && clock.design().halt().is_none() {
            clock.step()?;
            waited += 1;
            committed = clock.design().commit();
        }

        if !committed && clock.design().halt().is_none() {
            self.timeouts += 1;
            tracing::debug!(
                cycles = waited,
                pc = format!("{:#010x}", clock.arch().pc),
                "no commit within poll ceiling"
            );
        }

        let retirement = Retirement::sample(clock.design());
        clock.step()?;
        clock.refresh();

        Ok(CommitPoll {
            retirement,
            waited,
            committed,
        })
    }
}
