//! Run-control state machine.
//!
//! All run-state changes go through [`RunControl::apply`]. The returned
//! [`Transition`] tells the caller whether the request was rejected, ignored, or
//! moved the machine, and whether the new state owes a final statistics report.
//!
//! | from      | event             | to        |
//! |-----------|-------------------|-----------|
//! | `Ended`/`Aborted` | `Start`   | rejected  |
//! | any other | `Start`           | `Running` |
//! | `Running` | `Halt`            | `Ended`   |
//! | `Running` | `Abort`           | `Aborted` |
//! | `Running` | `LimitReached`    | `Quit`    |
//! | `Running` | `BudgetExhausted` | `Stopped` |
//!
//! `Ended`, `Aborted`, and `Quit` owe the final report on entry. `Quit` still accepts
//! `Start`.

use serde::Serialize;

/// Execution state of the simulated program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RunState {
    /// A run request is executing.
    Running,
    /// Idle; the next run request resumes where the last one stopped.
    #[default]
    Stopped,
    /// The program finished through the design's halt output.
    Ended,
    /// The program or the harness hit a fatal condition.
    Aborted,
    /// A batch run stopped at its instruction limit.
    Quit,
}

impl RunState {
    /// States whose entry produces the final statistics report.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Aborted | Self::Quit)
    }

    /// Whether a new run request may start from this state.
    pub const fn accepts_run(self) -> bool {
        !matches!(self, Self::Ended | Self::Aborted)
    }
}

/// Inputs to the run-control state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// A run request arrived.
    Start,
    /// The design signalled program completion at `pc` with return code `code`.
    Halt {
        /// PC of the halting instruction.
        pc: u32,
        /// Program return code.
        code: u32,
    },
    /// The design or a checker signalled a fatal condition at `pc`.
    Abort {
        /// PC of the instruction being retired.
        pc: u32,
    },
    /// Quit-on-limit fired on the last instruction of the budget, retired at `pc`.
    LimitReached {
        /// PC of the last retired instruction.
        pc: u32,
    },
    /// The loop ran out of budget.
    BudgetExhausted,
}

/// Result of applying a [`RunEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The event was refused; nothing changed.
    Rejected,
    /// The event does not apply in the current state; nothing changed.
    Ignored,
    /// The machine entered the given state.
    Entered(RunState),
}

impl Transition {
    /// `true` when this transition entered a state that owes the final report.
    pub const fn emits_final_report(self) -> bool {
        match self {
            Self::Entered(state) => state.is_terminal(),
            Self::Rejected | Self::Ignored => false,
        }
    }
}

/// Run state plus the halt PC and return code recorded on entry to a halted state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunControl {
    state: RunState,
    halt_pc: u32,
    halt_ret: u32,
}

impl RunControl {
    /// A fresh machine in `Stopped`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event.
    pub const fn apply(&mut self, event: RunEvent) -> Transition {
        match (self.state, event) {
            (state, RunEvent::Start) if !state.accepts_run() => Transition::Rejected,
            (_, RunEvent::Start) => self.enter(RunState::Running),
            (RunState::Running, RunEvent::Halt { pc, code }) => {
                self.halt_pc = pc;
                self.halt_ret = code;
                self.enter(RunState::Ended)
            }
            (RunState::Running, RunEvent::Abort { pc }) => {
                self.halt_pc = pc;
                self.enter(RunState::Aborted)
            }
            (RunState::Running, RunEvent::LimitReached { pc }) => {
                self.halt_pc = pc;
                self.halt_ret = 0;
                self.enter(RunState::Quit)
            }
            (RunState::Running, RunEvent::BudgetExhausted) => self.enter(RunState::Stopped),
            _ => Transition::Ignored,
        }
    }

    const fn enter(&mut self, state: RunState) -> Transition {
        self.state = state;
        Transition::Entered(state)
    }

    /// Current state.
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// PC recorded when the machine last halted, aborted, or quit.
    pub const fn halt_pc(&self) -> u32 {
        self.halt_pc
    }

    /// Return code recorded when the program ended.
    pub const fn halt_ret(&self) -> u32 {
        self.halt_ret
    }
}
