//! Next-PC prediction statistics.
//!
//! This module scores the design's next-PC predictor on every retired control-flow
//! instruction. It provides:
//! 1. **Buckets:** Overall control flow, conditional branches (split forward/backward),
//!    and indirect jumps/returns, each a [`Tally`] of total and correct predictions.
//! 2. **Window reports:** A periodic `[PCPRED]` line with cumulative and since-last-report
//!    figures, driven by a configurable retired-instruction interval.
//! 3. **Final report:** A human-readable block (the `Display` impl of [`PredictionStats`]).
//!
//! Direct jumps (`JAL`) only feed the overall bucket.

use std::fmt;

use serde::Serialize;

use crate::isa::{BranchDirection, Classification, ControlFlow};

/// A (total, correct) prediction counter pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Predictions scored.
    pub total: u64,
    /// Predictions whose next PC matched the resolved one.
    pub correct: u64,
}

impl Tally {
    /// Scores one prediction.
    #[inline]
    pub const fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Mispredictions, clamped at zero.
    #[inline]
    pub const fn wrong(&self) -> u64 {
        self.total.saturating_sub(self.correct)
    }

    /// Success rate in percent, or `None` when nothing was scored.
    pub fn rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.correct as f64 * 100.0 / self.total as f64)
        }
    }

    /// Counts accumulated since `earlier`, each field clamped at zero.
    #[inline]
    pub const fn since(&self, earlier: Self) -> Self {
        Self {
            total: self.total.saturating_sub(earlier.total),
            correct: self.correct.saturating_sub(earlier.correct),
        }
    }
}

/// Formats an optional percentage as `12.34%` or `N/A`.
#[derive(Debug, Clone, Copy)]
pub struct Rate(pub Option<f64>);

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(rate) => write!(f, "{rate:.2}%"),
            None => f.write_str("N/A"),
        }
    }
}

/// Cumulative figures captured at the last periodic report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowSnapshot {
    /// Retired instructions at the last report.
    pub instructions: u64,
    /// Overall control-flow tally at the last report.
    pub control_flow: Tally,
}

/// One periodic progress report.
///
/// Rendered as a single parse-friendly line:
///
/// ```text
/// [PCPRED] commit=50000 win_inst=50000 cf_total=812 cf_correct=790 cf_wrong=22 cf_rate=97.29% win_cf_total=812 win_cf_correct=790 win_cf_wrong=22 win_cf_rate=97.29%
/// ```
///
/// An empty window prints its rate as `0.00%` so the line always parses as numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    /// Total retired instructions so far.
    pub retired: u64,
    /// Retired instructions since the previous report.
    pub window_instructions: u64,
    /// Cumulative control-flow tally.
    pub cumulative: Tally,
    /// Control-flow tally since the previous report.
    pub window: Tally,
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[PCPRED] commit={} win_inst={} cf_total={} cf_correct={} cf_wrong={} cf_rate={:.2}% \
             win_cf_total={} win_cf_correct={} win_cf_wrong={} win_cf_rate={:.2}%",
            self.retired,
            self.window_instructions,
            self.cumulative.total,
            self.cumulative.correct,
            self.cumulative.wrong(),
            self.cumulative.rate().unwrap_or(0.0),
            self.window.total,
            self.window.correct,
            self.window.wrong(),
            self.window.rate().unwrap_or(0.0),
        )
    }
}

/// Prediction statistics owned by the simulator.
///
/// Counters only grow. Within every bucket `correct <= total`, and the forward and
/// backward buckets always sum to the conditional-branch bucket.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PredictionStats {
    control_flow: Tally,
    branch: Tally,
    branch_forward: Tally,
    branch_backward: Tally,
    indirect: Tally,
    #[serde(skip)]
    window: WindowSnapshot,
    #[serde(skip)]
    report_interval: u64,
}

impl PredictionStats {
    /// Creates empty statistics that report every `report_interval` retirements (0 disables).
    pub fn new(report_interval: u64) -> Self {
        Self {
            report_interval,
            ..Self::default()
        }
    }

    /// Changes the periodic report interval; 0 disables progress reports.
    pub const fn set_report_interval(&mut self, interval: u64) {
        self.report_interval = interval;
    }

    /// Scores one classified retirement into every bucket it belongs to.
    pub const fn record(&mut self, outcome: Classification) {
        self.control_flow.record(outcome.correct);
        match outcome.kind {
            ControlFlow::Branch { offset } => {
                self.branch.record(outcome.correct);
                match BranchDirection::from_offset(offset) {
                    BranchDirection::Forward => self.branch_forward.record(outcome.correct),
                    BranchDirection::Backward => self.branch_backward.record(outcome.correct),
                }
            }
            ControlFlow::IndirectJump => self.indirect.record(outcome.correct),
            ControlFlow::Jump => {}
        }
    }

    /// Produces a progress report if `retired` is a positive multiple of the interval.
    ///
    /// On a report the window snapshot moves to the current cumulative figures;
    /// otherwise nothing changes.
    pub fn maybe_report(&mut self, retired: u64) -> Option<ProgressReport> {
        if self.report_interval == 0 || retired == 0 || retired % self.report_interval != 0 {
            return None;
        }

        let report = ProgressReport {
            retired,
            window_instructions: retired.saturating_sub(self.window.instructions),
            cumulative: self.control_flow,
            window: self.control_flow.since(self.window.control_flow),
        };
        self.window = WindowSnapshot {
            instructions: retired,
            control_flow: self.control_flow,
        };
        Some(report)
    }

    /// All control-flow instructions (branches, `JAL`, `JALR`).
    pub const fn control_flow(&self) -> Tally {
        self.control_flow
    }

    /// Conditional branches.
    pub const fn branch(&self) -> Tally {
        self.branch
    }

    /// Conditional branches with a non-negative displacement.
    pub const fn branch_forward(&self) -> Tally {
        self.branch_forward
    }

    /// Conditional branches with a negative displacement.
    pub const fn branch_backward(&self) -> Tally {
        self.branch_backward
    }

    /// Indirect jumps and returns (`JALR`).
    pub const fn indirect(&self) -> Tally {
        self.indirect
    }

    /// Snapshot taken at the last periodic report.
    pub const fn window(&self) -> WindowSnapshot {
        self.window
    }
}

impl fmt::Display for PredictionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bucket = |f: &mut fmt::Formatter<'_>, name: &str, t: Tally| {
            writeln!(
                f,
                "  {:<22} total={} correct={} wrong={} rate={}",
                name,
                t.total,
                t.correct,
                t.wrong(),
                Rate(t.rate())
            )
        };

        writeln!(f, "NEXT-PC PREDICTION")?;
        writeln!(f, "  cf.total               {}", self.control_flow.total)?;
        writeln!(f, "  cf.correct             {}", self.control_flow.correct)?;
        writeln!(f, "  cf.wrong               {}", self.control_flow.wrong())?;
        writeln!(f, "  cf.rate                {}", Rate(self.control_flow.rate()))?;
        bucket(f, "branch (0x63)", self.branch)?;
        bucket(f, "branch.forward", self.branch_forward)?;
        bucket(f, "branch.backward", self.branch_backward)?;
        bucket(f, "jalr (0x67)", self.indirect)
    }
}
