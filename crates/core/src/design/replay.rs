//! Commit-log replay design.
//!
//! Replays a recorded commit stream through the [`Design`] port list with cycle
//! timing, so predictor traces captured from an RTL run can be re-scored offline.
//!
//! The log is JSON lines, one retirement per line; blank lines and lines starting with
//! `#` are ignored:
//!
//! ```text
//! {"pc": 2147483648, "instr": 4261416163, "next_pc": 2147483640, "pred_pc": 2147483640, "latency": 3}
//! {"pc": 2147483640, "instr": 1048691, "next_pc": 2147483644, "pred_pc": 2147483644, "halt": 0}
//! ```
//!
//! Reset puts the first record's PC on the fetch port. A record commits `latency`
//! rising edges (default 1) after the previous commit pulse has cleared. A record with
//! `halt` raises [`Halt::End`] when it commits. Once the last record has retired the
//! fetch PC stays put; clocking the design again with nothing left to commit raises
//! [`Halt::Abort`].
//!
//! Writeback registers must name `x0`-`x31`; anything else is rejected at load time.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use super::{Design, Halt};
use crate::common::SimError;
use crate::common::constants::NUM_GPRS;

/// One recorded retirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CommitRecord {
    /// Committed PC.
    pub pc: u32,
    /// Instruction encoding.
    pub instr: u32,
    /// Resolved next PC.
    pub next_pc: u32,
    /// Predicted next PC.
    pub pred_pc: u32,
    /// Cycles from the previous commit to this one.
    #[serde(default = "CommitRecord::default_latency")]
    pub latency: u32,
    /// Register writeback `[rd, value]`, if any.
    #[serde(default)]
    pub wb: Option<(u8, u32)>,
    /// Return code when this record is the halting instruction.
    #[serde(default)]
    pub halt: Option<u32>,
}

impl CommitRecord {
    const fn default_latency() -> u32 {
        1
    }

    /// Rejects a writeback to a register outside the integer file.
    fn check(&self, line: usize) -> Result<(), SimError> {
        match self.wb {
            Some((rd, _)) if usize::from(rd) >= NUM_GPRS => {
                Err(SimError::WritebackRegister { line, rd })
            }
            _ => Ok(()),
        }
    }
}

/// Design that replays a commit log.
#[derive(Debug, Clone)]
pub struct ReplayDesign {
    records: Vec<CommitRecord>,
    cursor: usize,
    elapsed: u32,
    clk: bool,
    prev_clk: bool,
    rst: bool,
    commit: bool,
    pc: u32,
    regs: [u32; NUM_GPRS],
    halt: Option<Halt>,
}

impl ReplayDesign {
    /// Builds a replay design over `records`.
    ///
    /// Records are numbered from 1 in errors.
    pub fn new(records: Vec<CommitRecord>) -> Result<Self, SimError> {
        if records.is_empty() {
            return Err(SimError::EmptyReplay);
        }
        for (idx, record) in records.iter().enumerate() {
            record.check(idx + 1)?;
        }
        Ok(Self {
            records,
            cursor: 0,
            elapsed: 0,
            clk: false,
            prev_clk: false,
            rst: false,
            commit: false,
            pc: 0,
            regs: [0; NUM_GPRS],
            halt: None,
        })
    }

    /// Parses a JSON-lines commit log.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, SimError> {
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let record: CommitRecord =
                serde_json::from_str(line).map_err(|source| SimError::ReplayParse {
                    line: idx + 1,
                    source,
                })?;
            record.check(idx + 1)?;
            records.push(record);
        }
        Self::new(records)
    }

    /// Opens and parses a commit log file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Number of records in the log.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; empty logs are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn current(&self) -> Option<&CommitRecord> {
        if self.commit {
            self.records.get(self.cursor)
        } else {
            None
        }
    }

    fn rising_edge(&mut self) {
        if self.rst {
            self.cursor = 0;
            self.elapsed = 0;
            self.commit = false;
            self.regs = [0; NUM_GPRS];
            self.halt = None;
            self.pc = self.records[0].pc;
            return;
        }
        if self.halt.is_some() {
            self.commit = false;
            return;
        }
        if self.commit {
            self.commit = false;
            self.cursor += 1;
            self.elapsed = 0;
            if let Some(next) = self.records.get(self.cursor) {
                self.pc = next.pc;
            }
            return;
        }

        let Some(&record) = self.records.get(self.cursor) else {
            self.halt = Some(Halt::Abort);
            return;
        };
        self.elapsed += 1;
        if self.elapsed >= record.latency.max(1) {
            self.commit = true;
            if let Some((rd, value)) = record.wb
                && rd != 0
            {
                self.regs[usize::from(rd)] = value;
            }
            if let Some(code) = record.halt {
                self.halt = Some(Halt::End { code });
            }
        }
    }
}

impl Design for ReplayDesign {
    fn set_clock(&mut self, high: bool) {
        self.clk = high;
    }

    fn set_reset(&mut self, asserted: bool) {
        self.rst = asserted;
    }

    fn eval(&mut self) {
        if self.clk && !self.prev_clk {
            self.rising_edge();
        }
        self.prev_clk = self.clk;
    }

    fn pc(&self) -> u32 {
        self.pc
    }

    fn commit(&self) -> bool {
        self.commit
    }

    fn commit_pc(&self) -> u32 {
        self.current().map_or(0, |r| r.pc)
    }

    fn commit_next_pc(&self) -> u32 {
        self.current().map_or(0, |r| r.next_pc)
    }

    fn commit_pred_pc(&self) -> u32 {
        self.current().map_or(0, |r| r.pred_pc)
    }

    fn instr(&self) -> u32 {
        self.current().map_or(0, |r| r.instr)
    }

    fn gprs(&self) -> [u32; NUM_GPRS] {
        self.regs
    }

    fn halt(&self) -> Option<Halt> {
        self.halt
    }
}
