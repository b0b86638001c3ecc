//! Simulator error definitions.
//!
//! Every fallible operation in the crate reports a [`SimError`]. Only the boot
//! address check is fatal by design; the rest surface I/O, configuration, and
//! collaborator failures to the caller.

use thiserror::Error;

/// Errors raised by the simulator and its collaborators.
#[derive(Debug, Error)]
pub enum SimError {
    /// The design did not present the reset vector after the startup reset.
    ///
    /// Indicates that the simulator was built against the wrong design or
    /// configuration and cannot continue.
    #[error("after reset the design PC should be {expected:#010x}, found {actual:#010x}")]
    BootPcMismatch {
        /// Configured boot address.
        expected: u32,
        /// PC observed on the design after reset.
        actual: u32,
    },

    /// A run request was issued after the program ended or aborted.
    #[error("Program execution has ended. To restart the program, exit and run again.")]
    ProgramEnded,

    /// The differential tester disagreed with the design.
    #[error("difftest mismatch at pc {pc:#010x}: reference next pc {expected:#010x}, design next pc {actual:#010x}")]
    DiffMismatch {
        /// Committed PC of the offending instruction.
        pc: u32,
        /// Next PC according to the reference model.
        expected: u32,
        /// Next PC according to the design.
        actual: u32,
    },

    /// Reading or writing a trace, log, or configuration file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration document or statistics summary could not be (de)serialized.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A line of a commit log could not be parsed.
    #[error("commit log line {line}: {source}")]
    ReplayParse {
        /// 1-based line number in the log.
        line: usize,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A commit record writes back to a register outside `x0`-`x31`.
    #[error("commit log line {line}: writeback register x{rd} does not exist")]
    WritebackRegister {
        /// 1-based line number in the log (record number for in-memory logs).
        line: usize,
        /// Offending destination register.
        rd: u8,
    },

    /// The commit log holds no records.
    #[error("commit log contains no records")]
    EmptyReplay,
}
