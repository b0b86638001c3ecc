//! # Constants and Error Tests
//!
//! Fixed addresses and limits, and the user-facing text of each error.

use std::error::Error as _;

use npcsim_core::SimError;
use npcsim_core::common::constants::{MAX_INST_TO_PRINT, NUM_GPRS};
use npcsim_core::common::{BOOT_PC, COMMIT_TIMEOUT_CYCLES, OPCODE_MASK};

#[test]
fn test_constants() {
    assert_eq!(BOOT_PC, 0x8000_0000, "Reset vector");
    assert_eq!(COMMIT_TIMEOUT_CYCLES, 20, "Commit poll ceiling");
    assert_eq!(OPCODE_MASK, 0x7F, "Opcode mask should be 7 bits");
    assert_eq!(NUM_GPRS, 32);
    assert_eq!(MAX_INST_TO_PRINT, 100);
}

#[test]
fn test_program_ended_display() {
    assert_eq!(
        SimError::ProgramEnded.to_string(),
        "Program execution has ended. To restart the program, exit and run again."
    );
}

#[test]
fn test_diff_mismatch_display() {
    let err = SimError::DiffMismatch {
        pc: 0x8000_0010,
        expected: 0x8000_0014,
        actual: 0x8000_0100,
    };
    assert_eq!(
        err.to_string(),
        "difftest mismatch at pc 0x80000010: reference next pc 0x80000014, design next pc 0x80000100"
    );
}

#[test]
fn test_replay_parse_keeps_source() {
    let source = serde_json::from_str::<u32>("x").unwrap_err();
    let err = SimError::ReplayParse { line: 7, source };
    assert!(err.source().is_some());
    assert!(err.to_string().starts_with("commit log line 7:"));
}

#[test]
fn test_io_error_is_transparent() {
    let err = SimError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "trace.jsonl"));
    assert_eq!(err.to_string(), "trace.jsonl");
}
