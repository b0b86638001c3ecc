//! Control-flow classification of committed instructions.
//!
//! Maps a committed encoding plus its predicted and resolved next PCs to a
//! [`Classification`]. The classifier is pure: it never touches counters, it only
//! says what kind of control transfer retired and whether the design's
//! next-PC prediction for it was right. [`PredictionStats`](crate::stats::PredictionStats)
//! decides which buckets that outcome feeds.

use crate::common::OPCODE_MASK;
use crate::isa::decode::b_imm;
use crate::isa::opcodes::{OP_BRANCH, OP_JAL, OP_JALR};

/// Direction of a conditional branch, derived from the sign of its displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchDirection {
    /// Non-negative displacement: usually an `if` skipping ahead.
    Forward,
    /// Negative displacement: usually a loop back-edge.
    Backward,
}

impl BranchDirection {
    /// Direction implied by a decoded branch displacement.
    #[inline]
    pub const fn from_offset(offset: i32) -> Self {
        if offset < 0 {
            Self::Backward
        } else {
            Self::Forward
        }
    }
}

/// Kind of control-flow instruction that retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlFlow {
    /// Conditional branch (opcode `0x63`) with its decoded displacement.
    Branch {
        /// Signed byte offset from the branch PC.
        offset: i32,
    },
    /// Direct unconditional jump, `JAL` (opcode `0x6f`).
    Jump,
    /// Indirect jump or return, `JALR` (opcode `0x67`).
    IndirectJump,
}

impl ControlFlow {
    /// Decodes the control-flow kind of an encoding, or `None` for any other instruction.
    pub const fn decode(inst: u32) -> Option<Self> {
        match inst & OPCODE_MASK {
            OP_BRANCH => Some(Self::Branch {
                offset: b_imm(inst),
            }),
            OP_JAL => Some(Self::Jump),
            OP_JALR => Some(Self::IndirectJump),
            _ => None,
        }
    }

    /// Branch direction for conditional branches; `None` for jumps.
    pub const fn direction(self) -> Option<BranchDirection> {
        match self {
            Self::Branch { offset } => Some(BranchDirection::from_offset(offset)),
            Self::Jump | Self::IndirectJump => None,
        }
    }
}

/// Prediction outcome of one retired control-flow instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// What kind of control transfer retired.
    pub kind: ControlFlow,
    /// Whether the predicted next PC matched the resolved one.
    pub correct: bool,
}

/// Classifies a committed instruction for prediction accounting.
///
/// Returns `None` when the encoding is not a branch, `JAL`, or `JALR`. Otherwise the
/// prediction counts as correct iff `predicted_next == actual_next`.
///
/// # Arguments
///
/// * `inst` - Raw 32-bit encoding of the committed instruction.
/// * `predicted_next` - Next PC the design's predictor fetched.
/// * `actual_next` - Next PC resolved at commit.
pub const fn classify(inst: u32, predicted_next: u32, actual_next: u32) -> Option<Classification> {
    match ControlFlow::decode(inst) {
        Some(kind) => Some(Classification {
            kind,
            correct: predicted_next == actual_next,
        }),
        None => None,
    }
}
