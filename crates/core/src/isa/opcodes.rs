//! RISC-V Base Integer (I) Control-Flow Opcodes.
//!
//! Defines the major opcodes (bits 6-0) the commit accounting distinguishes.

/// Conditional Branch instructions (BEQ, BNE, BLT, BGE, BLTU, BGEU).
pub const OP_BRANCH: u32 = 0b1100011;

/// Jump and Link Register (JALR), including `ret`.
pub const OP_JALR: u32 = 0b1100111;

/// Jump and Link (JAL).
pub const OP_JAL: u32 = 0b1101111;
