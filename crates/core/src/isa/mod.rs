//! Instruction Set Architecture helpers.
//!
//! Only as much of RV32I as the commit accounting needs: the major opcodes of
//! control-flow instructions, the B-type immediate decoder, and the classifier
//! that turns a committed encoding into a prediction outcome.

/// Control-flow classification of committed instructions.
pub mod classify;
/// Immediate field decoding.
pub mod decode;
/// Major opcodes (bits 6-0).
pub mod opcodes;

pub use classify::{BranchDirection, Classification, ControlFlow, classify};
