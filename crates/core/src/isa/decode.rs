//! B-Type Immediate Decoder.
//!
//! B-Type format: `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`
//!
//! The immediate is a signed 13-bit byte offset with bit 0 always zero.

/// Bit shift for extracting B-Type immediate bit 11 (bit 7 of instruction).
const B_IMM_11_SHIFT: u32 = 7;

/// Bit mask for B-Type immediate bit 11.
const B_IMM_11_MASK: u32 = 1;

/// Bit shift for extracting B-Type immediate bits 4-1 (bits 8-11 of instruction).
const B_IMM_4_1_SHIFT: u32 = 8;

/// Bit mask for B-Type immediate bits 4-1 (4 bits).
const B_IMM_4_1_MASK: u32 = 0xF;

/// Bit shift for extracting B-Type immediate bits 10-5 (bits 25-30 of instruction).
const B_IMM_10_5_SHIFT: u32 = 25;

/// Bit mask for B-Type immediate bits 10-5 (6 bits).
const B_IMM_10_5_MASK: u32 = 0x3F;

/// Bit shift for extracting B-Type immediate bit 12 (bit 31 of instruction).
const B_IMM_12_SHIFT: u32 = 31;

/// Bit mask for B-Type immediate bit 12 (sign bit).
const B_IMM_12_MASK: u32 = 1;

/// Total number of bits in B-Type immediate (13 bits, sign-extended).
const B_IMM_BITS: u32 = 13;

/// Bit position of immediate bit 12 in the assembled offset.
const B_IMM_12_POS: u32 = 12;

/// Bit position of immediate bit 11 in the assembled offset.
const B_IMM_11_POS: u32 = 11;

/// Bit position of immediate bits 10-5 in the assembled offset.
const B_IMM_10_5_POS: u32 = 5;

/// Bit position of immediate bits 4-1 in the assembled offset (bit 0 is always zero).
const B_IMM_4_1_POS: u32 = 1;

/// Sign-extends the low `bits` bits of `value` to a full `i32`.
#[inline]
const fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

/// Decodes the signed branch displacement of a B-type instruction.
///
/// The opcode is not checked; callers classify first.
///
/// # Examples
///
/// ```
/// use npcsim_core::isa::decode::b_imm;
///
/// // beq x0, x0, -8
/// assert_eq!(b_imm(0xFE00_0CE3), -8);
/// // bne x1, x2, +16
/// assert_eq!(b_imm(0x0020_9863), 16);
/// ```
#[inline]
pub const fn b_imm(inst: u32) -> i32 {
    let imm = ((inst >> B_IMM_12_SHIFT) & B_IMM_12_MASK) << B_IMM_12_POS
        | ((inst >> B_IMM_10_5_SHIFT) & B_IMM_10_5_MASK) << B_IMM_10_5_POS
        | ((inst >> B_IMM_4_1_SHIFT) & B_IMM_4_1_MASK) << B_IMM_4_1_POS
        | ((inst >> B_IMM_11_SHIFT) & B_IMM_11_MASK) << B_IMM_11_POS;
    sign_extend(imm, B_IMM_BITS)
}
