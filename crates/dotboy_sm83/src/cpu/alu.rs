//! Pure arithmetic and flag computation for the SM83 ALU.
//!
//! Every function takes its operands and incoming carry explicitly and
//! returns the result together with the complete flag set it produces.
//! Operations that leave a flag untouched on hardware receive the current
//! flags and copy the untouched bits through.

use super::Flags;

/// Carry out of bit `bit` when adding `a + b + carry_in`.
#[inline]
pub fn carry_from_bit(bit: u32, a: u32, b: u32, carry_in: u32) -> bool {
    let mask = (1u32 << (bit + 1)) - 1;
    (a & mask) + (b & mask) + carry_in > mask
}

/// Borrow into bit `bit` when subtracting `a - b - borrow_in`.
#[inline]
pub fn borrow_from_bit(bit: u32, a: u32, b: u32, borrow_in: u32) -> bool {
    let mask = (1u32 << bit) - 1;
    (a & mask) < (b & mask) + borrow_in
}

/// Carry for `r + n` where `n` is a sign-extended 8-bit offset.
#[inline]
fn signed_carry(bit: u32, r: u16, n: u16) -> bool {
    let mask = 1u16 << bit;
    ((r ^ n ^ r.wrapping_add(n)) & mask) == mask
}

/// The eight accumulator operations of the 0x80–0xBF block and their
/// immediate counterparts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            7 => AluOp::Cp,
            _ => panic!("ALU operation selector out of range"),
        }
    }

    /// Apply the operation to `a` and `value`.
    ///
    /// `carry` is the current carry flag; only ADC and SBC consume it.
    /// For CP the returned value is `a` unchanged.
    pub fn apply(self, a: u8, value: u8, carry: bool) -> (u8, Flags) {
        match self {
            AluOp::Add => add8(a, value, false),
            AluOp::Adc => add8(a, value, carry),
            AluOp::Sub => sub8(a, value, false),
            AluOp::Sbc => sub8(a, value, carry),
            AluOp::And => {
                let result = a & value;
                (result, Flags::from_conditions(result == 0, false, true, false))
            }
            AluOp::Xor => {
                let result = a ^ value;
                (result, Flags::from_conditions(result == 0, false, false, false))
            }
            AluOp::Or => {
                let result = a | value;
                (result, Flags::from_conditions(result == 0, false, false, false))
            }
            AluOp::Cp => {
                let (_, flags) = sub8(a, value, false);
                (a, flags)
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AluOp::Add => "ADD A,",
            AluOp::Adc => "ADC A,",
            AluOp::Sub => "SUB ",
            AluOp::Sbc => "SBC A,",
            AluOp::And => "AND ",
            AluOp::Xor => "XOR ",
            AluOp::Or => "OR ",
            AluOp::Cp => "CP ",
        }
    }
}

/// 8-bit ADD/ADC.
pub fn add8(a: u8, value: u8, carry_in: bool) -> (u8, Flags) {
    let c = carry_in as u32;
    let result = a.wrapping_add(value).wrapping_add(c as u8);
    let flags = Flags::from_conditions(
        result == 0,
        false,
        carry_from_bit(3, a as u32, value as u32, c),
        carry_from_bit(7, a as u32, value as u32, c),
    );
    (result, flags)
}

/// 8-bit SUB/SBC.
pub fn sub8(a: u8, value: u8, borrow_in: bool) -> (u8, Flags) {
    let b = borrow_in as u32;
    let result = a.wrapping_sub(value).wrapping_sub(b as u8);
    let flags = Flags::from_conditions(
        result == 0,
        true,
        borrow_from_bit(4, a as u32, value as u32, b),
        borrow_from_bit(8, a as u32, value as u32, b),
    );
    (result, flags)
}

/// INC r / INC (HL). Carry is carried over from `flags`.
pub fn inc8(value: u8, flags: Flags) -> (u8, Flags) {
    let result = value.wrapping_add(1);
    let flags = Flags::from_conditions(
        result == 0,
        false,
        carry_from_bit(3, value as u32, 1, 0),
        flags.contains(Flags::CARRY),
    );
    (result, flags)
}

/// DEC r / DEC (HL). Carry is carried over from `flags`.
pub fn dec8(value: u8, flags: Flags) -> (u8, Flags) {
    let result = value.wrapping_sub(1);
    let flags = Flags::from_conditions(
        result == 0,
        true,
        borrow_from_bit(4, value as u32, 1, 0),
        flags.contains(Flags::CARRY),
    );
    (result, flags)
}

/// ADD HL,rr. Zero is carried over from `flags`.
pub fn add16(hl: u16, value: u16, flags: Flags) -> (u16, Flags) {
    let result = hl.wrapping_add(value);
    let flags = Flags::from_conditions(
        flags.contains(Flags::ZERO),
        false,
        carry_from_bit(11, hl as u32, value as u32, 0),
        carry_from_bit(15, hl as u32, value as u32, 0),
    );
    (result, flags)
}

/// ADD SP,r8 and LD HL,SP+r8: add a signed offset to a 16-bit base.
///
/// Half-carry and carry come from bits 4 and 8; Zero and Negative are
/// always cleared.
pub fn add16_signed(base: u16, offset: u8) -> (u16, Flags) {
    let n = offset as i8 as i16 as u16;
    let flags = Flags::from_conditions(
        false,
        false,
        signed_carry(4, base, n),
        signed_carry(8, base, n),
    );
    (base.wrapping_add(n), flags)
}

/// Decimal adjust A after a BCD addition or subtraction.
///
/// Negative is carried over; half-carry is always cleared.
pub fn daa(a: u8, flags: Flags) -> (u8, Flags) {
    let negative = flags.contains(Flags::NEGATIVE);
    let half_carry = flags.contains(Flags::HALF_CARRY);
    let carry = flags.contains(Flags::CARRY);

    let mut correction: u8 = if carry { 0x60 } else { 0x00 };
    if half_carry || (!negative && (a & 0x0F) > 0x09) {
        correction |= 0x06;
    }
    if carry || (!negative && a > 0x99) {
        correction |= 0x60;
    }

    let result = if negative {
        a.wrapping_sub(correction)
    } else {
        a.wrapping_add(correction)
    };

    let flags = Flags::from_conditions(result == 0, negative, false, correction & 0x60 != 0);
    (result, flags)
}

/// CPL: complement A. Zero and Carry are carried over.
pub fn cpl(a: u8, flags: Flags) -> (u8, Flags) {
    let mut flags = flags;
    flags.insert(Flags::NEGATIVE | Flags::HALF_CARRY);
    (!a, flags)
}

/// SCF / CCF. Zero is carried over.
pub fn set_carry(flags: Flags, complement: bool) -> Flags {
    let carry = if complement {
        !flags.contains(Flags::CARRY)
    } else {
        true
    };
    Flags::from_conditions(flags.contains(Flags::ZERO), false, false, carry)
}

/// Rotate/shift family of the extended table (CB 00–3F).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            7 => ShiftOp::Srl,
            _ => panic!("shift operation selector out of range"),
        }
    }

    /// Apply the rotate/shift to `value`.
    ///
    /// `carry_in` is the current carry flag (used by RL and RR). The carry
    /// out is the bit shifted out: bit 7 for left shifts, bit 0 for right
    /// shifts. SWAP always clears carry.
    pub fn apply(self, value: u8, carry_in: bool) -> (u8, Flags) {
        let (result, carry) = match self {
            ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            ShiftOp::Rl => ((value << 1) | carry_in as u8, value & 0x80 != 0),
            ShiftOp::Rr => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
            ShiftOp::Sla => (value << 1, value & 0x80 != 0),
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            ShiftOp::Swap => (value.rotate_left(4), false),
            ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
        };
        (result, Flags::from_conditions(result == 0, false, false, carry))
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShiftOp::Rlc => "RLC",
            ShiftOp::Rrc => "RRC",
            ShiftOp::Rl => "RL",
            ShiftOp::Rr => "RR",
            ShiftOp::Sla => "SLA",
            ShiftOp::Sra => "SRA",
            ShiftOp::Swap => "SWAP",
            ShiftOp::Srl => "SRL",
        }
    }
}

/// RLCA/RRCA/RLA/RRA: the accumulator rotates always clear Zero.
pub fn rotate_a(op: ShiftOp, a: u8, carry_in: bool) -> (u8, Flags) {
    let (result, mut flags) = op.apply(a, carry_in);
    flags.remove(Flags::ZERO);
    (result, flags)
}

/// BIT b,r. Carry is carried over.
pub fn bit(bit: u8, value: u8, flags: Flags) -> Flags {
    let set = value & (1 << bit) != 0;
    Flags::from_conditions(!set, false, true, flags.contains(Flags::CARRY))
}
