//! Opcode tables for the primary and CB-prefixed instruction spaces.
//!
//! Both tables are built at compile time by decoding every opcode byte into
//! an operation descriptor. The dispatcher indexes them with the fetched
//! byte and executes the descriptor; nothing is decoded at run time.

use std::fmt;

use super::alu::{AluOp, ShiftOp};
use super::{Condition, Indirect, Pair, Reg8, StackPair};

/// Escape byte that selects the extended (CB) table.
pub const PREFIX_OPCODE: u8 = 0xCB;

/// Operation selected by a primary opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    /// LD r,r'
    Ld(Reg8, Reg8),
    /// LD r,d8
    LdImm(Reg8),
    /// LD rr,d16
    LdPairImm(Pair),
    /// LD (BC/DE/HL+/HL-),A
    StoreA(Indirect),
    /// LD A,(BC/DE/HL+/HL-)
    LoadA(Indirect),
    /// LD (a16),SP
    StoreSp,
    /// LDH (a8),A
    StoreHighA,
    /// LDH A,(a8)
    LoadHighA,
    /// LD (C),A
    StoreHighCA,
    /// LD A,(C)
    LoadHighCA,
    /// LD (a16),A
    StoreAbsA,
    /// LD A,(a16)
    LoadAbsA,
    LdSpHl,
    /// LD HL,SP+r8
    LdHlSpOffset,
    /// ADD SP,r8
    AddSpOffset,
    Inc(Reg8),
    Dec(Reg8),
    IncPair(Pair),
    DecPair(Pair),
    AddHl(Pair),
    Alu(AluOp, Reg8),
    AluImm(AluOp),
    /// RLCA/RRCA/RLA/RRA
    RotateA(ShiftOp),
    Daa,
    Cpl,
    Scf,
    Ccf,
    Jr(Option<Condition>),
    Jp(Option<Condition>),
    JpHl,
    Call(Option<Condition>),
    Ret(Option<Condition>),
    Reti,
    /// RST with the target vector (0x00, 0x08, .. 0x38).
    Rst(u8),
    Push(StackPair),
    Pop(StackPair),
    /// 0xCB: continue decoding through the extended table.
    Prefix,
    /// One of the eleven holes in the primary table.
    Undefined,
}

impl Op {
    /// Number of immediate bytes following the opcode.
    pub const fn operand_bytes(self) -> u8 {
        match self {
            Op::Stop
            | Op::LdImm(_)
            | Op::StoreHighA
            | Op::LoadHighA
            | Op::LdHlSpOffset
            | Op::AddSpOffset
            | Op::AluImm(_)
            | Op::Jr(_) => 1,
            Op::LdPairImm(_)
            | Op::StoreSp
            | Op::StoreAbsA
            | Op::LoadAbsA
            | Op::Jp(_)
            | Op::Call(_) => 2,
            _ => 0,
        }
    }

    /// Base cost in T-cycles. Conditional branches are charged their
    /// not-taken cost; undefined opcodes cost nothing.
    pub const fn base_cycles(self) -> u32 {
        match self {
            Op::Nop | Op::Stop | Op::Halt | Op::Di | Op::Ei => 4,
            Op::Ld(dst, src) => {
                if dst.is_memory() || src.is_memory() {
                    8
                } else {
                    4
                }
            }
            Op::LdImm(r) => {
                if r.is_memory() {
                    12
                } else {
                    8
                }
            }
            Op::LdPairImm(_) => 12,
            Op::StoreA(_) | Op::LoadA(_) => 8,
            Op::StoreSp => 20,
            Op::StoreHighA | Op::LoadHighA => 12,
            Op::StoreHighCA | Op::LoadHighCA => 8,
            Op::StoreAbsA | Op::LoadAbsA => 16,
            Op::LdSpHl => 8,
            Op::LdHlSpOffset => 12,
            Op::AddSpOffset => 16,
            Op::Inc(r) | Op::Dec(r) => {
                if r.is_memory() {
                    12
                } else {
                    4
                }
            }
            Op::IncPair(_) | Op::DecPair(_) | Op::AddHl(_) => 8,
            Op::Alu(_, r) => {
                if r.is_memory() {
                    8
                } else {
                    4
                }
            }
            Op::AluImm(_) => 8,
            Op::RotateA(_) | Op::Daa | Op::Cpl | Op::Scf | Op::Ccf => 4,
            Op::Jr(None) => 12,
            Op::Jr(Some(_)) => 8,
            Op::Jp(None) => 16,
            Op::Jp(Some(_)) => 12,
            Op::JpHl => 4,
            Op::Call(None) => 24,
            Op::Call(Some(_)) => 12,
            Op::Ret(None) => 16,
            Op::Ret(Some(_)) => 8,
            Op::Reti => 16,
            Op::Rst(_) => 16,
            Op::Push(_) => 16,
            Op::Pop(_) => 12,
            Op::Prefix => 4,
            Op::Undefined => 0,
        }
    }

    /// Cost in T-cycles when a conditional branch is taken.
    pub const fn taken_cycles(self) -> u32 {
        match self {
            Op::Jr(Some(_)) => 12,
            Op::Jp(Some(_)) => 16,
            Op::Call(Some(_)) => 24,
            Op::Ret(Some(_)) => 20,
            _ => self.base_cycles(),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn cond(c: &Option<Condition>) -> String {
            c.map(|c| format!("{},", c.name())).unwrap_or_default()
        }

        match self {
            Op::Nop => write!(f, "NOP"),
            Op::Stop => write!(f, "STOP"),
            Op::Halt => write!(f, "HALT"),
            Op::Di => write!(f, "DI"),
            Op::Ei => write!(f, "EI"),
            Op::Ld(dst, src) => write!(f, "LD {},{}", dst.name(), src.name()),
            Op::LdImm(r) => write!(f, "LD {},d8", r.name()),
            Op::LdPairImm(rr) => write!(f, "LD {},d16", rr.name()),
            Op::StoreA(ind) => write!(f, "LD {},A", ind.name()),
            Op::LoadA(ind) => write!(f, "LD A,{}", ind.name()),
            Op::StoreSp => write!(f, "LD (a16),SP"),
            Op::StoreHighA => write!(f, "LDH (a8),A"),
            Op::LoadHighA => write!(f, "LDH A,(a8)"),
            Op::StoreHighCA => write!(f, "LD (C),A"),
            Op::LoadHighCA => write!(f, "LD A,(C)"),
            Op::StoreAbsA => write!(f, "LD (a16),A"),
            Op::LoadAbsA => write!(f, "LD A,(a16)"),
            Op::LdSpHl => write!(f, "LD SP,HL"),
            Op::LdHlSpOffset => write!(f, "LD HL,SP+r8"),
            Op::AddSpOffset => write!(f, "ADD SP,r8"),
            Op::Inc(r) => write!(f, "INC {}", r.name()),
            Op::Dec(r) => write!(f, "DEC {}", r.name()),
            Op::IncPair(rr) => write!(f, "INC {}", rr.name()),
            Op::DecPair(rr) => write!(f, "DEC {}", rr.name()),
            Op::AddHl(rr) => write!(f, "ADD HL,{}", rr.name()),
            Op::Alu(op, r) => write!(f, "{}{}", op.name(), r.name()),
            Op::AluImm(op) => write!(f, "{}d8", op.name()),
            Op::RotateA(op) => write!(f, "{}A", op.name()),
            Op::Daa => write!(f, "DAA"),
            Op::Cpl => write!(f, "CPL"),
            Op::Scf => write!(f, "SCF"),
            Op::Ccf => write!(f, "CCF"),
            Op::Jr(c) => write!(f, "JR {}r8", cond(c)),
            Op::Jp(c) => write!(f, "JP {}a16", cond(c)),
            Op::JpHl => write!(f, "JP (HL)"),
            Op::Call(c) => write!(f, "CALL {}a16", cond(c)),
            Op::Ret(None) => write!(f, "RET"),
            Op::Ret(Some(c)) => write!(f, "RET {}", c.name()),
            Op::Reti => write!(f, "RETI"),
            Op::Rst(vector) => write!(f, "RST {vector:02X}H"),
            Op::Push(rr) => write!(f, "PUSH {}", rr.name()),
            Op::Pop(rr) => write!(f, "POP {}", rr.name()),
            Op::Prefix => write!(f, "PREFIX CB"),
            Op::Undefined => write!(f, "???"),
        }
    }
}

/// Operation selected by a CB-prefixed opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtOp {
    Shift(ShiftOp, Reg8),
    Bit(u8, Reg8),
    Res(u8, Reg8),
    Set(u8, Reg8),
}

impl ExtOp {
    /// Cost in T-cycles, including the prefix fetch.
    pub const fn cycles(self) -> u32 {
        match self {
            ExtOp::Bit(_, Reg8::HlIndirect) => 12,
            ExtOp::Shift(_, Reg8::HlIndirect)
            | ExtOp::Res(_, Reg8::HlIndirect)
            | ExtOp::Set(_, Reg8::HlIndirect) => 16,
            _ => 8,
        }
    }
}

impl fmt::Display for ExtOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtOp::Shift(op, r) => write!(f, "{} {}", op.name(), r.name()),
            ExtOp::Bit(b, r) => write!(f, "BIT {b},{}", r.name()),
            ExtOp::Res(b, r) => write!(f, "RES {b},{}", r.name()),
            ExtOp::Set(b, r) => write!(f, "SET {b},{}", r.name()),
        }
    }
}

/// Primary table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub op: Op,
    pub operand_bytes: u8,
    pub cycles: u32,
    pub taken_cycles: u32,
}

impl OpcodeInfo {
    const UNDEFINED: Self = Self::new(Op::Undefined);

    const fn new(op: Op) -> Self {
        Self {
            op,
            operand_bytes: op.operand_bytes(),
            cycles: op.base_cycles(),
            taken_cycles: op.taken_cycles(),
        }
    }
}

/// Extended (CB) table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtOpcodeInfo {
    pub op: ExtOp,
    pub cycles: u32,
}

impl ExtOpcodeInfo {
    const fn new(op: ExtOp) -> Self {
        Self {
            op,
            cycles: op.cycles(),
        }
    }
}

/// The 256 primary opcodes, indexed by opcode byte.
pub static PRIMARY_TABLE: [OpcodeInfo; 256] = build_primary_table();

/// The 256 CB-prefixed opcodes, indexed by the byte after 0xCB.
pub static EXTENDED_TABLE: [ExtOpcodeInfo; 256] = build_extended_table();

const fn build_primary_table() -> [OpcodeInfo; 256] {
    let mut table = [OpcodeInfo::UNDEFINED; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = OpcodeInfo::new(decode_primary(i as u8));
        i += 1;
    }
    table
}

const fn build_extended_table() -> [ExtOpcodeInfo; 256] {
    let mut table = [ExtOpcodeInfo::new(ExtOp::Shift(ShiftOp::Rlc, Reg8::B)); 256];
    let mut i = 0;
    while i < 256 {
        table[i] = ExtOpcodeInfo::new(decode_extended(i as u8));
        i += 1;
    }
    table
}

/// Decode a primary opcode from its x/y/z/p/q bit fields.
const fn decode_primary(opcode: u8) -> Op {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = y >> 1;
    let q = y & 0x01;

    match x {
        0 => match z {
            0 => match y {
                0 => Op::Nop,
                1 => Op::StoreSp,
                2 => Op::Stop,
                3 => Op::Jr(None),
                _ => Op::Jr(Some(Condition::from_index(y - 4))),
            },
            1 => {
                if q == 0 {
                    Op::LdPairImm(Pair::from_index(p))
                } else {
                    Op::AddHl(Pair::from_index(p))
                }
            }
            2 => {
                if q == 0 {
                    Op::StoreA(Indirect::from_index(p))
                } else {
                    Op::LoadA(Indirect::from_index(p))
                }
            }
            3 => {
                if q == 0 {
                    Op::IncPair(Pair::from_index(p))
                } else {
                    Op::DecPair(Pair::from_index(p))
                }
            }
            4 => Op::Inc(Reg8::from_index(y)),
            5 => Op::Dec(Reg8::from_index(y)),
            6 => Op::LdImm(Reg8::from_index(y)),
            _ => match y {
                0..=3 => Op::RotateA(ShiftOp::from_index(y)),
                4 => Op::Daa,
                5 => Op::Cpl,
                6 => Op::Scf,
                _ => Op::Ccf,
            },
        },
        1 => {
            if opcode == 0x76 {
                Op::Halt
            } else {
                Op::Ld(Reg8::from_index(y), Reg8::from_index(z))
            }
        }
        2 => Op::Alu(AluOp::from_index(y), Reg8::from_index(z)),
        _ => match opcode {
            0xC0 | 0xC8 | 0xD0 | 0xD8 => Op::Ret(Some(Condition::from_index(y))),
            0xC9 => Op::Ret(None),
            0xD9 => Op::Reti,
            0xC1 | 0xD1 | 0xE1 | 0xF1 => Op::Pop(StackPair::from_index(p)),
            0xC5 | 0xD5 | 0xE5 | 0xF5 => Op::Push(StackPair::from_index(p)),
            0xC2 | 0xCA | 0xD2 | 0xDA => Op::Jp(Some(Condition::from_index(y))),
            0xC3 => Op::Jp(None),
            0xE9 => Op::JpHl,
            0xC4 | 0xCC | 0xD4 | 0xDC => Op::Call(Some(Condition::from_index(y))),
            0xCD => Op::Call(None),
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                Op::AluImm(AluOp::from_index(y))
            }
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => Op::Rst(opcode & 0x38),
            0xCB => Op::Prefix,
            0xE0 => Op::StoreHighA,
            0xF0 => Op::LoadHighA,
            0xE2 => Op::StoreHighCA,
            0xF2 => Op::LoadHighCA,
            0xEA => Op::StoreAbsA,
            0xFA => Op::LoadAbsA,
            0xE8 => Op::AddSpOffset,
            0xF8 => Op::LdHlSpOffset,
            0xF9 => Op::LdSpHl,
            0xF3 => Op::Di,
            0xFB => Op::Ei,
            // D3, DB, DD, E3, E4, EB, EC, ED, F4, FC, FD
            _ => Op::Undefined,
        },
    }
}

const fn decode_extended(opcode: u8) -> ExtOp {
    let y = (opcode >> 3) & 0x07;
    let r = Reg8::from_index(opcode & 0x07);
    match opcode >> 6 {
        0 => ExtOp::Shift(ShiftOp::from_index(y), r),
        1 => ExtOp::Bit(y, r),
        2 => ExtOp::Res(y, r),
        _ => ExtOp::Set(y, r),
    }
}
