use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Flag bits in the F register.
    ///
    /// Layout (bit index in the byte, from MSB to LSB):
    /// - bit 7: Z (zero)
    /// - bit 6: N (subtract)
    /// - bit 5: H (half carry)
    /// - bit 4: C (carry)
    /// - bits 0–3 are always zero.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const ZERO = 0b1000_0000;
        const NEGATIVE = 0b0100_0000;
        const HALF_CARRY = 0b0010_0000;
        const CARRY = 0b0001_0000;
    }
}

impl Flags {
    /// Build a flag set from the four individual conditions.
    #[inline]
    pub fn from_conditions(zero: bool, negative: bool, half_carry: bool, carry: bool) -> Self {
        let mut flags = Flags::empty();
        flags.set(Flags::ZERO, zero);
        flags.set(Flags::NEGATIVE, negative);
        flags.set(Flags::HALF_CARRY, half_carry);
        flags.set(Flags::CARRY, carry);
        flags
    }
}

/// Two 8-bit registers that can also be addressed as one 16-bit value.
///
/// The high byte is the first register of the pair (B in BC, A in AF).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterPair {
    high: u8,
    low: u8,
}

impl RegisterPair {
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self {
            high: (value >> 8) as u8,
            low: value as u8,
        }
    }

    #[inline]
    pub const fn high(&self) -> u8 {
        self.high
    }

    #[inline]
    pub const fn low(&self) -> u8 {
        self.low
    }

    #[inline]
    pub const fn value(&self) -> u16 {
        (self.high as u16) << 8 | self.low as u16
    }

    #[inline]
    pub fn set_high(&mut self, value: u8) {
        self.high = value;
    }

    #[inline]
    pub fn set_low(&mut self, value: u8) {
        self.low = value;
    }

    #[inline]
    pub fn set_value(&mut self, value: u16) {
        *self = Self::new(value);
    }
}

/// Register file of the SM83 core.
///
/// The four pairs are stored as `RegisterPair`s; the single registers are
/// views onto their halves. F is only reachable through accessors so its
/// low nibble can never hold stale bits.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    af: RegisterPair,
    bc: RegisterPair,
    de: RegisterPair,
    hl: RegisterPair,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    #[inline]
    pub fn a(&self) -> u8 {
        self.af.high()
    }

    #[inline]
    pub fn set_a(&mut self, value: u8) {
        self.af.set_high(value);
    }

    #[inline]
    pub fn f(&self) -> u8 {
        self.af.low()
    }

    #[inline]
    pub fn set_f(&mut self, value: u8) {
        // Lower 4 bits of F are always zero.
        self.af.set_low(value & 0xF0);
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        Flags::from_bits_truncate(self.af.low())
    }

    #[inline]
    pub fn set_flags(&mut self, flags: Flags) {
        self.af.set_low(flags.bits());
    }

    #[inline]
    pub fn flag(&self, flag: Flags) -> bool {
        self.flags().contains(flag)
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.bc.high()
    }

    #[inline]
    pub fn set_b(&mut self, value: u8) {
        self.bc.set_high(value);
    }

    #[inline]
    pub fn c(&self) -> u8 {
        self.bc.low()
    }

    #[inline]
    pub fn set_c(&mut self, value: u8) {
        self.bc.set_low(value);
    }

    #[inline]
    pub fn d(&self) -> u8 {
        self.de.high()
    }

    #[inline]
    pub fn set_d(&mut self, value: u8) {
        self.de.set_high(value);
    }

    #[inline]
    pub fn e(&self) -> u8 {
        self.de.low()
    }

    #[inline]
    pub fn set_e(&mut self, value: u8) {
        self.de.set_low(value);
    }

    #[inline]
    pub fn h(&self) -> u8 {
        self.hl.high()
    }

    #[inline]
    pub fn set_h(&mut self, value: u8) {
        self.hl.set_high(value);
    }

    #[inline]
    pub fn l(&self) -> u8 {
        self.hl.low()
    }

    #[inline]
    pub fn set_l(&mut self, value: u8) {
        self.hl.set_low(value);
    }

    #[inline]
    pub fn af(&self) -> u16 {
        self.af.value()
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        self.af.set_value(value & 0xFFF0);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        self.bc.value()
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        self.bc.set_value(value);
    }

    #[inline]
    pub fn de(&self) -> u16 {
        self.de.value()
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        self.de.set_value(value);
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        self.hl.value()
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.hl.set_value(value);
    }

    /// Read a 16-bit pair through the BC/DE/HL/SP selector space.
    #[inline]
    pub fn pair(&self, pair: Pair) -> u16 {
        match pair {
            Pair::BC => self.bc(),
            Pair::DE => self.de(),
            Pair::HL => self.hl(),
            Pair::SP => self.sp,
        }
    }

    #[inline]
    pub fn set_pair(&mut self, pair: Pair, value: u16) {
        match pair {
            Pair::BC => self.set_bc(value),
            Pair::DE => self.set_de(value),
            Pair::HL => self.set_hl(value),
            Pair::SP => self.sp = value,
        }
    }

    /// Read a 16-bit pair through the PUSH/POP selector space.
    #[inline]
    pub fn stack_pair(&self, pair: StackPair) -> u16 {
        match pair {
            StackPair::BC => self.bc(),
            StackPair::DE => self.de(),
            StackPair::HL => self.hl(),
            StackPair::AF => self.af(),
        }
    }

    /// Write a 16-bit pair through the PUSH/POP selector space.
    ///
    /// Writing AF drops the low nibble of F.
    #[inline]
    pub fn set_stack_pair(&mut self, pair: StackPair, value: u16) {
        match pair {
            StackPair::BC => self.set_bc(value),
            StackPair::DE => self.set_de(value),
            StackPair::HL => self.set_hl(value),
            StackPair::AF => self.set_af(value),
        }
    }
}

impl fmt::Debug for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} PC={:04X}",
            self.af(),
            self.bc(),
            self.de(),
            self.hl(),
            self.sp,
            self.pc
        )
    }
}

/// 8-bit operand selector in opcode order.
///
/// `HlIndirect` is not a register: it reads and writes the bus at HL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    HlIndirect,
    A,
}

impl Reg8 {
    /// Decode the 3-bit register field used by the opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => Reg8::B,
            1 => Reg8::C,
            2 => Reg8::D,
            3 => Reg8::E,
            4 => Reg8::H,
            5 => Reg8::L,
            6 => Reg8::HlIndirect,
            7 => Reg8::A,
            _ => panic!("8-bit register selector out of range"),
        }
    }

    #[inline]
    pub const fn is_memory(self) -> bool {
        matches!(self, Reg8::HlIndirect)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::H => "H",
            Reg8::L => "L",
            Reg8::HlIndirect => "(HL)",
            Reg8::A => "A",
        }
    }
}

/// 16-bit pair selector used by loads, INC/DEC and ADD HL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pair {
    BC,
    DE,
    HL,
    SP,
}

impl Pair {
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => Pair::BC,
            1 => Pair::DE,
            2 => Pair::HL,
            3 => Pair::SP,
            _ => panic!("register pair selector out of range"),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Pair::BC => "BC",
            Pair::DE => "DE",
            Pair::HL => "HL",
            Pair::SP => "SP",
        }
    }
}

/// 16-bit pair selector used by PUSH/POP, where AF replaces SP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPair {
    BC,
    DE,
    HL,
    AF,
}

impl StackPair {
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => StackPair::BC,
            1 => StackPair::DE,
            2 => StackPair::HL,
            3 => StackPair::AF,
            _ => panic!("stack pair selector out of range"),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            StackPair::BC => "BC",
            StackPair::DE => "DE",
            StackPair::HL => "HL",
            StackPair::AF => "AF",
        }
    }
}

/// Address source for `LD (rr),A` / `LD A,(rr)`.
///
/// The HL forms post-increment or post-decrement HL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indirect {
    BC,
    DE,
    HlIncrement,
    HlDecrement,
}

impl Indirect {
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => Indirect::BC,
            1 => Indirect::DE,
            2 => Indirect::HlIncrement,
            3 => Indirect::HlDecrement,
            _ => panic!("indirect selector out of range"),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Indirect::BC => "(BC)",
            Indirect::DE => "(DE)",
            Indirect::HlIncrement => "(HL+)",
            Indirect::HlDecrement => "(HL-)",
        }
    }
}

/// Branch condition for JR/JP/CALL/RET.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    NotZero,
    Zero,
    NotCarry,
    Carry,
}

impl Condition {
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NotCarry,
            3 => Condition::Carry,
            _ => panic!("condition selector out of range"),
        }
    }

    #[inline]
    pub fn holds(self, flags: Flags) -> bool {
        match self {
            Condition::NotZero => !flags.contains(Flags::ZERO),
            Condition::Zero => flags.contains(Flags::ZERO),
            Condition::NotCarry => !flags.contains(Flags::CARRY),
            Condition::Carry => flags.contains(Flags::CARRY),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Condition::NotZero => "NZ",
            Condition::Zero => "Z",
            Condition::NotCarry => "NC",
            Condition::Carry => "C",
        }
    }
}
