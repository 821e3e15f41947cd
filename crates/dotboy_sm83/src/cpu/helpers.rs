use super::{Bus, Cpu, Reg8};

impl Cpu {
    /// Read an 8-bit register, or the bus at HL for `Reg8::HlIndirect`.
    #[inline]
    pub(super) fn read_reg8<B: Bus>(&mut self, bus: &mut B, reg: Reg8) -> u8 {
        match reg {
            Reg8::B => self.regs.b(),
            Reg8::C => self.regs.c(),
            Reg8::D => self.regs.d(),
            Reg8::E => self.regs.e(),
            Reg8::H => self.regs.h(),
            Reg8::L => self.regs.l(),
            Reg8::HlIndirect => bus.read8(self.regs.hl()),
            Reg8::A => self.regs.a(),
        }
    }

    /// Write an 8-bit register, or the bus at HL for `Reg8::HlIndirect`.
    #[inline]
    pub(super) fn write_reg8<B: Bus>(&mut self, bus: &mut B, reg: Reg8, value: u8) {
        match reg {
            Reg8::B => self.regs.set_b(value),
            Reg8::C => self.regs.set_c(value),
            Reg8::D => self.regs.set_d(value),
            Reg8::E => self.regs.set_e(value),
            Reg8::H => self.regs.set_h(value),
            Reg8::L => self.regs.set_l(value),
            Reg8::HlIndirect => bus.write8(self.regs.hl(), value),
            Reg8::A => self.regs.set_a(value),
        }
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Little-endian 16-bit immediate.
    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Fetch the 0, 1 or 2 immediate bytes of the current instruction.
    ///
    /// A single byte is returned zero-extended.
    #[inline]
    pub(super) fn fetch_immediate<B: Bus>(&mut self, bus: &mut B, operand_bytes: u8) -> u16 {
        match operand_bytes {
            0 => 0,
            1 => self.fetch8(bus) as u16,
            _ => self.fetch16(bus),
        }
    }

    /// Push a word: high byte at SP-1, low byte at SP-2.
    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    /// Pop a word: low byte at SP, high byte at SP+1.
    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read8(self.regs.sp);
        let hi = bus.read8(self.regs.sp.wrapping_add(1));
        self.regs.sp = self.regs.sp.wrapping_add(2);
        u16::from_le_bytes([lo, hi])
    }
}
