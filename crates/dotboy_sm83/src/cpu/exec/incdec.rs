use crate::cpu::alu;
use crate::cpu::{Bus, Cpu, Pair, Reg8};

impl Cpu {
    pub(super) fn exec_inc8<B: Bus>(&mut self, bus: &mut B, reg: Reg8) {
        let value = self.read_reg8(bus, reg);
        let (result, flags) = alu::inc8(value, self.regs.flags());
        self.write_reg8(bus, reg, result);
        self.regs.set_flags(flags);
    }

    pub(super) fn exec_dec8<B: Bus>(&mut self, bus: &mut B, reg: Reg8) {
        let value = self.read_reg8(bus, reg);
        let (result, flags) = alu::dec8(value, self.regs.flags());
        self.write_reg8(bus, reg, result);
        self.regs.set_flags(flags);
    }

    // 16-bit INC/DEC leave the flags alone.

    pub(super) fn exec_inc16(&mut self, pair: Pair) {
        let value = self.regs.pair(pair).wrapping_add(1);
        self.regs.set_pair(pair, value);
    }

    pub(super) fn exec_dec16(&mut self, pair: Pair) {
        let value = self.regs.pair(pair).wrapping_sub(1);
        self.regs.set_pair(pair, value);
    }
}
