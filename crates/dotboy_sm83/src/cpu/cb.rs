use super::alu;
use super::{Bus, Cpu, ExtOp, Flags};

impl Cpu {
    /// Execute a CB-prefixed instruction (rotates, shifts and bit ops).
    pub(super) fn exec_ext<B: Bus>(&mut self, bus: &mut B, op: ExtOp) {
        match op {
            ExtOp::Shift(shift, reg) => {
                let value = self.read_reg8(bus, reg);
                let (result, flags) = shift.apply(value, self.regs.flag(Flags::CARRY));
                self.write_reg8(bus, reg, result);
                self.regs.set_flags(flags);
            }
            ExtOp::Bit(bit, reg) => {
                let value = self.read_reg8(bus, reg);
                let flags = alu::bit(bit, value, self.regs.flags());
                self.regs.set_flags(flags);
            }
            // RES/SET leave the flags alone.
            ExtOp::Res(bit, reg) => {
                let value = self.read_reg8(bus, reg);
                self.write_reg8(bus, reg, value & !(1 << bit));
            }
            ExtOp::Set(bit, reg) => {
                let value = self.read_reg8(bus, reg);
                self.write_reg8(bus, reg, value | (1 << bit));
            }
        }
    }
}
