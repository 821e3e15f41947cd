use crate::cpu::{Bus, Cpu, StackPair};

impl Cpu {
    pub(super) fn exec_push<B: Bus>(&mut self, bus: &mut B, pair: StackPair) {
        let value = self.regs.stack_pair(pair);
        self.push_u16(bus, value);
    }

    /// POP AF drops the low nibble of F.
    pub(super) fn exec_pop<B: Bus>(&mut self, bus: &mut B, pair: StackPair) {
        let value = self.pop_u16(bus);
        self.regs.set_stack_pair(pair, value);
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, vector: u8) {
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = vector as u16;
    }

    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop_u16(bus);
        self.ime = true;
    }
}
