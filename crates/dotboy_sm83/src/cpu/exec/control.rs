use crate::cpu::{Bus, Condition, Cpu};

impl Cpu {
    #[inline]
    fn condition_holds(&self, cond: Option<Condition>) -> bool {
        cond.is_none_or(|c| c.holds(self.regs.flags()))
    }

    /// JR [cc,]r8. PC already points past the operand, so the offset is
    /// relative to the next instruction.
    pub(super) fn exec_jr(&mut self, cond: Option<Condition>, offset: u8) -> bool {
        if !self.condition_holds(cond) {
            return false;
        }
        self.regs.pc = self.regs.pc.wrapping_add(offset as i8 as u16);
        cond.is_some()
    }

    pub(super) fn exec_jp(&mut self, cond: Option<Condition>, addr: u16) -> bool {
        if !self.condition_holds(cond) {
            return false;
        }
        self.regs.pc = addr;
        cond.is_some()
    }

    /// CALL [cc,]a16. The pushed return address is the instruction after
    /// the 3-byte CALL.
    pub(super) fn exec_call<B: Bus>(
        &mut self,
        bus: &mut B,
        cond: Option<Condition>,
        addr: u16,
    ) -> bool {
        if !self.condition_holds(cond) {
            return false;
        }
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = addr;
        cond.is_some()
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B, cond: Option<Condition>) -> bool {
        if !self.condition_holds(cond) {
            return false;
        }
        self.regs.pc = self.pop_u16(bus);
        cond.is_some()
    }
}
