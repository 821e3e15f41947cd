use crate::cpu::alu::{self, AluOp, ShiftOp};
use crate::cpu::{Cpu, Flags, Pair};

impl Cpu {
    pub(super) fn exec_alu(&mut self, op: AluOp, value: u8) {
        let carry = self.regs.flag(Flags::CARRY);
        let (result, flags) = op.apply(self.regs.a(), value, carry);
        self.regs.set_a(result);
        self.regs.set_flags(flags);
    }

    pub(super) fn exec_rotate_a(&mut self, op: ShiftOp) {
        let carry = self.regs.flag(Flags::CARRY);
        let (result, flags) = alu::rotate_a(op, self.regs.a(), carry);
        self.regs.set_a(result);
        self.regs.set_flags(flags);
    }

    pub(super) fn exec_add_hl(&mut self, pair: Pair) {
        let value = self.regs.pair(pair);
        let (result, flags) = alu::add16(self.regs.hl(), value, self.regs.flags());
        self.regs.set_hl(result);
        self.regs.set_flags(flags);
    }

    pub(super) fn exec_add_sp_offset(&mut self, offset: u8) {
        let (result, flags) = alu::add16_signed(self.regs.sp, offset);
        self.regs.sp = result;
        self.regs.set_flags(flags);
    }

    pub(super) fn exec_ld_hl_sp_offset(&mut self, offset: u8) {
        let (result, flags) = alu::add16_signed(self.regs.sp, offset);
        self.regs.set_hl(result);
        self.regs.set_flags(flags);
    }

    pub(super) fn exec_daa(&mut self) {
        let (result, flags) = alu::daa(self.regs.a(), self.regs.flags());
        self.regs.set_a(result);
        self.regs.set_flags(flags);
    }

    pub(super) fn exec_cpl(&mut self) {
        let (result, flags) = alu::cpl(self.regs.a(), self.regs.flags());
        self.regs.set_a(result);
        self.regs.set_flags(flags);
    }

    /// SCF, or CCF when `complement` is set.
    pub(super) fn exec_scf(&mut self, complement: bool) {
        let flags = alu::set_carry(self.regs.flags(), complement);
        self.regs.set_flags(flags);
    }
}
