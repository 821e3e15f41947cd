mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu, Op};

impl Cpu {
    /// Execute a decoded primary instruction whose immediate operand (if
    /// any) has already been fetched into `imm`.
    ///
    /// Returns `true` when a conditional branch was taken. `Prefix` and
    /// `Undefined` never reach this point.
    pub(super) fn execute<B: Bus>(&mut self, bus: &mut B, op: Op, imm: u16) -> bool {
        match op {
            Op::Nop => {}
            Op::Stop => self.exec_stop(),
            Op::Halt => self.exec_halt(),
            Op::Di => self.ime = false,
            Op::Ei => self.ime = true,

            Op::Ld(dst, src) => self.exec_ld_r_r(bus, dst, src),
            Op::LdImm(dst) => self.write_reg8(bus, dst, imm as u8),
            Op::LdPairImm(pair) => self.regs.set_pair(pair, imm),
            Op::StoreA(src) => self.exec_store_a_indirect(bus, src),
            Op::LoadA(src) => self.exec_load_a_indirect(bus, src),
            Op::StoreSp => self.exec_store_sp(bus, imm),
            Op::StoreHighA => bus.write8(0xFF00 | imm, self.regs.a()),
            Op::LoadHighA => {
                let value = bus.read8(0xFF00 | imm);
                self.regs.set_a(value);
            }
            Op::StoreHighCA => bus.write8(0xFF00 | self.regs.c() as u16, self.regs.a()),
            Op::LoadHighCA => {
                let value = bus.read8(0xFF00 | self.regs.c() as u16);
                self.regs.set_a(value);
            }
            Op::StoreAbsA => bus.write8(imm, self.regs.a()),
            Op::LoadAbsA => {
                let value = bus.read8(imm);
                self.regs.set_a(value);
            }
            Op::LdSpHl => self.regs.sp = self.regs.hl(),
            Op::LdHlSpOffset => self.exec_ld_hl_sp_offset(imm as u8),
            Op::AddSpOffset => self.exec_add_sp_offset(imm as u8),

            Op::Inc(reg) => self.exec_inc8(bus, reg),
            Op::Dec(reg) => self.exec_dec8(bus, reg),
            Op::IncPair(pair) => self.exec_inc16(pair),
            Op::DecPair(pair) => self.exec_dec16(pair),
            Op::AddHl(pair) => self.exec_add_hl(pair),

            Op::Alu(alu, src) => {
                let value = self.read_reg8(bus, src);
                self.exec_alu(alu, value);
            }
            Op::AluImm(alu) => self.exec_alu(alu, imm as u8),
            Op::RotateA(shift) => self.exec_rotate_a(shift),
            Op::Daa => self.exec_daa(),
            Op::Cpl => self.exec_cpl(),
            Op::Scf => self.exec_scf(false),
            Op::Ccf => self.exec_scf(true),

            Op::Jr(cond) => return self.exec_jr(cond, imm as u8),
            Op::Jp(cond) => return self.exec_jp(cond, imm),
            Op::JpHl => self.regs.pc = self.regs.hl(),
            Op::Call(cond) => return self.exec_call(bus, cond, imm),
            Op::Ret(cond) => return self.exec_ret(bus, cond),
            Op::Reti => self.exec_reti(bus),
            Op::Rst(vector) => self.exec_rst(bus, vector),
            Op::Push(pair) => self.exec_push(bus, pair),
            Op::Pop(pair) => self.exec_pop(bus, pair),

            Op::Prefix | Op::Undefined => {
                unreachable!("{op} must be handled by the dispatcher")
            }
        }
        false
    }
}
