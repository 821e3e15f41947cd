use crate::cpu::Cpu;

impl Cpu {
    /// STOP. The padding byte was consumed as the operand; low-power mode
    /// is not modelled, so execution simply continues.
    pub(super) fn exec_stop(&mut self) {
        log::debug!(
            "SM83 STOP at PC=0x{:04X} treated as NOP",
            self.regs.pc.wrapping_sub(2)
        );
    }

    pub(super) fn exec_halt(&mut self) {
        log::debug!(
            "SM83 entering HALT at PC=0x{:04X}",
            self.regs.pc.wrapping_sub(1)
        );
        self.halted = true;
    }
}
