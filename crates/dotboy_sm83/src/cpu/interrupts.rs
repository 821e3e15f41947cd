use super::{Bus, Cpu, CpuError, InterruptController, StepKind};

/// T-cycles charged for vectoring to an interrupt handler.
const INTERRUPT_DISPATCH_CYCLES: u32 = 20;

impl Cpu {
    /// Like `step`, but first gives `interrupts` a chance to wake the CPU
    /// from HALT and, with IME set, to redirect it to a handler.
    ///
    /// Which source is serviced when several are pending is decided by the
    /// controller; the CPU only pushes PC and jumps to the vector it gets.
    pub fn step_with_interrupts<B, I>(
        &mut self,
        bus: &mut B,
        interrupts: &mut I,
    ) -> Result<u32, CpuError>
    where
        B: Bus,
        I: InterruptController,
    {
        if self.fault.is_none() && interrupts.pending() {
            if self.halted {
                log::debug!("SM83 leaving HALT at PC=0x{:04X}", self.regs.pc);
                self.halted = false;
            }

            if self.ime {
                if let Some(vector) = interrupts.acknowledge() {
                    return Ok(self.dispatch_interrupt(bus, vector));
                }
            }
        }

        self.step(bus)
    }

    fn dispatch_interrupt<B: Bus>(&mut self, bus: &mut B, vector: u16) -> u32 {
        let pc = self.regs.pc;
        self.ime = false;
        self.halted = false;
        self.push_u16(bus, pc);
        self.regs.pc = vector;

        log::debug!(
            "SM83 interrupt: vector=0x{vector:04X} pc=0x{pc:04X} sp=0x{sp:04X}",
            sp = self.regs.sp,
        );

        self.trace(pc, StepKind::Interrupt(vector), INTERRUPT_DISPATCH_CYCLES);
        INTERRUPT_DISPATCH_CYCLES
    }
}
