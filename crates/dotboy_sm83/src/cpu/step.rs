use super::{
    Bus, Cpu, CpuError, CycleModel, Op, Opcode, StepKind, TraceEvent, EXTENDED_TABLE,
    PRIMARY_TABLE,
};

impl Cpu {
    /// Execute a single instruction and return the number of T-cycles taken.
    ///
    /// While halted the CPU idles for 4 cycles per call. Executing an
    /// undefined opcode returns `CpuError::UndefinedOpcode` and locks the
    /// CPU: every later call returns the same error without touching the
    /// bus until `reset`.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }

        let pc = self.regs.pc;

        if self.halted {
            // HALT is only left through `step_with_interrupts`.
            self.trace(pc, StepKind::Halted, 4);
            return Ok(4);
        }

        let opcode = self.fetch8(bus);
        let info = &PRIMARY_TABLE[opcode as usize];

        let (executed, cycles) = match info.op {
            Op::Prefix => {
                let ext = self.fetch8(bus);
                let ext_info = &EXTENDED_TABLE[ext as usize];
                self.exec_ext(bus, ext_info.op);
                (Opcode::Extended(ext), ext_info.cycles)
            }
            Op::Undefined => return Err(self.lock(opcode, pc)),
            op => {
                let imm = self.fetch_immediate(bus, info.operand_bytes);
                let taken = self.execute(bus, op, imm);
                let cycles = match self.cycle_model {
                    CycleModel::BranchAccurate if taken => info.taken_cycles,
                    _ => info.cycles,
                };
                (Opcode::Primary(opcode), cycles)
            }
        };

        self.trace(pc, StepKind::Instruction(executed), cycles);
        Ok(cycles)
    }

    fn lock(&mut self, opcode: u8, pc: u16) -> CpuError {
        log::error!(
            "SM83 CPU locked: undefined opcode 0x{opcode:02X} at PC=0x{pc:04X} ({regs:?})",
            regs = self.regs,
        );
        let fault = CpuError::UndefinedOpcode { opcode, pc };
        self.fault = Some(fault);
        fault
    }

    pub(super) fn trace(&mut self, pc: u16, kind: StepKind, cycles: u32) {
        if let Some(tracer) = self.tracer.as_mut() {
            tracer.on_step(&TraceEvent {
                pc,
                kind,
                registers: self.regs,
                cycles,
            });
        }
    }
}
