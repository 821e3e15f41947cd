use super::{Cpu, CpuError, CycleModel, Registers, StepTracer};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            ime: false,
            halted: false,
            cycle_model: CycleModel::default(),
            fault: None,
            tracer: None,
        };
        cpu.apply_dmg_boot_state();
        cpu
    }

    pub fn with_cycle_model(mut self, model: CycleModel) -> Self {
        self.cycle_model = model;
        self
    }

    pub fn cycle_model(&self) -> CycleModel {
        self.cycle_model
    }

    pub fn set_cycle_model(&mut self, model: CycleModel) {
        self.cycle_model = model;
    }

    /// Install a tracer that is called after every step.
    pub fn set_tracer(&mut self, tracer: impl StepTracer + 'static) {
        self.tracer = Some(Box::new(tracer));
    }

    pub fn clear_tracer(&mut self) {
        self.tracer = None;
    }

    /// The decode fault that locked the CPU, if any.
    pub fn fault(&self) -> Option<CpuError> {
        self.fault
    }

    /// Reset the CPU to its power-on state.
    ///
    /// Clears any decode fault. The cycle model and tracer are kept.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.halted = false;
        self.fault = None;
        self.apply_dmg_boot_state();
    }

    /// Initialize registers to match the DMG boot ROM's state after it
    /// hands control to cartridge code at 0x0100.
    fn apply_dmg_boot_state(&mut self) {
        self.regs.set_af(0x01B0); // Z, N, H, C = 1,0,1,1
        self.regs.set_bc(0x0013);
        self.regs.set_de(0x00D8);
        self.regs.set_hl(0x014D);
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;

        // IME is clear when control is handed to the cartridge. The game (or
        // test ROM) enables interrupts via EI/RETI as needed.
        self.ime = false;
    }
}
