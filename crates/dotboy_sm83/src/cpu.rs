pub mod alu;
mod bus;
mod cb;
mod exec;
mod helpers;
mod init;
mod interrupts;
pub mod opcodes;
mod regs;
mod step;
mod trace;

use std::fmt;

pub use bus::{Bus, InterruptController};
pub use opcodes::{
    ExtOp, ExtOpcodeInfo, Op, OpcodeInfo, EXTENDED_TABLE, PREFIX_OPCODE, PRIMARY_TABLE,
};
pub use regs::{Condition, Flags, Indirect, Pair, Reg8, RegisterPair, Registers, StackPair};
pub use trace::{LogTracer, Opcode, StepKind, StepTracer, TraceEvent};

/// Errors surfaced by `Cpu::step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CpuError {
    /// The primary table has no instruction for this byte. On hardware the
    /// CPU hangs until power-off; here it stays locked until `reset`.
    #[error("undefined opcode 0x{opcode:02X} at PC=0x{pc:04X}")]
    UndefinedOpcode { opcode: u8, pc: u16 },
}

/// How conditional branches are charged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CycleModel {
    /// Every opcode costs its table base cost, whether or not a branch is
    /// taken.
    #[default]
    Fixed,
    /// Taken JR/JP/CALL/RET cc add the hardware penalty.
    BranchAccurate,
}

/// Sharp SM83 CPU core.
///
/// Holds the register file and the execution flags. The bus is borrowed
/// for the duration of each `step`; the CPU never owns memory.
pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable.
    pub ime: bool,
    pub halted: bool,
    cycle_model: CycleModel,
    /// Set once an undefined opcode has been executed.
    fault: Option<CpuError>,
    tracer: Option<Box<dyn StepTracer>>,
}

impl fmt::Debug for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cpu")
            .field("regs", &self.regs)
            .field("ime", &self.ime)
            .field("halted", &self.halted)
            .field("cycle_model", &self.cycle_model)
            .field("fault", &self.fault)
            .field("tracer", &self.tracer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests;
