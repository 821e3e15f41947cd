use std::fmt;

use super::{Registers, EXTENDED_TABLE, PRIMARY_TABLE};

/// Opcode byte(s) executed by one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Primary(u8),
    /// The byte following the 0xCB prefix.
    Extended(u8),
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Opcode::Primary(byte) => {
                write!(f, "{byte:02X}    {}", PRIMARY_TABLE[byte as usize].op)
            }
            Opcode::Extended(byte) => {
                write!(f, "CB {byte:02X} {}", EXTENDED_TABLE[byte as usize].op)
            }
        }
    }
}

/// What a single step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    Instruction(Opcode),
    /// The CPU idled in HALT.
    Halted,
    /// An interrupt was dispatched to the given vector.
    Interrupt(u16),
}

/// Snapshot handed to a `StepTracer` after every step.
#[derive(Clone, Copy, Debug)]
pub struct TraceEvent {
    /// PC at the start of the step.
    pub pc: u16,
    pub kind: StepKind,
    /// Register state after the step.
    pub registers: Registers,
    pub cycles: u32,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}  ", self.pc)?;
        let what = match self.kind {
            StepKind::Instruction(opcode) => opcode.to_string(),
            StepKind::Halted => "(halted)".to_string(),
            StepKind::Interrupt(vector) => format!("(int {vector:04X})"),
        };
        write!(f, "{what:<18} {:?} cyc={}", self.registers, self.cycles)
    }
}

/// Optional observer called by the CPU once per step.
pub trait StepTracer {
    fn on_step(&mut self, event: &TraceEvent);
}

impl<F> StepTracer for F
where
    F: FnMut(&TraceEvent),
{
    fn on_step(&mut self, event: &TraceEvent) {
        self(event)
    }
}

/// Forwards every step to `log::trace!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTracer;

impl StepTracer for LogTracer {
    fn on_step(&mut self, event: &TraceEvent) {
        log::trace!("{event}");
    }
}
