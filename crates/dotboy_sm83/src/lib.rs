//! Sharp SM83 (DMG Game Boy) CPU core.
//!
//! `cpu` is the instruction-level interpreter: it borrows any `Bus` for
//! the duration of a step and returns the T-cycles consumed. `machine`
//! wires it to a minimal cartridge-plus-RAM bus so test ROMs can be run
//! and their serial output collected.

pub mod cpu;
pub mod machine;

pub use cpu::{
    Bus, Cpu, CpuError, CycleModel, Flags, InterruptController, LogTracer, Registers, StepTracer,
    TraceEvent,
};
pub use machine::{Cartridge, CartridgeError, FrameTiming, Machine, MemoryBus};
