mod bus;
mod cartridge;
mod serial;

use typed_builder::TypedBuilder;

use crate::cpu::{Cpu, CpuError};

pub use bus::MemoryBus;
pub use cartridge::{Cartridge, CartridgeError, MIN_ROM_SIZE};
pub use serial::{SB, SC};

/// DMG master clock in Hz.
pub const CLOCK_HZ: u32 = 4_194_304;
/// DMG display refresh rate in Hz.
pub const REFRESH_HZ: f64 = 59.63;

/// Per-frame cycle budget used by `Machine::run_frame`.
#[derive(Clone, Copy, Debug, PartialEq, TypedBuilder)]
pub struct FrameTiming {
    #[builder(default = CLOCK_HZ)]
    pub clock_hz: u32,
    #[builder(default = REFRESH_HZ)]
    pub refresh_hz: f64,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FrameTiming {
    /// Clock cycles per frame: clock frequency divided by refresh rate.
    pub fn cycles_per_frame(&self) -> u32 {
        (self.clock_hz as f64 / self.refresh_hz) as u32
    }
}

/// CPU plus reference bus, driven one frame at a time.
///
/// Peripherals other than the serial tap are not emulated; a host that
/// needs them interleaves its own work between `step` calls.
pub struct Machine {
    pub cpu: Cpu,
    pub bus: MemoryBus,
    timing: FrameTiming,
}

impl Machine {
    pub fn new(cartridge: Cartridge) -> Self {
        Self::with_timing(cartridge, FrameTiming::default())
    }

    pub fn with_timing(cartridge: Cartridge, timing: FrameTiming) -> Self {
        log::info!(
            "loaded '{}' ({} bytes, type 0x{:02X})",
            cartridge.title(),
            cartridge.len(),
            cartridge.cartridge_type()
        );
        Self {
            cpu: Cpu::new(),
            bus: MemoryBus::new(cartridge),
            timing,
        }
    }

    pub fn timing(&self) -> FrameTiming {
        self.timing
    }

    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> Result<u32, CpuError> {
        self.cpu.step(&mut self.bus)
    }

    /// Step until one frame's worth of cycles has been consumed.
    ///
    /// Returns the cycles actually executed, which may overshoot the budget
    /// by up to one instruction. Each frame starts counting from zero.
    pub fn run_frame(&mut self) -> Result<u32, CpuError> {
        let budget = self.timing.cycles_per_frame();
        let mut cycles = 0u32;
        while cycles < budget {
            cycles += self.step()?;
        }
        Ok(cycles)
    }

    pub fn serial_output(&self) -> &[u8] {
        self.bus.serial_output()
    }

    pub fn take_serial_output(&mut self) -> Vec<u8> {
        self.bus.take_serial_output()
    }
}
