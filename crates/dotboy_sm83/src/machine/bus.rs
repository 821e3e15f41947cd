use crate::cpu::Bus;

use super::cartridge::{Cartridge, ROM_WINDOW_SIZE};
use super::serial::{SerialPort, SB, SC};

/// Everything above the cartridge window: VRAM, WRAM, OAM, IO and HRAM
/// all share one flat store.
const RAM_SIZE: usize = 0x10000 - ROM_WINDOW_SIZE;

/// Reference bus: cartridge at 0x0000–0x7FFF, flat RAM everywhere else,
/// with the serial registers tapped so test ROM output can be collected.
pub struct MemoryBus {
    cartridge: Cartridge,
    ram: Vec<u8>,
    serial: SerialPort,
}

impl MemoryBus {
    pub fn new(cartridge: Cartridge) -> Self {
        Self {
            cartridge,
            ram: vec![0; RAM_SIZE],
            serial: SerialPort::default(),
        }
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    /// Every byte transmitted over serial since the last take.
    pub fn serial_output(&self) -> &[u8] {
        self.serial.captured()
    }

    pub fn take_serial_output(&mut self) -> Vec<u8> {
        self.serial.take_captured()
    }

    /// Clear RAM and serial state; the cartridge is kept.
    pub fn reset(&mut self) {
        self.ram.fill(0);
        self.serial = SerialPort::default();
    }
}

impl Bus for MemoryBus {
    fn read8(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.cartridge.read(addr),
            SB | SC => self.serial.read(addr),
            _ => self.ram[addr as usize - ROM_WINDOW_SIZE],
        }
    }

    fn write8(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => self.cartridge.write(addr, value),
            SB | SC => self.serial.write(addr, value),
            _ => self.ram[addr as usize - ROM_WINDOW_SIZE] = value,
        }
    }
}
