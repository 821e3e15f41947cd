/// Serial data register (SB).
pub const SB: u16 = 0xFF01;
/// Serial control register (SC).
pub const SC: u16 = 0xFF02;

/// SC value that starts a transfer on the internal clock.
const START_INTERNAL: u8 = 0x81;
const TRANSFER_START: u8 = 0x80;

/// Link-port tap used by test ROMs to print text.
///
/// A ROM prints one character by storing it in SB and writing 0x81 to SC.
/// No partner is attached, so each started transfer completes at once: the
/// SB byte is appended to the captured output and the start bit drops.
#[derive(Clone, Debug, Default)]
pub(crate) struct SerialPort {
    data: u8,
    control: u8,
    captured: Vec<u8>,
}

impl SerialPort {
    pub(crate) fn read(&self, addr: u16) -> u8 {
        if addr == SB {
            self.data
        } else {
            self.control
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        if addr == SB {
            self.data = value;
            return;
        }

        self.control = value;
        if value & START_INTERNAL == START_INTERNAL {
            log::trace!("serial out 0x{:02X}", self.data);
            self.captured.push(self.data);
            self.control &= !TRANSFER_START;
        }
    }

    pub(crate) fn captured(&self) -> &[u8] {
        &self.captured
    }

    pub(crate) fn take_captured(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.captured)
    }
}
