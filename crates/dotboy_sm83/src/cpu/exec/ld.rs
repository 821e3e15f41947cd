use crate::cpu::{Bus, Cpu, Indirect, Reg8};

impl Cpu {
    pub(super) fn exec_ld_r_r<B: Bus>(&mut self, bus: &mut B, dst: Reg8, src: Reg8) {
        let value = self.read_reg8(bus, src);
        self.write_reg8(bus, dst, value);
    }

    /// Resolve the address for `LD (rr),A` / `LD A,(rr)`, applying the
    /// HL post-increment/decrement.
    fn indirect_address(&mut self, src: Indirect) -> u16 {
        match src {
            Indirect::BC => self.regs.bc(),
            Indirect::DE => self.regs.de(),
            Indirect::HlIncrement => {
                let addr = self.regs.hl();
                self.regs.set_hl(addr.wrapping_add(1));
                addr
            }
            Indirect::HlDecrement => {
                let addr = self.regs.hl();
                self.regs.set_hl(addr.wrapping_sub(1));
                addr
            }
        }
    }

    pub(super) fn exec_store_a_indirect<B: Bus>(&mut self, bus: &mut B, dst: Indirect) {
        let addr = self.indirect_address(dst);
        bus.write8(addr, self.regs.a());
    }

    pub(super) fn exec_load_a_indirect<B: Bus>(&mut self, bus: &mut B, src: Indirect) {
        let addr = self.indirect_address(src);
        let value = bus.read8(addr);
        self.regs.set_a(value);
    }

    /// LD (a16),SP stores SP little-endian.
    pub(super) fn exec_store_sp<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let [lo, hi] = self.regs.sp.to_le_bytes();
        bus.write8(addr, lo);
        bus.write8(addr.wrapping_add(1), hi);
    }
}
