/// Abstraction over the SM83 address space (memory and IO).
///
/// The core only ever issues byte reads and writes. Reads take `&mut self`
/// because IO registers behind the bus may have read side effects.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
}

/// Source of maskable interrupts, consulted by `Cpu::step_with_interrupts`.
///
/// The controller owns the request/enable registers and decides which
/// source wins when several are pending; the core only vectors to whatever
/// address it is handed.
pub trait InterruptController {
    /// Whether any enabled source is currently requesting service.
    ///
    /// A pending request wakes the CPU from HALT even while IME is clear.
    fn pending(&mut self) -> bool;

    /// Acknowledge the source that should be serviced now and return its
    /// vector address. Returns `None` if nothing is pending anymore.
    fn acknowledge(&mut self) -> Option<u16>;
}
