use std::path::{Path, PathBuf};

/// Smallest image that still contains a complete cartridge header.
pub const MIN_ROM_SIZE: usize = 0x150;

/// Size of the cartridge-mapped window at the bottom of the address space.
pub const ROM_WINDOW_SIZE: usize = 0x8000;

const TITLE_START: usize = 0x134;
const TITLE_END: usize = 0x142;
const CARTRIDGE_TYPE: usize = 0x147;

#[derive(Debug, thiserror::Error)]
pub enum CartridgeError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ROM image is {len} bytes; a cartridge header needs at least {min}", min = MIN_ROM_SIZE)]
    TooSmall { len: usize },
}

/// Read-only cartridge image mapped at 0x0000–0x7FFF.
///
/// Only the first 32 KiB are reachable; bank switching is not modelled.
#[derive(Clone)]
pub struct Cartridge {
    rom: Vec<u8>,
}

impl Cartridge {
    /// Load a ROM image from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CartridgeError> {
        let path = path.as_ref();
        let rom = std::fs::read(path).map_err(|source| CartridgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(rom)
    }

    pub fn from_bytes(rom: Vec<u8>) -> Result<Self, CartridgeError> {
        if rom.len() < MIN_ROM_SIZE {
            return Err(CartridgeError::TooSmall { len: rom.len() });
        }

        let cartridge = Self { rom };
        let kind = cartridge.cartridge_type();
        if kind != 0x00 {
            log::warn!(
                "cartridge type 0x{kind:02X} uses a memory bank controller; only the first {} KiB are mapped",
                ROM_WINDOW_SIZE / 1024
            );
        }
        if cartridge.rom.len() > ROM_WINDOW_SIZE {
            log::warn!(
                "ROM image is {} bytes; bytes past 0x{ROM_WINDOW_SIZE:04X} are unreachable",
                cartridge.rom.len()
            );
        }
        Ok(cartridge)
    }

    /// Title from the header, with NUL padding removed.
    pub fn title(&self) -> String {
        let raw = &self.rom[TITLE_START..TITLE_END];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        String::from_utf8_lossy(&raw[..end]).trim_end().to_string()
    }

    /// Header byte 0x147 (0x00 = ROM only).
    pub fn cartridge_type(&self) -> u8 {
        self.rom[CARTRIDGE_TYPE]
    }

    pub fn len(&self) -> usize {
        self.rom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rom.is_empty()
    }

    /// Bytes past the end of a short image read as open bus (0xFF).
    pub fn read(&self, addr: u16) -> u8 {
        self.rom.get(addr as usize).copied().unwrap_or(0xFF)
    }

    /// ROM is read-only; on banked cartridges these writes would program
    /// the mapper, which is out of scope, so they are dropped.
    pub fn write(&mut self, addr: u16, value: u8) {
        log::trace!("ignored cartridge write 0x{value:02X} to 0x{addr:04X}");
    }
}

impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cartridge")
            .field("title", &self.title())
            .field("type", &self.cartridge_type())
            .field("len", &self.rom.len())
            .finish()
    }
}
