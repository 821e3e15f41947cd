use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dotboy_sm83::{Cartridge, Machine};
use typed_builder::TypedBuilder;

/// Frames to run when the command line does not say otherwise.
pub const DEFAULT_FRAMES: usize = 3_000;

#[derive(Clone, Debug, TypedBuilder)]
pub struct RunOptions {
    #[builder(setter(into))]
    pub rom_path: PathBuf,
    #[builder(default = DEFAULT_FRAMES)]
    pub frames: usize,
    /// Stop as soon as the serial stream reports "Passed" or "Failed".
    #[builder(default = true)]
    pub stop_on_result: bool,
}

/// Result reported by a test ROM over serial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
    /// Neither marker was seen before the frame limit.
    Unknown,
}

impl Verdict {
    pub fn from_serial(output: &[u8]) -> Self {
        let text = String::from_utf8_lossy(output);
        if text.contains("Failed") {
            Verdict::Failed
        } else if text.contains("Passed") {
            Verdict::Passed
        } else {
            Verdict::Unknown
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub title: String,
    pub frames: usize,
    pub cycles: u64,
    pub serial: Vec<u8>,
    pub verdict: Verdict,
}

/// Load the ROM named by `options`, run it and stream its serial output to
/// `out` after every frame.
pub fn run(options: &RunOptions, out: &mut impl Write) -> Result<RunSummary> {
    let cartridge = Cartridge::load(&options.rom_path)
        .with_context(|| format!("failed to load ROM {}", options.rom_path.display()))?;
    let title = cartridge.title();
    log::info!("Running '{}' for up to {} frames", title, options.frames);

    let mut machine = Machine::new(cartridge);
    let mut serial = Vec::new();
    let mut cycles = 0u64;
    let mut frames = 0;

    while frames < options.frames {
        cycles += machine
            .run_frame()
            .with_context(|| format!("'{title}' faulted after {frames} frames"))? as u64;
        frames += 1;

        let fresh = machine.take_serial_output();
        if !fresh.is_empty() {
            out.write_all(&fresh)?;
            out.flush()?;
            serial.extend_from_slice(&fresh);
        }

        if options.stop_on_result && Verdict::from_serial(&serial) != Verdict::Unknown {
            break;
        }
    }

    let verdict = Verdict::from_serial(&serial);
    log::info!(
        "'{title}' finished after {frames} frames ({cycles} cycles): {verdict:?}"
    );

    Ok(RunSummary {
        title,
        frames,
        cycles,
        serial,
        verdict,
    })
}
