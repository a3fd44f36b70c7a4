use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dotboy_gb::pacer::PacerExit;
use dotboy_gb::{FrameBuffer, FramePacer, FrameSink, GameBoy, PacerConfig};

pub const USAGE: &str =
    "usage: dotboy <rom> [--bios <path>] [--frames <n>] [--out <path>] [--no-sleep]";

/// Command-line options of the headless runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub rom: PathBuf,
    pub bios: Option<PathBuf>,
    pub frames: Option<u64>,
    /// Where to write the last finished frame as raw RGBA bytes.
    pub out: Option<PathBuf>,
    pub sleep: bool,
}

impl Options {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Options> {
        let mut args = args.into_iter();
        let mut rom = None;
        let mut bios = None;
        let mut frames = None;
        let mut out = None;
        let mut sleep = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bios" => bios = Some(PathBuf::from(value_for(&mut args, "--bios")?)),
                "--out" => out = Some(PathBuf::from(value_for(&mut args, "--out")?)),
                "--frames" => {
                    let value = value_for(&mut args, "--frames")?;
                    let count = value
                        .parse::<u64>()
                        .with_context(|| format!("invalid frame count '{value}'"))?;
                    frames = Some(count);
                }
                "--no-sleep" => sleep = false,
                flag if flag.starts_with("--") => bail!("unknown option '{flag}'\n{USAGE}"),
                path => {
                    if rom.is_some() {
                        bail!("more than one ROM given\n{USAGE}");
                    }
                    rom = Some(PathBuf::from(path));
                }
            }
        }

        let Some(rom) = rom else {
            bail!("no ROM path given\n{USAGE}");
        };

        Ok(Options {
            rom,
            bios,
            frames,
            out,
            sleep,
        })
    }
}

fn value_for<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("{flag} expects a value\n{USAGE}"))
}

/// Keeps the last finished frame.
#[derive(Default)]
struct HeadlessSink {
    last_frame: Option<FrameBuffer>,
    frames: u64,
}

impl FrameSink for HeadlessSink {
    fn on_frame(&mut self, frame: &FrameBuffer) {
        self.frames += 1;
        self.last_frame = Some(frame.clone());
    }

    fn on_pause(&mut self, pc: u16) {
        log::info!("Paused at 0x{pc:04X}");
    }

    fn on_max_clock_cycles(&mut self) {
        log::debug!("Frame budget ran out with the display off");
    }
}

pub fn run(options: &Options) -> Result<()> {
    let rom = std::fs::read(&options.rom)
        .with_context(|| format!("failed to read ROM '{}'", options.rom.display()))?;
    let bios = match &options.bios {
        Some(path) => Some(
            std::fs::read(path)
                .with_context(|| format!("failed to read BIOS '{}'", path.display()))?,
        ),
        None => None,
    };

    log::info!(
        "Playing ROM '{}' ({} bytes{})",
        options.rom.display(),
        rom.len(),
        if bios.is_some() { ", with BIOS" } else { "" }
    );

    let mut gameboy = GameBoy::new(bios, rom);
    let config = match options.frames {
        Some(frames) => PacerConfig::builder()
            .max_frames(frames)
            .sleep(options.sleep)
            .build(),
        None => PacerConfig::builder().sleep(options.sleep).build(),
    };
    let mut pacer = FramePacer::new(config);
    let mut sink = HeadlessSink::default();

    let result = pacer.run(&mut gameboy, &mut sink);

    let serial = gameboy.cpu.bus_mut().serial.take_output();
    for line in String::from_utf8_lossy(&serial).lines() {
        log::info!("serial: {line}");
    }

    if let (Some(path), Some(frame)) = (&options.out, &sink.last_frame) {
        std::fs::write(path, frame.as_bytes())
            .with_context(|| format!("failed to write frame to '{}'", path.display()))?;
        log::info!("Wrote last frame to '{}'", path.display());
    }

    let exit = result.context("emulation failed")?;
    match exit {
        PacerExit::Halted => log::info!("CPU halted after {} frames", sink.frames),
        PacerExit::FrameLimit => log::info!("Ran {} frames", sink.frames),
        PacerExit::Paused(_) | PacerExit::Stopped => {}
    }
    Ok(())
}
