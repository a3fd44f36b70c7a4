//! Real-time frame pacing.
//!
//! The emulation core has no notion of wall-clock time; [`FramePacer`]
//! repeatedly asks a [`GameBoy`] for one frame and sleeps for whatever is
//! left of the frame budget. Overshoot carries over, so a slow frame is
//! paid back by shorter delays afterwards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use typed_builder::TypedBuilder;

use crate::cpu::StopReason;
use crate::error::EmuError;
use crate::machine::{FrameBuffer, GameBoy};
use crate::{CPU_CLOCK_HZ, CYCLES_PER_FRAME};

/// Wall-clock length of one DMG frame (70224 cycles at 4.194304 MHz,
/// about 16.74 ms).
pub fn default_frame_budget() -> Duration {
    Duration::from_nanos(CYCLES_PER_FRAME as u64 * 1_000_000_000 / CPU_CLOCK_HZ as u64)
}

/// Host callbacks. Every method has an empty default.
pub trait FrameSink {
    /// A frame finished at vertical blank.
    fn on_frame(&mut self, _frame: &FrameBuffer) {}
    /// Execution paused, at a breakpoint or on request. `pc` is the next
    /// instruction to run.
    fn on_pause(&mut self, _pc: u16) {}
    /// A fatal error stopped the pacer.
    fn on_error(&mut self, _error: &EmuError) {}
    /// A frame's worth of cycles ran without a frame being produced.
    fn on_max_clock_cycles(&mut self) {}
}

/// Cooperative cancellation shared between the pacer and its host.
#[derive(Clone, Debug, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct PacerConfig {
    #[builder(default = default_frame_budget())]
    pub frame_budget: Duration,
    /// Stop after this many frames.
    #[builder(default, setter(strip_option))]
    pub max_frames: Option<u64>,
    /// Sleep between frames. Headless runs usually turn this off.
    #[builder(default = true)]
    pub sleep: bool,
}

impl Default for PacerConfig {
    fn default() -> Self {
        PacerConfig::builder().build()
    }
}

/// Frame budget bookkeeping with carry-over of overshoot.
#[derive(Clone, Copy, Debug)]
pub struct FrameBudget {
    budget: Duration,
    /// Time overspent by previous frames, not yet paid back.
    debt: Duration,
}

impl FrameBudget {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            debt: Duration::ZERO,
        }
    }

    pub fn debt(&self) -> Duration {
        self.debt
    }

    /// Delay before the next frame: `budget - elapsed - debt`, floored at
    /// zero. Whatever goes below zero becomes the new debt.
    pub fn next_delay(&mut self, elapsed: Duration) -> Duration {
        let spent = elapsed + self.debt;
        match self.budget.checked_sub(spent) {
            Some(delay) => {
                self.debt = Duration::ZERO;
                delay
            }
            None => {
                self.debt = spent - self.budget;
                Duration::ZERO
            }
        }
    }
}

/// Why [`FramePacer::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacerExit {
    /// The stop token was triggered.
    Stopped,
    /// Paused at this PC (breakpoint or host request).
    Paused(u16),
    /// The CPU halted with no way to wake up.
    Halted,
    /// `max_frames` frames were run.
    FrameLimit,
}

/// Outcome of a single paced iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Iteration {
    /// Wait this long, then call again.
    Continue(Duration),
    Exit(PacerExit),
}

pub struct FramePacer {
    config: PacerConfig,
    budget: FrameBudget,
    stop: StopToken,
    frames: u64,
}

impl FramePacer {
    pub fn new(config: PacerConfig) -> Self {
        let budget = FrameBudget::new(config.frame_budget);
        Self {
            config,
            budget,
            stop: StopToken::new(),
            frames: 0,
        }
    }

    /// A handle that stops this pacer before its next iteration.
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Iterations run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame and report how long to wait before the next.
    ///
    /// Hosts with their own event loop call this from a timer; [`run`]
    /// wraps it in a blocking loop. An error is logged, handed to the sink,
    /// and stops the pacer.
    ///
    /// [`run`]: FramePacer::run
    pub fn run_once<S: FrameSink>(
        &mut self,
        gameboy: &mut GameBoy,
        sink: &mut S,
    ) -> Result<Iteration, EmuError> {
        if self.stop.is_stopped() {
            return Ok(Iteration::Exit(PacerExit::Stopped));
        }
        if self.config.max_frames.is_some_and(|max| self.frames >= max) {
            return Ok(Iteration::Exit(PacerExit::FrameLimit));
        }

        let started = Instant::now();
        let run = match gameboy.advance_one_frame() {
            Ok(run) => run,
            Err(err) => {
                log::error!(
                    "GB pacer: stopping at pc=0x{:04X}: {}",
                    gameboy.cpu.pc(),
                    err
                );
                sink.on_error(&err);
                self.stop.stop();
                return Err(err);
            }
        };
        self.frames += 1;

        match run.stop {
            StopReason::FrameComplete(frame) => sink.on_frame(&frame),
            StopReason::MaxClockCycles => sink.on_max_clock_cycles(),
            StopReason::Breakpoint(pc) => {
                log::debug!("GB pacer: breakpoint at 0x{pc:04X}");
                sink.on_pause(pc);
                return Ok(Iteration::Exit(PacerExit::Paused(pc)));
            }
            StopReason::Paused => {
                let pc = gameboy.cpu.pc();
                sink.on_pause(pc);
                return Ok(Iteration::Exit(PacerExit::Paused(pc)));
            }
            StopReason::Halted => {
                log::info!("GB pacer: CPU halted at 0x{:04X}", gameboy.cpu.pc());
                return Ok(Iteration::Exit(PacerExit::Halted));
            }
        }

        Ok(Iteration::Continue(self.budget.next_delay(started.elapsed())))
    }

    /// Run frames until stopped, paused, halted or out of frames.
    pub fn run<S: FrameSink>(
        &mut self,
        gameboy: &mut GameBoy,
        sink: &mut S,
    ) -> Result<PacerExit, EmuError> {
        log::info!(
            "GB pacer: starting (budget {:?}, sleep {})",
            self.config.frame_budget,
            self.config.sleep
        );

        loop {
            match self.run_once(gameboy, sink)? {
                Iteration::Exit(exit) => return Ok(exit),
                Iteration::Continue(delay) => {
                    if self.config.sleep && !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
            }
        }
    }
}
