//! LR35902 instruction engine.

pub mod alu;
mod bus;
pub mod decode;
mod exec;
mod helpers;
pub mod instruction;
mod interrupts;
mod regs;

pub use bus::Bus;
pub use instruction::{Instruction, Timing};
pub use regs::{FlagRegister, Registers};

use crate::error::{DecodeError, EmuError};
use crate::machine::{AddressSpace, Breakpoints, FrameBuffer, Joypad};
use crate::CYCLES_PER_FRAME;

/// Result of a single [`Cpu::step`].
#[derive(Debug)]
pub struct Step {
    /// Program counter after the instruction (or interrupt dispatch).
    pub pc: u16,
    pub cycles: u32,
    /// Set when the pixel pipeline finished a frame during this step.
    pub frame: Option<FrameBuffer>,
}

/// Why [`Cpu::run_frame`] returned.
#[derive(Debug)]
pub enum StopReason {
    FrameComplete(FrameBuffer),
    /// The instruction at this address is a breakpoint. The CPU is paused.
    Breakpoint(u16),
    /// Halted with no interrupt source enabled; nothing can wake it.
    Halted,
    /// A full frame's worth of cycles passed without a finished frame
    /// (typically because the display is off).
    MaxClockCycles,
    /// The CPU was paused before the run started.
    Paused,
}

#[derive(Debug)]
pub struct FrameRun {
    pub stop: StopReason,
    /// Cycles consumed by this run.
    pub cycles: u32,
}

/// The CPU core.
///
/// Owns the register file, PC/SP, the interrupt master enable and the bus.
/// `B` defaults to the full machine memory map.
pub struct Cpu<B: Bus = AddressSpace> {
    regs: Registers,
    pc: u16,
    sp: u16,
    /// Interrupt master enable (IME).
    ime: bool,
    /// Set by EI; IME turns on after the next instruction.
    ime_pending: bool,
    halted: bool,
    running: bool,
    /// The last run stopped on a breakpoint at `pc`; the next run steps
    /// over it once.
    resume_from_breakpoint: bool,
    /// Total T-cycles executed since construction.
    cycles: u64,
    bus: B,
}

impl Cpu<AddressSpace> {
    /// Build a fresh machine around a ROM image.
    ///
    /// Without a BIOS the CPU and I/O registers start in the state the DMG
    /// boot ROM leaves behind, with PC at the cartridge entry point 0x0100.
    /// With a BIOS everything starts zeroed and PC at 0.
    pub fn new(bios: Option<Vec<u8>>, rom: Vec<u8>, joypad: Joypad) -> Self {
        let skip_boot = bios.is_none();
        let bus = AddressSpace::new(bios, rom, joypad);
        let mut cpu = Cpu::with_bus(bus);
        if skip_boot {
            cpu.init_post_boot();
        }
        cpu
    }

    /// Register values after the DMG boot ROM hands over to the cartridge.
    fn init_post_boot(&mut self) {
        self.regs.set_af(0x01B0);
        self.regs.set_bc(0x0013);
        self.regs.set_de(0x00D8);
        self.regs.set_hl(0x014D);
        self.sp = 0xFFFE;
        self.pc = 0x0100;
    }

    /// Run until a frame completes, a breakpoint is reached, the CPU halts
    /// for good, or a frame's worth of cycles has elapsed.
    ///
    /// Breakpoints are checked at every instruction boundary before the
    /// instruction runs, including the first. After a run stopped on a
    /// breakpoint, the next run executes that instruction instead of
    /// stopping on it again.
    pub fn run_frame(&mut self, breakpoints: &Breakpoints) -> Result<FrameRun, EmuError> {
        let mut cycles = 0u32;

        if !self.running {
            return Ok(FrameRun {
                stop: StopReason::Paused,
                cycles,
            });
        }

        let mut skip_breakpoint = std::mem::take(&mut self.resume_from_breakpoint);

        loop {
            if !skip_breakpoint && breakpoints.contains(self.pc) {
                self.running = false;
                self.resume_from_breakpoint = true;
                return Ok(FrameRun {
                    stop: StopReason::Breakpoint(self.pc),
                    cycles,
                });
            }
            skip_breakpoint = false;

            let step = self.step()?;
            cycles += step.cycles;

            if let Some(frame) = step.frame {
                return Ok(FrameRun {
                    stop: StopReason::FrameComplete(frame),
                    cycles,
                });
            }

            // Only a halt with no enabled source ends the run. A halt
            // waiting on an enabled but not yet pending interrupt (the usual
            // wait for VBlank) keeps ticking, otherwise every such wait
            // would end the pacer.
            if self.halted && !self.can_wake()? {
                return Ok(FrameRun {
                    stop: StopReason::Halted,
                    cycles,
                });
            }

            if cycles >= CYCLES_PER_FRAME {
                return Ok(FrameRun {
                    stop: StopReason::MaxClockCycles,
                    cycles,
                });
            }
        }
    }
}

impl<B: Bus> Cpu<B> {
    /// Wrap an arbitrary bus. All registers start at zero.
    pub fn with_bus(bus: B) -> Self {
        Self {
            regs: Registers::default(),
            pc: 0,
            sp: 0,
            ime: false,
            ime_pending: false,
            halted: false,
            running: true,
            resume_from_breakpoint: false,
            cycles: 0,
            bus,
        }
    }

    /// Execute one instruction, or one interrupt dispatch, or one idle
    /// HALT tick, and advance the peripherals by the cycles it took.
    ///
    /// Any error pauses the CPU. A decode error leaves PC on the offending
    /// opcode so the state can be inspected.
    pub fn step(&mut self) -> Result<Step, EmuError> {
        let result = self.step_inner();
        if result.is_err() {
            self.running = false;
        }
        result
    }

    fn step_inner(&mut self) -> Result<Step, EmuError> {
        let mut cycles = self.service_interrupts()?;

        if cycles == 0 {
            cycles = if self.halted {
                4
            } else {
                self.step_instruction()?
            };
        }

        self.cycles += cycles as u64;
        let frame = self.bus.tick(cycles);

        Ok(Step {
            pc: self.pc,
            cycles,
            frame,
        })
    }

    fn step_instruction(&mut self) -> Result<u32, EmuError> {
        let enable_ime = std::mem::take(&mut self.ime_pending);

        let instruction = self.fetch_instruction()?;
        let cycles = self.execute(instruction)?;

        // DI directly after EI wins.
        if enable_ime && instruction != Instruction::Di {
            self.ime = true;
        }

        Ok(cycles)
    }

    /// Fetch and decode the instruction at PC, consulting the extended
    /// table after the 0xCB prefix.
    fn fetch_instruction(&mut self) -> Result<Instruction, EmuError> {
        let at = self.pc;
        let opcode = self.fetch8()?;

        if opcode == decode::PREFIX {
            let extended = self.fetch8()?;
            return Ok(Instruction::from_prefixed_byte(extended));
        }

        match Instruction::from_byte(opcode) {
            Some(instruction) => Ok(instruction),
            None => {
                self.pc = at;
                Err(DecodeError {
                    opcode,
                    prefixed: false,
                    pc: at,
                }
                .into())
            }
        }
    }

    /// Stop [`Cpu::run_frame`] at the next call. The current step, if any,
    /// still completes.
    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn unpause(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn ime(&self) -> bool {
        self.ime
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u16 {
        self.sp
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Mutable register access for debuggers and tests.
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    pub fn set_sp(&mut self, sp: u16) {
        self.sp = sp;
    }

    pub fn total_cycles(&self) -> u64 {
        self.cycles
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

#[cfg(test)]
mod tests;
