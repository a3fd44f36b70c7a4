use super::*;
use crate::error::BusError;
use crate::machine::interrupts::{IE_ADDR, IF_ADDR};

struct TestBus {
    memory: Box<[u8; 0x10000]>,
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: Box::new([0; 0x10000]),
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> Result<u8, BusError> {
        Ok(self.memory[addr as usize])
    }

    fn write8(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        self.memory[addr as usize] = value;
        Ok(())
    }
}

/// CPU over a flat 64K bus with `program` loaded at 0x0000.
fn test_cpu(program: &[u8]) -> Cpu<TestBus> {
    let mut bus = TestBus::default();
    bus.memory[..program.len()].copy_from_slice(program);
    let mut cpu = Cpu::with_bus(bus);
    cpu.sp = 0xFFFE;
    cpu
}

/// Real machine with `program` at the cartridge entry point 0x0100.
fn rom_cpu(program: &[u8]) -> Cpu {
    let mut rom = vec![0u8; 0x8000];
    rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
    Cpu::new(None, rom, Joypad::new())
}

fn step_cycles<B: Bus>(cpu: &mut Cpu<B>) -> u32 {
    cpu.step().expect("step failed").cycles
}

#[test]
fn nop_advances_pc() {
    let mut cpu = test_cpu(&[0x00]);
    assert_eq!(step_cycles(&mut cpu), 4);
    assert_eq!(cpu.pc(), 0x0001);
}

#[test]
fn post_boot_state_without_bios() {
    let cpu = rom_cpu(&[]);
    assert_eq!(cpu.pc(), 0x0100);
    assert_eq!(cpu.sp(), 0xFFFE);
    assert_eq!(cpu.registers().af(), 0x01B0);
    assert_eq!(cpu.registers().bc(), 0x0013);
    assert_eq!(cpu.registers().de(), 0x00D8);
    assert_eq!(cpu.registers().hl(), 0x014D);
    assert!(!cpu.bus().bios_mapped());
}

#[test]
fn bios_start_runs_from_zero() {
    let cpu = Cpu::new(Some(vec![0u8; 0x100]), vec![0u8; 0x8000], Joypad::new());
    assert_eq!(cpu.pc(), 0x0000);
    assert_eq!(cpu.registers().af(), 0x0000);
    assert!(cpu.bus().bios_mapped());
}

#[test]
fn add_hl_bc_then_halt() {
    // ADD HL,BC; HALT
    let mut cpu = rom_cpu(&[0x09, 0x76]);
    cpu.registers_mut().set_bc(0x0101);
    cpu.registers_mut().set_hl(0x0001);

    let run = cpu.run_frame(&Breakpoints::new()).unwrap();
    assert!(matches!(run.stop, StopReason::Halted));
    assert_eq!(run.cycles, 12);

    assert_eq!(cpu.registers().hl(), 0x0102);
    assert_eq!(cpu.pc(), 0x0102);
    assert!(!cpu.registers().f.subtract);
    assert!(!cpu.registers().f.carry);
    assert!(cpu.is_halted());
}

#[test]
fn jp_a16_then_halt() {
    let mut program = vec![0u8; 0x60];
    // JP 0x0150
    program[0x00] = 0xC3;
    program[0x01] = 0x50;
    program[0x02] = 0x01;
    program[0x50] = 0x76;
    let mut cpu = rom_cpu(&program);

    let run = cpu.run_frame(&Breakpoints::new()).unwrap();
    assert!(matches!(run.stop, StopReason::Halted));
    assert_eq!(cpu.pc(), 0x0151);
    assert_eq!(run.cycles, 16 + 4);
}

#[test]
fn ld_16bit_and_ld_indirect() {
    // LD BC,0x1234; LD (BC),A; LD A,(BC)
    let mut cpu = test_cpu(&[0x01, 0x34, 0x12, 0x02, 0x0A]);
    cpu.regs.a = 0xAB;

    assert_eq!(step_cycles(&mut cpu), 12);
    assert_eq!(cpu.regs.bc(), 0x1234);
    assert_eq!(cpu.pc(), 0x0003);

    assert_eq!(step_cycles(&mut cpu), 8);
    assert_eq!(cpu.bus().memory[0x1234], 0xAB);

    cpu.regs.a = 0;
    assert_eq!(step_cycles(&mut cpu), 8);
    assert_eq!(cpu.regs.a, 0xAB);
}

#[test]
fn ld_hl_increment_and_decrement_forms() {
    // LD HL,0xC000; LD B,0x12; LD (HL),B; LD A,(HL+); LD (HL-),A; LD C,A
    let mut cpu = test_cpu(&[0x21, 0x00, 0xC0, 0x06, 0x12, 0x70, 0x2A, 0x32, 0x4F]);

    assert_eq!(step_cycles(&mut cpu), 12);
    assert_eq!(step_cycles(&mut cpu), 8);
    assert_eq!(cpu.regs.b, 0x12);

    assert_eq!(step_cycles(&mut cpu), 8);
    assert_eq!(cpu.bus().memory[0xC000], 0x12);

    assert_eq!(step_cycles(&mut cpu), 8);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(cpu.regs.hl(), 0xC001);

    assert_eq!(step_cycles(&mut cpu), 8);
    assert_eq!(cpu.bus().memory[0xC001], 0x12);
    assert_eq!(cpu.regs.hl(), 0xC000);

    assert_eq!(step_cycles(&mut cpu), 4);
    assert_eq!(cpu.regs.c, 0x12);
}

#[test]
fn ldh_and_absolute_loads() {
    // LDH (0x80),A; LD A,0; LDH A,(0x80); LD (0xC010),A; LD A,(0xC010)
    let mut cpu = test_cpu(&[
        0xE0, 0x80, 0x3E, 0x00, 0xF0, 0x80, 0xEA, 0x10, 0xC0, 0xFA, 0x10, 0xC0,
    ]);
    cpu.regs.a = 0x5A;

    assert_eq!(step_cycles(&mut cpu), 12);
    assert_eq!(cpu.bus().memory[0xFF80], 0x5A);
    assert_eq!(step_cycles(&mut cpu), 8);
    assert_eq!(cpu.regs.a, 0);
    assert_eq!(step_cycles(&mut cpu), 12);
    assert_eq!(cpu.regs.a, 0x5A);
    assert_eq!(step_cycles(&mut cpu), 16);
    assert_eq!(cpu.bus().memory[0xC010], 0x5A);
    assert_eq!(step_cycles(&mut cpu), 16);
    assert_eq!(cpu.pc(), 12);
}

#[test]
fn ld_a16_sp_stores_little_endian() {
    // LD (0xC100),SP
    let mut cpu = test_cpu(&[0x08, 0x00, 0xC1]);
    cpu.sp = 0xBEEF;
    assert_eq!(step_cycles(&mut cpu), 20);
    assert_eq!(cpu.bus().memory[0xC100], 0xEF);
    assert_eq!(cpu.bus().memory[0xC101], 0xBE);
}

#[test]
fn add_and_adc_flags() {
    // ADD A,B; ADC A,E
    let mut cpu = test_cpu(&[0x80, 0x8B]);
    cpu.regs.a = 0x3A;
    cpu.regs.b = 0xC6;

    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0x00);
    assert_eq!(
        cpu.regs.f,
        FlagRegister {
            zero: true,
            subtract: false,
            half_carry: true,
            carry: true,
        }
    );

    cpu.regs.a = 0xE1;
    cpu.regs.e = 0x0F;
    cpu.regs.f.carry = true;
    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0xF1);
    assert!(!cpu.regs.f.zero);
    assert!(cpu.regs.f.half_carry);
    assert!(!cpu.regs.f.carry);
}

#[test]
fn sub_sbc_and_cp_flags() {
    // SUB E; SBC A,H; CP 0x40
    let mut cpu = test_cpu(&[0x93, 0x9C, 0xFE, 0x40]);
    cpu.regs.a = 0x3E;
    cpu.regs.e = 0x3E;

    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0);
    assert!(cpu.regs.f.zero);
    assert!(cpu.regs.f.subtract);
    assert!(!cpu.regs.f.half_carry);
    assert!(!cpu.regs.f.carry);

    cpu.regs.a = 0x3B;
    cpu.regs.h = 0x2A;
    cpu.regs.f.carry = true;
    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0x10);
    assert!(!cpu.regs.f.zero);
    assert!(!cpu.regs.f.half_carry);
    assert!(!cpu.regs.f.carry);

    cpu.regs.a = 0x3C;
    assert_eq!(step_cycles(&mut cpu), 8);
    // CP leaves A alone.
    assert_eq!(cpu.regs.a, 0x3C);
    assert!(!cpu.regs.f.zero);
    assert!(cpu.regs.f.subtract);
    assert!(cpu.regs.f.carry);
}

#[test]
fn logic_ops_flags() {
    // AND B; OR C; XOR A
    let mut cpu = test_cpu(&[0xA0, 0xB1, 0xAF]);
    cpu.regs.a = 0xF0;
    cpu.regs.b = 0x0F;
    cpu.regs.c = 0x81;
    cpu.regs.f.carry = true;

    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0);
    assert!(cpu.regs.f.zero);
    assert!(cpu.regs.f.half_carry);
    assert!(!cpu.regs.f.carry);

    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0x81);
    assert!(!cpu.regs.f.zero);
    assert!(!cpu.regs.f.half_carry);

    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0);
    assert_eq!(u8::from(cpu.regs.f), 0x80);
}

#[test]
fn inc_dec_8bit_preserve_carry() {
    // INC B; DEC B; INC A; DEC A
    let mut cpu = test_cpu(&[0x04, 0x05, 0x3C, 0x3D]);
    cpu.regs.b = 0x0F;
    cpu.regs.f.carry = true;

    assert_eq!(step_cycles(&mut cpu), 4);
    assert_eq!(cpu.regs.b, 0x10);
    assert!(!cpu.regs.f.zero);
    assert!(!cpu.regs.f.subtract);
    assert!(cpu.regs.f.half_carry);
    assert!(cpu.regs.f.carry);

    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.b, 0x0F);
    assert!(cpu.regs.f.subtract);
    assert!(cpu.regs.f.half_carry);
    assert!(cpu.regs.f.carry);

    cpu.regs.a = 0xFF;
    cpu.regs.f.carry = false;
    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.f.zero);
    assert!(cpu.regs.f.half_carry);
    assert!(!cpu.regs.f.carry);

    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0xFF);
    assert!(!cpu.regs.f.zero);
    assert!(cpu.regs.f.subtract);
}

#[test]
fn inc_dec_on_hl_memory() {
    // INC (HL); DEC (HL)
    let mut cpu = test_cpu(&[0x34, 0x35]);
    cpu.regs.set_hl(0xC000);

    assert_eq!(step_cycles(&mut cpu), 12);
    assert_eq!(cpu.bus().memory[0xC000], 0x01);
    assert_eq!(step_cycles(&mut cpu), 12);
    assert_eq!(cpu.bus().memory[0xC000], 0x00);
    assert!(cpu.regs.f.zero);
}

#[test]
fn inc_dec_16bit_leave_flags_and_add_hl() {
    // INC BC; DEC BC; ADD HL,BC; ADD HL,SP
    let mut cpu = test_cpu(&[0x03, 0x0B, 0x09, 0x39]);
    cpu.regs.set_bc(0x1234);
    cpu.regs.set_hl(0x0FFF);
    cpu.regs.f = FlagRegister::from(0xF0);

    assert_eq!(step_cycles(&mut cpu), 8);
    assert_eq!(cpu.regs.bc(), 0x1235);
    assert_eq!(u8::from(cpu.regs.f), 0xF0);

    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.bc(), 0x1234);
    assert_eq!(u8::from(cpu.regs.f), 0xF0);

    // Carry out of bit 11, not bit 15.
    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.hl(), 0x2233);
    assert!(!cpu.regs.f.subtract);
    assert!(cpu.regs.f.half_carry);
    assert!(!cpu.regs.f.carry);
    assert!(cpu.regs.f.zero, "ADD HL,rr leaves Z untouched");

    cpu.sp = 0xE000;
    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.hl(), 0x0233);
    assert!(cpu.regs.f.carry);
}

#[test]
fn add_sp_signed_offset_flags() {
    // ADD SP,+1; ADD SP,-1
    let mut cpu = test_cpu(&[0xE8, 0x01, 0xE8, 0xFF]);
    cpu.sp = 0x0FFF;

    assert_eq!(step_cycles(&mut cpu), 16);
    assert_eq!(cpu.sp(), 0x1000);
    assert!(!cpu.regs.f.zero);
    assert!(!cpu.regs.f.subtract);
    assert!(cpu.regs.f.half_carry);
    assert!(cpu.regs.f.carry);

    assert_eq!(step_cycles(&mut cpu), 16);
    assert_eq!(cpu.sp(), 0x0FFF);
    assert!(!cpu.regs.f.zero);
    assert!(!cpu.regs.f.subtract);
}

#[test]
fn ld_hl_sp_offset_and_ld_sp_hl() {
    // LD HL,SP+1; LD SP,HL
    let mut cpu = test_cpu(&[0xF8, 0x01, 0xF9]);
    cpu.sp = 0x0FFF;

    assert_eq!(step_cycles(&mut cpu), 12);
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert_eq!(cpu.sp(), 0x0FFF);
    assert!(cpu.regs.f.half_carry);
    assert!(cpu.regs.f.carry);

    cpu.regs.f = FlagRegister::from(0xC0);
    assert_eq!(step_cycles(&mut cpu), 8);
    assert_eq!(cpu.sp(), 0x1000);
    assert_eq!(u8::from(cpu.regs.f), 0xC0);
}

#[test]
fn daa_after_bcd_add_and_sub() {
    // ADD A,B; DAA; SUB C; DAA
    let mut cpu = test_cpu(&[0x80, 0x27, 0x91, 0x27]);
    cpu.regs.a = 0x45;
    cpu.regs.b = 0x38;
    cpu.regs.c = 0x29;

    step_cycles(&mut cpu);
    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0x83);
    assert!(!cpu.regs.f.carry);
    assert!(!cpu.regs.f.half_carry);

    step_cycles(&mut cpu);
    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0x54);
    assert!(cpu.regs.f.subtract);
    assert!(!cpu.regs.f.zero);
}

#[test]
fn daa_sets_carry_on_decimal_overflow() {
    // ADD A,B; DAA
    let mut cpu = test_cpu(&[0x80, 0x27]);
    cpu.regs.a = 0x99;
    cpu.regs.b = 0x01;

    step_cycles(&mut cpu);
    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.f.zero);
    assert!(cpu.regs.f.carry);
}

#[test]
fn cpl_scf_ccf() {
    // CPL; SCF; CCF
    let mut cpu = test_cpu(&[0x2F, 0x37, 0x3F]);
    cpu.regs.a = 0x35;

    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0xCA);
    assert!(cpu.regs.f.subtract);
    assert!(cpu.regs.f.half_carry);

    step_cycles(&mut cpu);
    assert!(cpu.regs.f.carry);
    assert!(!cpu.regs.f.subtract);
    assert!(!cpu.regs.f.half_carry);

    step_cycles(&mut cpu);
    assert!(!cpu.regs.f.carry);
}

#[test]
fn accumulator_rotates_clear_zero() {
    // RLCA; RRA
    let mut cpu = test_cpu(&[0x07, 0x1F]);
    cpu.regs.a = 0x80;
    cpu.regs.f.zero = true;

    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0x01);
    assert!(cpu.regs.f.carry);
    assert!(!cpu.regs.f.zero);

    // RRA shifts the carry into bit 7.
    cpu.regs.a = 0x00;
    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0x80);
    assert!(!cpu.regs.f.carry);
    assert!(!cpu.regs.f.zero);
}

#[test]
fn cb_rotate_bit_res_set() {
    // RL C; SWAP A; BIT 7,H; RES 0,(HL); SET 3,(HL); BIT 0,(HL)
    let mut cpu = test_cpu(&[
        0xCB, 0x11, 0xCB, 0x37, 0xCB, 0x7C, 0xCB, 0x86, 0xCB, 0xDE, 0xCB, 0x46,
    ]);
    cpu.regs.c = 0x80;
    cpu.regs.a = 0xF1;
    cpu.regs.set_hl(0xC000);
    cpu.bus_mut().memory[0xC000] = 0x01;

    assert_eq!(step_cycles(&mut cpu), 8);
    assert_eq!(cpu.regs.c, 0x00);
    assert!(cpu.regs.f.zero);
    assert!(cpu.regs.f.carry);

    step_cycles(&mut cpu);
    assert_eq!(cpu.regs.a, 0x1F);
    assert!(!cpu.regs.f.carry);

    // H is 0xC0, bit 7 set.
    assert_eq!(step_cycles(&mut cpu), 8);
    assert!(!cpu.regs.f.zero);
    assert!(cpu.regs.f.half_carry);

    assert_eq!(step_cycles(&mut cpu), 16);
    assert_eq!(cpu.bus().memory[0xC000], 0x00);

    assert_eq!(step_cycles(&mut cpu), 16);
    assert_eq!(cpu.bus().memory[0xC000], 0x08);

    assert_eq!(step_cycles(&mut cpu), 12);
    assert!(cpu.regs.f.zero);
    assert_eq!(cpu.bus().memory[0xC000], 0x08);
    assert_eq!(cpu.pc(), 12);
}

#[test]
fn push_pop_and_pop_af_masks_low_nibble() {
    // PUSH BC; POP DE; POP AF
    let mut cpu = test_cpu(&[0xC5, 0xD1, 0xF1]);
    cpu.regs.set_bc(0x1234);

    assert_eq!(step_cycles(&mut cpu), 16);
    assert_eq!(cpu.sp(), 0xFFFC);
    // High byte goes to the higher address.
    assert_eq!(cpu.bus().memory[0xFFFD], 0x12);
    assert_eq!(cpu.bus().memory[0xFFFC], 0x34);

    assert_eq!(step_cycles(&mut cpu), 12);
    assert_eq!(cpu.regs.de(), 0x1234);
    assert_eq!(cpu.sp(), 0xFFFE);

    cpu.sp = 0xFFFC;
    cpu.bus_mut().memory[0xFFFC] = 0x3F;
    cpu.bus_mut().memory[0xFFFD] = 0x12;
    assert_eq!(step_cycles(&mut cpu), 12);
    assert_eq!(cpu.regs.a, 0x12);
    assert_eq!(u8::from(cpu.regs.f), 0x30);
    assert_eq!(cpu.regs.af(), 0x1230);
}

#[test]
fn call_and_ret() {
    let mut cpu = test_cpu(&[0xCD, 0x34, 0x12]);
    cpu.bus_mut().memory[0x1234] = 0xC9;

    assert_eq!(step_cycles(&mut cpu), 24);
    assert_eq!(cpu.pc(), 0x1234);
    assert_eq!(cpu.sp(), 0xFFFC);
    assert_eq!(cpu.bus().memory[0xFFFC], 0x03);
    assert_eq!(cpu.bus().memory[0xFFFD], 0x00);

    assert_eq!(step_cycles(&mut cpu), 16);
    assert_eq!(cpu.pc(), 0x0003);
    assert_eq!(cpu.sp(), 0xFFFE);
}

#[test]
fn conditional_branches_charge_taken_and_not_taken() {
    // JR NZ,+2
    let mut cpu = test_cpu(&[0x20, 0x02]);
    cpu.regs.f.zero = true;
    assert_eq!(step_cycles(&mut cpu), 8);
    assert_eq!(cpu.pc(), 0x0002);

    let mut cpu = test_cpu(&[0x20, 0x02]);
    assert_eq!(step_cycles(&mut cpu), 12);
    assert_eq!(cpu.pc(), 0x0004);

    // CALL NZ,0x1234 not taken still consumes its operand.
    let mut cpu = test_cpu(&[0xC4, 0x34, 0x12]);
    cpu.regs.f.zero = true;
    assert_eq!(step_cycles(&mut cpu), 12);
    assert_eq!(cpu.pc(), 0x0003);
    assert_eq!(cpu.sp(), 0xFFFE);

    // RET Z
    let mut cpu = test_cpu(&[0xC8, 0xC8]);
    assert_eq!(step_cycles(&mut cpu), 8);
    cpu.regs.f.zero = true;
    cpu.sp = 0xFFFC;
    cpu.bus_mut().memory[0xFFFC] = 0x00;
    cpu.bus_mut().memory[0xFFFD] = 0x20;
    assert_eq!(step_cycles(&mut cpu), 20);
    assert_eq!(cpu.pc(), 0x2000);

    // JP C,0x3000
    let mut cpu = test_cpu(&[0xDA, 0x00, 0x30]);
    cpu.regs.f.carry = true;
    assert_eq!(step_cycles(&mut cpu), 16);
    assert_eq!(cpu.pc(), 0x3000);
}

#[test]
fn jr_backwards_and_jp_hl() {
    // NOP; JR -3
    let mut cpu = test_cpu(&[0x00, 0x18, 0xFD]);
    step_cycles(&mut cpu);
    assert_eq!(step_cycles(&mut cpu), 12);
    assert_eq!(cpu.pc(), 0x0000);

    let mut cpu = test_cpu(&[0xE9]);
    cpu.regs.set_hl(0x4567);
    assert_eq!(step_cycles(&mut cpu), 4);
    assert_eq!(cpu.pc(), 0x4567);
}

#[test]
fn rst_pushes_return_address() {
    // NOP; RST 28H
    let mut cpu = test_cpu(&[0x00, 0xEF]);
    step_cycles(&mut cpu);
    assert_eq!(step_cycles(&mut cpu), 16);
    assert_eq!(cpu.pc(), 0x0028);
    assert_eq!(cpu.bus().memory[0xFFFC], 0x02);
}

#[test]
fn interrupt_dispatch_by_priority() {
    let mut cpu = test_cpu(&[]);
    cpu.pc = 0x1234;
    cpu.ime = true;
    cpu.bus_mut().memory[IE_ADDR as usize] = 0x1F;
    // VBlank and timer requested.
    cpu.bus_mut().memory[IF_ADDR as usize] = 0x05;

    assert_eq!(step_cycles(&mut cpu), 20);
    assert_eq!(cpu.pc(), 0x0040);
    assert_eq!(cpu.sp(), 0xFFFC);
    assert_eq!(cpu.bus().memory[0xFFFD], 0x12);
    assert_eq!(cpu.bus().memory[0xFFFC], 0x34);
    assert!(!cpu.ime());
    // Only the serviced bit is cleared; unused bits read as set.
    assert_eq!(cpu.bus().memory[IF_ADDR as usize], 0xE4);

    cpu.ime = true;
    assert_eq!(step_cycles(&mut cpu), 20);
    assert_eq!(cpu.pc(), 0x0050);
    assert_eq!(cpu.bus().memory[IF_ADDR as usize], 0xE0);
}

#[test]
fn interrupt_vectors() {
    for (bit, vector) in [(0x01, 0x40), (0x02, 0x48), (0x04, 0x50), (0x08, 0x58), (0x10, 0x60)] {
        let mut cpu = test_cpu(&[]);
        cpu.pc = 0x0200;
        cpu.ime = true;
        cpu.bus_mut().memory[IE_ADDR as usize] = 0x1F;
        cpu.bus_mut().memory[IF_ADDR as usize] = bit;

        step_cycles(&mut cpu);
        assert_eq!(cpu.pc(), vector, "IF bit 0x{bit:02X}");
    }
}

#[test]
fn disabled_interrupt_is_not_dispatched() {
    let mut cpu = test_cpu(&[0x00]);
    cpu.ime = true;
    cpu.bus_mut().memory[IE_ADDR as usize] = 0x01;
    cpu.bus_mut().memory[IF_ADDR as usize] = 0x04;

    assert_eq!(step_cycles(&mut cpu), 4);
    assert_eq!(cpu.pc(), 0x0001);
    assert!(cpu.ime());
}

#[test]
fn ei_takes_effect_after_next_instruction() {
    // EI; NOP; NOP
    let mut cpu = test_cpu(&[0xFB, 0x00, 0x00]);
    cpu.bus_mut().memory[IE_ADDR as usize] = 0x01;
    cpu.bus_mut().memory[IF_ADDR as usize] = 0x01;

    step_cycles(&mut cpu);
    assert_eq!(cpu.pc(), 0x0001);
    assert!(!cpu.ime());

    // The NOP after EI still runs.
    step_cycles(&mut cpu);
    assert_eq!(cpu.pc(), 0x0002);
    assert!(cpu.ime());

    assert_eq!(step_cycles(&mut cpu), 20);
    assert_eq!(cpu.pc(), 0x0040);
    assert_eq!(cpu.bus().memory[0xFFFC], 0x02);
}

#[test]
fn di_right_after_ei_keeps_interrupts_off() {
    // EI; DI; NOP
    let mut cpu = test_cpu(&[0xFB, 0xF3, 0x00]);
    cpu.bus_mut().memory[IE_ADDR as usize] = 0x01;
    cpu.bus_mut().memory[IF_ADDR as usize] = 0x01;

    step_cycles(&mut cpu);
    step_cycles(&mut cpu);
    assert!(!cpu.ime());
    step_cycles(&mut cpu);
    assert_eq!(cpu.pc(), 0x0003);
}

#[test]
fn reti_enables_interrupts_immediately() {
    let mut cpu = test_cpu(&[0xD9]);
    cpu.sp = 0xFFFC;
    cpu.bus_mut().memory[0xFFFC] = 0x00;
    cpu.bus_mut().memory[0xFFFD] = 0x02;

    assert_eq!(step_cycles(&mut cpu), 16);
    assert_eq!(cpu.pc(), 0x0200);
    assert!(cpu.ime());
}

#[test]
fn halt_wakes_on_pending_interrupt_with_ime_off() {
    // HALT; NOP
    let mut cpu = test_cpu(&[0x76, 0x00]);
    cpu.bus_mut().memory[IE_ADDR as usize] = 0x04;

    step_cycles(&mut cpu);
    assert!(cpu.is_halted());
    assert_eq!(cpu.pc(), 0x0001);

    assert_eq!(step_cycles(&mut cpu), 4);
    assert_eq!(cpu.pc(), 0x0001);

    cpu.bus_mut().memory[IF_ADDR as usize] = 0x04;
    step_cycles(&mut cpu);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.pc(), 0x0002);
    // Not dispatched, so the request stays.
    assert_eq!(cpu.bus().memory[IF_ADDR as usize], 0x04);
}

#[test]
fn stop_skips_padding_and_halts() {
    let mut cpu = test_cpu(&[0x10, 0x00, 0x00]);
    assert_eq!(step_cycles(&mut cpu), 4);
    assert_eq!(cpu.pc(), 0x0002);
    assert!(cpu.is_halted());
}

#[test]
fn unknown_opcode_leaves_pc_and_pauses() {
    let mut cpu = rom_cpu(&[0x00, 0xD3]);
    step_cycles(&mut cpu);

    let err = cpu.step().unwrap_err();
    assert_eq!(
        err,
        EmuError::Decode(DecodeError {
            opcode: 0xD3,
            prefixed: false,
            pc: 0x0101,
        })
    );
    assert_eq!(cpu.pc(), 0x0101);
    assert!(!cpu.is_running());

    let run = cpu.run_frame(&Breakpoints::new()).unwrap();
    assert!(matches!(run.stop, StopReason::Paused));
}

#[test]
fn write_to_cartridge_ram_is_a_bus_error() {
    // LD (0xA000),A
    let mut cpu = rom_cpu(&[0xEA, 0x00, 0xA0]);
    let err = cpu.step().unwrap_err();
    assert_eq!(err, EmuError::Bus(BusError::Unmapped(0xA000)));
    assert!(!cpu.is_running());
}

#[test]
fn breakpoint_pauses_before_the_instruction() {
    let mut cpu = rom_cpu(&[]);
    let breakpoints: Breakpoints = [0x0103].into_iter().collect();

    let run = cpu.run_frame(&breakpoints).unwrap();
    assert!(matches!(run.stop, StopReason::Breakpoint(0x0103)));
    assert_eq!(run.cycles, 12);
    assert_eq!(cpu.pc(), 0x0103);
    assert!(!cpu.is_running());

    let run = cpu.run_frame(&breakpoints).unwrap();
    assert!(matches!(run.stop, StopReason::Paused));
    assert_eq!(run.cycles, 0);

    // Resuming on a breakpoint executes it.
    cpu.unpause();
    let next: Breakpoints = [0x0103, 0x0105].into_iter().collect();
    let run = cpu.run_frame(&next).unwrap();
    assert!(matches!(run.stop, StopReason::Breakpoint(0x0105)));
    assert_eq!(run.cycles, 8);
}

#[test]
fn breakpoint_on_starting_pc_stops_before_running() {
    let mut cpu = rom_cpu(&[]);
    let breakpoints: Breakpoints = [0x0100].into_iter().collect();

    let run = cpu.run_frame(&breakpoints).unwrap();
    assert!(matches!(run.stop, StopReason::Breakpoint(0x0100)));
    assert_eq!(run.cycles, 0);
    assert_eq!(cpu.total_cycles(), 0);
}

#[test]
fn breakpoint_where_a_frame_ends_is_reported_by_the_next_run() {
    // All NOPs: find the PC the first frame leaves behind.
    let mut reference = rom_cpu(&[]);
    let run = reference.run_frame(&Breakpoints::new()).unwrap();
    assert!(matches!(run.stop, StopReason::FrameComplete(_)));
    let boundary = reference.pc();

    let mut cpu = rom_cpu(&[]);
    let breakpoints: Breakpoints = [boundary].into_iter().collect();

    let run = cpu.run_frame(&breakpoints).unwrap();
    assert!(matches!(run.stop, StopReason::FrameComplete(_)));
    assert_eq!(cpu.pc(), boundary);

    let run = cpu.run_frame(&breakpoints).unwrap();
    assert!(matches!(run.stop, StopReason::Breakpoint(pc) if pc == boundary));
    assert_eq!(run.cycles, 0);
    assert_eq!(cpu.pc(), boundary);
    assert!(!cpu.is_running());

    // Resuming steps over it and runs on to the next frame.
    cpu.unpause();
    let run = cpu.run_frame(&breakpoints).unwrap();
    assert!(matches!(run.stop, StopReason::FrameComplete(_)));
    assert_ne!(cpu.pc(), boundary);
}

#[test]
fn frame_completes_at_vblank() {
    // JR -2
    let mut cpu = rom_cpu(&[0x18, 0xFE]);

    let run = cpu.run_frame(&Breakpoints::new()).unwrap();
    match run.stop {
        StopReason::FrameComplete(frame) => {
            assert_eq!(
                frame.as_bytes().len(),
                crate::SCREEN_WIDTH * crate::SCREEN_HEIGHT * 4
            );
        }
        other => panic!("expected a frame, got {other:?}"),
    }
    assert!(run.cycles >= 144 * 456);
    assert!(run.cycles < CYCLES_PER_FRAME);
    assert_eq!(cpu.total_cycles(), run.cycles as u64);
}

#[test]
fn display_off_runs_into_max_clock_cycles() {
    let mut cpu = rom_cpu(&[0x18, 0xFE]);
    cpu.bus_mut().write(0xFF40, 0x00).unwrap();

    let run = cpu.run_frame(&Breakpoints::new()).unwrap();
    assert!(matches!(run.stop, StopReason::MaxClockCycles));
    assert!(run.cycles >= CYCLES_PER_FRAME);
    assert!(cpu.is_running());
}

#[test]
fn timer_interrupt_reaches_handler() {
    // LD A,0x04; LDH (0xFF),A; LD A,0x05; LDH (0x07),A; EI; HALT
    let mut cpu = rom_cpu(&[0x3E, 0x04, 0xE0, 0xFF, 0x3E, 0x05, 0xE0, 0x07, 0xFB, 0x76]);
    cpu.bus_mut().write(0xFF40, 0x00).unwrap();
    cpu.bus_mut().write(IF_ADDR, 0x00).unwrap();

    let mut serviced = false;
    for _ in 0..20_000 {
        cpu.step().unwrap();
        if cpu.pc() == 0x0050 {
            serviced = true;
            break;
        }
    }
    assert!(serviced, "timer interrupt never dispatched");
    assert!(!cpu.ime());
}

#[test]
fn straight_line_instructions_advance_pc_by_their_length() {
    use super::instruction::CbOp;

    for opcode in 0..=0xFFu8 {
        let Some(instruction) = Instruction::from_byte(opcode) else {
            continue;
        };
        let branches = matches!(
            instruction,
            Instruction::Jp(_)
                | Instruction::JpHl
                | Instruction::Jr(_)
                | Instruction::Call(_)
                | Instruction::Ret(_)
                | Instruction::Reti
                | Instruction::Rst(_)
        );
        if branches {
            continue;
        }

        let mut cpu = test_cpu(&[opcode, 0x00, 0x00]);
        cpu.regs.set_hl(0xC000);
        cpu.step().unwrap();
        assert_eq!(cpu.pc(), instruction.length(), "{instruction}");
    }

    for opcode in 0..=0xFFu8 {
        let instruction = Instruction::from_prefixed_byte(opcode);
        let mut cpu = test_cpu(&[decode::PREFIX, opcode]);
        cpu.regs.set_hl(0xC000);
        cpu.step().unwrap();
        assert_eq!(cpu.pc(), instruction.length(), "{instruction}");
        if let Instruction::Prefixed(CbOp::Bit(_), _) = instruction {
            assert!(cpu.regs.f.half_carry);
        }
    }
}

#[test]
fn halt_waiting_for_enabled_vblank_runs_to_frame_end() {
    let mut cpu = rom_cpu(&[
        0xAF, // XOR A
        0xE0, 0x0F, // LDH (IF),A
        0x3E, 0x01, // LD A,0x01
        0xE0, 0xFF, // LDH (IE),A
        0xF3, // DI
        0x76, // HALT
        0x18, 0xFE, // JR -2
    ]);
    let run = cpu.run_frame(&Breakpoints::new()).unwrap();
    assert!(matches!(run.stop, StopReason::FrameComplete(_)));
    assert!(run.cycles > 4);
}
