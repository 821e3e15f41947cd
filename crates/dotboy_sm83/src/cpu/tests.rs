use std::cell::RefCell;
use std::rc::Rc;

use super::*;

struct TestBus {
    memory: [u8; 0x10000],
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
        }
    }
}

impl TestBus {
    fn with_program(addr: u16, program: &[u8]) -> Self {
        let mut bus = Self::default();
        bus.load(addr, program);
        bus
    }

    fn load(&mut self, addr: u16, bytes: &[u8]) {
        let start = addr as usize;
        self.memory[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }
}

/// Controller with at most one outstanding request.
#[derive(Default)]
struct OneShotInterrupt {
    vector: Option<u16>,
    acknowledged: u32,
}

impl InterruptController for OneShotInterrupt {
    fn pending(&mut self) -> bool {
        self.vector.is_some()
    }

    fn acknowledge(&mut self) -> Option<u16> {
        self.acknowledged += 1;
        self.vector.take()
    }
}

fn step_ok(cpu: &mut Cpu, bus: &mut TestBus) -> u32 {
    cpu.step(bus).expect("step should not fault")
}

#[test]
fn power_on_state_matches_dmg_boot_handoff() {
    let cpu = Cpu::new();

    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.regs.bc(), 0x0013);
    assert_eq!(cpu.regs.de(), 0x00D8);
    assert_eq!(cpu.regs.hl(), 0x014D);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.regs.pc, 0x0100);
    assert!(!cpu.ime);
    assert!(!cpu.halted);
    assert_eq!(cpu.fault(), None);
    assert_eq!(cpu.cycle_model(), CycleModel::Fixed);
}

#[test]
fn nop_advances_pc() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0x00]);

    let cycles = step_ok(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.pc, 0x0101);
    assert_eq!(cycles, 4);
}

#[test]
fn ld_a_immediate() {
    let mut cpu = Cpu::new();
    // LD A, 0x42
    let mut bus = TestBus::with_program(0x0100, &[0x3E, 0x42]);

    let cycles = step_ok(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.a(), 0x42);
    assert_eq!(cpu.regs.pc, 0x0102);
    assert_eq!(cycles, 8);
}

#[test]
fn ld_16bit_and_basic_ld_indirect_work() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: LD BC, 0xC234
    // 0x0103: LD (BC), A
    // 0x0104: LD A, (BC)
    let mut bus = TestBus::with_program(0x0100, &[0x01, 0x34, 0xC2, 0x02, 0x0A]);
    cpu.regs.set_a(0xAB);

    assert_eq!(step_ok(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.bc(), 0xC234);
    assert_eq!(cpu.regs.pc, 0x0103);

    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(bus.memory[0xC234], 0xAB);

    cpu.regs.set_a(0x00);
    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a(), 0xAB);
}

#[test]
fn ld_r_r_and_hl_inc_dec_forms_work() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: LD B, A
    // 0x0101: LD (HL+), A
    // 0x0102: LD (HL-), A
    // 0x0103: LD A, (HL-)
    // 0x0104: LD (HL), B
    let mut bus = TestBus::with_program(0x0100, &[0x47, 0x22, 0x32, 0x3A, 0x70]);
    cpu.regs.set_a(0x5A);
    cpu.regs.set_hl(0xC000);

    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.b(), 0x5A);

    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(bus.memory[0xC000], 0x5A);
    assert_eq!(cpu.regs.hl(), 0xC001);

    cpu.regs.set_a(0x77);
    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(bus.memory[0xC001], 0x77);
    assert_eq!(cpu.regs.hl(), 0xC000);

    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a(), 0x5A);
    assert_eq!(cpu.regs.hl(), 0xBFFF);

    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(bus.memory[0xBFFF], 0x5A);
}

#[test]
fn ldh_forms_address_the_high_page() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: LDH (0x80), A
    // 0x0102: LDH A, (0x81)
    // 0x0104: LD (C), A
    // 0x0105: LD A, (C)
    let mut bus = TestBus::with_program(0x0100, &[0xE0, 0x80, 0xF0, 0x81, 0xE2, 0xF2]);
    bus.memory[0xFF81] = 0x99;
    bus.memory[0xFF10] = 0x3C;
    cpu.regs.set_a(0x5A);
    cpu.regs.set_c(0x90);

    assert_eq!(step_ok(&mut cpu, &mut bus), 12);
    assert_eq!(bus.memory[0xFF80], 0x5A);

    assert_eq!(step_ok(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.a(), 0x99);

    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(bus.memory[0xFF90], 0x99);

    cpu.regs.set_c(0x10);
    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a(), 0x3C);
}

#[test]
fn absolute_loads_and_sp_store() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: LD (0xC010), A
    // 0x0103: LD A, (0xC020)
    // 0x0106: LD (0xC030), SP
    let mut bus = TestBus::with_program(
        0x0100,
        &[0xEA, 0x10, 0xC0, 0xFA, 0x20, 0xC0, 0x08, 0x30, 0xC0],
    );
    bus.memory[0xC020] = 0x44;
    cpu.regs.set_a(0x11);
    cpu.regs.sp = 0xBEEF;

    assert_eq!(step_ok(&mut cpu, &mut bus), 16);
    assert_eq!(bus.memory[0xC010], 0x11);

    assert_eq!(step_ok(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.a(), 0x44);

    assert_eq!(step_ok(&mut cpu, &mut bus), 20);
    assert_eq!(bus.memory[0xC030], 0xEF);
    assert_eq!(bus.memory[0xC031], 0xBE);
}

#[test]
fn sub_sets_only_negative() {
    let mut cpu = Cpu::new();
    // SUB B
    let mut bus = TestBus::with_program(0x0100, &[0x90]);
    cpu.regs.set_a(0x3C);
    cpu.regs.set_b(0x2A);

    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.a(), 0x12);
    assert_eq!(cpu.regs.flags(), Flags::NEGATIVE);
}

#[test]
fn add_register_sets_half_carry_and_carry() {
    let mut cpu = Cpu::new();
    // ADD A, B
    let mut bus = TestBus::with_program(0x0100, &[0x80]);
    cpu.regs.set_a(0xF8);
    cpu.regs.set_b(0x08);

    step_ok(&mut cpu, &mut bus);

    assert_eq!(cpu.regs.a(), 0x00);
    assert_eq!(
        cpu.regs.flags(),
        Flags::ZERO | Flags::HALF_CARRY | Flags::CARRY
    );
}

#[test]
fn alu_on_hl_memory_and_immediate() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: XOR (HL)
    // 0x0101: CP 0x0F
    let mut bus = TestBus::with_program(0x0100, &[0xAE, 0xFE, 0x0F]);
    bus.memory[0xC000] = 0xFF;
    cpu.regs.set_hl(0xC000);
    cpu.regs.set_a(0xF0);

    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a(), 0x0F);
    assert_eq!(cpu.regs.flags(), Flags::empty());

    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a(), 0x0F);
    assert_eq!(cpu.regs.flags(), Flags::ZERO | Flags::NEGATIVE);
}

#[test]
fn inc_dec_8bit_update_flags_and_preserve_c() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: INC B
    // 0x0101: DEC B
    // 0x0102: INC (HL)
    let mut bus = TestBus::with_program(0x0100, &[0x04, 0x05, 0x34]);
    bus.memory[0xC000] = 0x0F;
    cpu.regs.set_hl(0xC000);
    cpu.regs.set_b(0xFF);
    cpu.regs.set_flags(Flags::CARRY);

    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.b(), 0x00);
    assert_eq!(
        cpu.regs.flags(),
        Flags::ZERO | Flags::HALF_CARRY | Flags::CARRY
    );

    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.b(), 0xFF);
    assert_eq!(
        cpu.regs.flags(),
        Flags::NEGATIVE | Flags::HALF_CARRY | Flags::CARRY
    );

    assert_eq!(step_ok(&mut cpu, &mut bus), 12);
    assert_eq!(bus.memory[0xC000], 0x10);
    assert_eq!(cpu.regs.flags(), Flags::HALF_CARRY | Flags::CARRY);
}

#[test]
fn inc_dec_16bit_leave_flags_alone() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: INC DE
    // 0x0101: DEC SP
    let mut bus = TestBus::with_program(0x0100, &[0x13, 0x3B]);
    cpu.regs.set_de(0xFFFF);
    cpu.regs.sp = 0x0000;
    let before = cpu.regs.flags();

    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.de(), 0x0000);

    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.sp, 0xFFFF);
    assert_eq!(cpu.regs.flags(), before);
}

#[test]
fn add_hl_keeps_zero_and_sets_carries() {
    let mut cpu = Cpu::new();
    // ADD HL, BC
    let mut bus = TestBus::with_program(0x0100, &[0x09]);
    cpu.regs.set_hl(0x8FFF);
    cpu.regs.set_bc(0x8001);
    cpu.regs.set_flags(Flags::ZERO | Flags::NEGATIVE);

    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert_eq!(
        cpu.regs.flags(),
        Flags::ZERO | Flags::HALF_CARRY | Flags::CARRY
    );
}

#[test]
fn add_sp_r8_signed_and_flags() {
    let mut cpu = Cpu::new();
    // ADD SP, +8
    let mut bus = TestBus::with_program(0x0100, &[0xE8, 0x08]);
    cpu.regs.sp = 0xFFF8;

    assert_eq!(step_ok(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.sp, 0x0000);
    // Z is always cleared, carries come from the low byte.
    assert_eq!(cpu.regs.flags(), Flags::HALF_CARRY | Flags::CARRY);
}

#[test]
fn ld_hl_sp_plus_r8_and_ld_sp_hl() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: LD HL, SP-2
    // 0x0102: LD SP, HL
    let mut bus = TestBus::with_program(0x0100, &[0xF8, 0xFE, 0xF9]);
    cpu.regs.sp = 0x0005;

    assert_eq!(step_ok(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.hl(), 0x0003);
    assert_eq!(cpu.regs.sp, 0x0005);
    assert_eq!(cpu.regs.flags(), Flags::HALF_CARRY | Flags::CARRY);

    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.sp, 0x0003);
}

#[test]
fn push_and_pop_roundtrip_and_pop_af_masks_low_flags() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: PUSH BC
    // 0x0101: POP DE
    // 0x0102: POP AF
    let mut bus = TestBus::with_program(0x0100, &[0xC5, 0xD1, 0xF1]);
    cpu.regs.set_bc(0x1234);

    assert_eq!(step_ok(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.memory[0xFFFD], 0x12);
    assert_eq!(bus.memory[0xFFFC], 0x34);

    assert_eq!(step_ok(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.de(), 0x1234);
    assert_eq!(cpu.regs.sp, 0xFFFE);

    // Stack holds AF = 0x123F; the low nibble of F must not survive.
    cpu.regs.sp = 0xFFFC;
    bus.memory[0xFFFC] = 0x3F;
    bus.memory[0xFFFD] = 0x12;

    assert_eq!(step_ok(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.a(), 0x12);
    assert_eq!(cpu.regs.f(), 0x30);
    assert_eq!(cpu.regs.af(), 0x1230);
}

#[test]
fn jp_absolute_and_jp_hl() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: JP 0x0200
    // 0x0200: JP (HL)
    let mut bus = TestBus::with_program(0x0100, &[0xC3, 0x00, 0x02]);
    bus.load(0x0200, &[0xE9]);
    cpu.regs.set_hl(0x0300);

    assert_eq!(step_ok(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0200);

    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0300);
}

#[test]
fn jr_relative_forward_and_backward() {
    let mut cpu = Cpu::new();
    // 0x0100: JR +2
    let mut bus = TestBus::with_program(0x0100, &[0x18, 0x02]);

    assert_eq!(step_ok(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0104);

    // 0x0110: JR -2 lands back on itself.
    bus.load(0x0110, &[0x18, 0xFE]);
    cpu.regs.pc = 0x0110;
    assert_eq!(step_ok(&mut cpu, &mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0110);
}

#[test]
fn jr_wraps_around_the_address_space() {
    let mut cpu = Cpu::new();
    // 0xFFFE: JR +2, PC after the operand is 0x0000.
    let mut bus = TestBus::with_program(0xFFFE, &[0x18, 0x02]);
    cpu.regs.pc = 0xFFFE;

    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 0x0002);

    // 0x0000: JR -3 wraps the other way.
    bus.load(0x0000, &[0x18, 0xFD]);
    cpu.regs.pc = 0x0000;
    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.pc, 0xFFFF);
}

#[test]
fn conditional_jr_uses_flags() {
    let mut cpu = Cpu::new();
    // JR NZ, +2
    let mut bus = TestBus::with_program(0x0100, &[0x20, 0x02]);

    cpu.regs.set_flags(Flags::ZERO);
    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.pc, 0x0102);

    // Taken, but the fixed model still charges the base cost.
    cpu.regs.pc = 0x0100;
    cpu.regs.set_flags(Flags::empty());
    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.pc, 0x0104);
}

#[test]
fn branch_accurate_model_charges_taken_branches() {
    let mut cpu = Cpu::new().with_cycle_model(CycleModel::BranchAccurate);
    // Program:
    // 0x0100: JR C, +0
    // 0x0102: JP C, 0x0110
    // 0x0110: CALL C, 0x0120
    // 0x0120: RET C
    let mut bus = TestBus::with_program(0x0100, &[0x38, 0x00, 0xDA, 0x10, 0x01]);
    bus.load(0x0110, &[0xDC, 0x20, 0x01]);
    bus.load(0x0120, &[0xD8]);
    cpu.regs.set_flags(Flags::CARRY);

    assert_eq!(step_ok(&mut cpu, &mut bus), 12);
    assert_eq!(step_ok(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0110);
    assert_eq!(step_ok(&mut cpu, &mut bus), 24);
    assert_eq!(cpu.regs.pc, 0x0120);
    assert_eq!(step_ok(&mut cpu, &mut bus), 20);
    assert_eq!(cpu.regs.pc, 0x0113);

    // Not taken: base cost.
    cpu.regs.set_flags(Flags::empty());
    cpu.regs.pc = 0x0120;
    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.pc, 0x0121);
}

#[test]
fn call_pushes_return_address() {
    let mut cpu = Cpu::new();
    // 0x0100: CALL 0x0150
    let mut bus = TestBus::with_program(0x0100, &[0xCD, 0x50, 0x01]);

    assert_eq!(step_ok(&mut cpu, &mut bus), 24);
    assert_eq!(cpu.regs.pc, 0x0150);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.memory[0xFFFD], 0x01);
    assert_eq!(bus.memory[0xFFFC], 0x03);
}

#[test]
fn call_and_ret_roundtrip() {
    let mut cpu = Cpu::new();
    // 0x0100: CALL 0x0200
    // 0x0200: RET
    let mut bus = TestBus::with_program(0x0100, &[0xCD, 0x00, 0x02]);
    bus.load(0x0200, &[0xC9]);

    step_ok(&mut cpu, &mut bus);
    assert_eq!(step_ok(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0103);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn rst_jumps_to_fixed_vector() {
    let mut cpu = Cpu::new();
    // 0x0100: RST 38h
    let mut bus = TestBus::with_program(0x0100, &[0xFF]);

    assert_eq!(step_ok(&mut cpu, &mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0038);
    assert_eq!(bus.memory[0xFFFD], 0x01);
    assert_eq!(bus.memory[0xFFFC], 0x01);
}

#[test]
fn ei_di_and_reti_toggle_ime() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: EI
    // 0x0101: DI
    // 0x0102: RETI
    let mut bus = TestBus::with_program(0x0100, &[0xFB, 0xF3, 0xD9]);
    cpu.regs.sp = 0xFFFC;
    bus.memory[0xFFFC] = 0x34;
    bus.memory[0xFFFD] = 0x12;

    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert!(cpu.ime);

    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert!(!cpu.ime);

    assert_eq!(step_ok(&mut cpu, &mut bus), 16);
    assert!(cpu.ime);
    assert_eq!(cpu.regs.pc, 0x1234);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn daa_cpl_scf_ccf_behaviour() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: ADD A, 0x27
    // 0x0102: DAA
    // 0x0103: CPL
    // 0x0104: SCF
    // 0x0105: CCF
    let mut bus = TestBus::with_program(0x0100, &[0xC6, 0x27, 0x27, 0x2F, 0x37, 0x3F]);
    cpu.regs.set_a(0x15);

    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a(), 0x3C);

    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.a(), 0x42);
    assert_eq!(cpu.regs.flags(), Flags::empty());

    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a(), 0xBD);
    assert_eq!(cpu.regs.flags(), Flags::NEGATIVE | Flags::HALF_CARRY);

    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.flags(), Flags::CARRY);

    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.flags(), Flags::empty());
}

#[test]
fn adc_and_sbc_consume_carry() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: ADC A, B
    // 0x0101: SBC A, 0x0F
    // 0x0103: ADC A, 0x00
    let mut bus = TestBus::with_program(0x0100, &[0x88, 0xDE, 0x0F, 0xCE, 0x00]);
    cpu.regs.set_a(0x0E);
    cpu.regs.set_b(0x01);
    cpu.regs.set_flags(Flags::CARRY);

    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.a(), 0x10);
    assert_eq!(cpu.regs.flags(), Flags::HALF_CARRY);

    cpu.regs.set_flags(Flags::CARRY);
    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a(), 0x00);
    assert_eq!(
        cpu.regs.flags(),
        Flags::ZERO | Flags::NEGATIVE | Flags::HALF_CARRY
    );

    cpu.regs.set_a(0xFF);
    cpu.regs.set_flags(Flags::CARRY);
    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a(), 0x00);
    assert_eq!(
        cpu.regs.flags(),
        Flags::ZERO | Flags::HALF_CARRY | Flags::CARRY
    );
}

#[test]
fn daa_adjusts_after_adc_and_sbc() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: ADC A, 0x27
    // 0x0102: DAA
    // 0x0103: SBC A, 0x01
    // 0x0105: DAA
    let mut bus = TestBus::with_program(0x0100, &[0xCE, 0x27, 0x27, 0xDE, 0x01, 0x27]);
    cpu.regs.set_a(0x15);
    cpu.regs.set_flags(Flags::CARRY);

    // 15 + 27 + 1 = 43 in BCD.
    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a(), 0x3D);
    assert_eq!(cpu.regs.flags(), Flags::empty());
    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.a(), 0x43);
    assert_eq!(cpu.regs.flags(), Flags::empty());

    // 10 - 01 - 1 = 08 in BCD.
    cpu.regs.set_a(0x10);
    cpu.regs.set_flags(Flags::CARRY);
    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a(), 0x0E);
    assert_eq!(cpu.regs.flags(), Flags::NEGATIVE | Flags::HALF_CARRY);
    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.a(), 0x08);
    assert_eq!(cpu.regs.flags(), Flags::NEGATIVE);
}

#[test]
fn rlca_rrca_rla_rra_clear_zero() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: RLCA
    // 0x0101: RRCA
    // 0x0102: RLA
    // 0x0103: RRA
    let mut bus = TestBus::with_program(0x0100, &[0x07, 0x0F, 0x17, 0x1F]);
    cpu.regs.set_a(0x80);
    cpu.regs.set_flags(Flags::ZERO);

    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a(), 0x01);
    assert_eq!(cpu.regs.flags(), Flags::CARRY);

    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a(), 0x80);
    assert_eq!(cpu.regs.flags(), Flags::CARRY);

    // RLA shifts the old carry into bit 0.
    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a(), 0x01);
    assert_eq!(cpu.regs.flags(), Flags::CARRY);

    // A becomes zero but Z stays clear.
    cpu.regs.set_flags(Flags::empty());
    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.a(), 0x00);
    assert_eq!(cpu.regs.flags(), Flags::CARRY);
}

#[test]
fn cb_swap_and_rlc() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: SWAP A
    // 0x0102: RLC B
    let mut bus = TestBus::with_program(0x0100, &[0xCB, 0x37, 0xCB, 0x00]);
    cpu.regs.set_a(0xF1);
    cpu.regs.set_b(0x00);

    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.a(), 0x1F);
    assert_eq!(cpu.regs.flags(), Flags::empty());
    assert_eq!(cpu.regs.pc, 0x0102);

    // Unlike RLCA, the prefixed rotate reports a zero result.
    assert_eq!(step_ok(&mut cpu, &mut bus), 8);
    assert_eq!(cpu.regs.b(), 0x00);
    assert_eq!(cpu.regs.flags(), Flags::ZERO);
}

#[test]
fn cb_bit_res_set_on_hl() {
    let mut cpu = Cpu::new();
    // Program:
    // 0x0100: BIT 0, (HL)
    // 0x0102: SET 0, (HL)
    // 0x0104: BIT 0, (HL)
    // 0x0106: RES 7, (HL)
    let mut bus = TestBus::with_program(0x0100, &[0xCB, 0x46, 0xCB, 0xC6, 0xCB, 0x46, 0xCB, 0xBE]);
    bus.memory[0xC000] = 0x80;
    cpu.regs.set_hl(0xC000);
    cpu.regs.set_flags(Flags::CARRY);

    assert_eq!(step_ok(&mut cpu, &mut bus), 12);
    assert_eq!(
        cpu.regs.flags(),
        Flags::ZERO | Flags::HALF_CARRY | Flags::CARRY
    );

    assert_eq!(step_ok(&mut cpu, &mut bus), 16);
    assert_eq!(bus.memory[0xC000], 0x81);

    step_ok(&mut cpu, &mut bus);
    assert_eq!(cpu.regs.flags(), Flags::HALF_CARRY | Flags::CARRY);

    assert_eq!(step_ok(&mut cpu, &mut bus), 16);
    assert_eq!(bus.memory[0xC000], 0x01);
    // RES leaves flags untouched.
    assert_eq!(cpu.regs.flags(), Flags::HALF_CARRY | Flags::CARRY);
}

#[test]
fn stop_consumes_padding_byte() {
    let mut cpu = Cpu::new();
    // 0x0100: STOP 0x00
    let mut bus = TestBus::with_program(0x0100, &[0x10, 0x00]);

    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0102);
    assert!(!cpu.halted);
}

#[test]
fn halt_idles_until_woken() {
    let mut cpu = Cpu::new();
    // 0x0100: HALT
    let mut bus = TestBus::with_program(0x0100, &[0x76, 0x3C]);

    assert_eq!(step_ok(&mut cpu, &mut bus), 4);
    assert!(cpu.halted);
    assert_eq!(cpu.regs.pc, 0x0101);

    for _ in 0..3 {
        assert_eq!(step_ok(&mut cpu, &mut bus), 4);
        assert_eq!(cpu.regs.pc, 0x0101);
    }
}

#[test]
fn undefined_opcode_locks_until_reset() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::with_program(0x0100, &[0xD3]);
    let expected = CpuError::UndefinedOpcode {
        opcode: 0xD3,
        pc: 0x0100,
    };

    assert_eq!(cpu.step(&mut bus), Err(expected));
    assert_eq!(cpu.fault(), Some(expected));

    // Later steps keep failing and leave the CPU untouched.
    let regs = cpu.regs;
    assert_eq!(cpu.step(&mut bus), Err(expected));
    assert_eq!(cpu.regs, regs);

    cpu.reset();
    assert_eq!(cpu.fault(), None);
    assert_eq!(cpu.regs.pc, 0x0100);
    assert_eq!(expected.to_string(), "undefined opcode 0xD3 at PC=0x0100");
}

#[test]
fn every_hole_in_the_primary_table_faults() {
    for opcode in [0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD] {
        let mut cpu = Cpu::new();
        let mut bus = TestBus::with_program(0x0100, &[opcode]);
        let result = cpu.step(&mut bus);
        assert!(
            matches!(result, Err(CpuError::UndefinedOpcode { opcode: o, .. }) if o == opcode),
            "opcode {opcode:#04x} should fault"
        );
    }
}

#[test]
fn tracer_sees_each_step() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);

    let mut cpu = Cpu::new();
    cpu.set_tracer(move |event: &TraceEvent| sink.borrow_mut().push(*event));
    // Program:
    // 0x0100: LD A, 0x42
    // 0x0102: BIT 7, A
    // 0x0104: HALT
    let mut bus = TestBus::with_program(0x0100, &[0x3E, 0x42, 0xCB, 0x7F, 0x76]);

    for _ in 0..4 {
        step_ok(&mut cpu, &mut bus);
    }

    let events = events.borrow();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].pc, 0x0100);
    assert_eq!(events[0].kind, StepKind::Instruction(Opcode::Primary(0x3E)));
    assert_eq!(events[0].registers.a(), 0x42);
    assert_eq!(events[0].cycles, 8);
    assert_eq!(
        events[1].kind,
        StepKind::Instruction(Opcode::Extended(0x7F))
    );
    assert_eq!(events[2].kind, StepKind::Instruction(Opcode::Primary(0x76)));
    assert_eq!(events[3].kind, StepKind::Halted);
    assert_eq!(events[3].pc, 0x0105);

    let line = events[0].to_string();
    assert!(
        line.starts_with("0100  3E"),
        "unexpected trace line {line:?}"
    );
}

#[test]
fn pending_interrupt_wakes_halt_without_ime() {
    let mut cpu = Cpu::new();
    // 0x0100: HALT
    // 0x0101: INC A
    let mut bus = TestBus::with_program(0x0100, &[0x76, 0x3C]);
    let mut irq = OneShotInterrupt::default();
    cpu.regs.set_a(0x00);

    step_ok(&mut cpu, &mut bus);
    assert!(cpu.halted);

    // Nothing pending: still idling.
    assert_eq!(cpu.step_with_interrupts(&mut bus, &mut irq), Ok(4));
    assert!(cpu.halted);

    // Pending with IME clear: resume after HALT without dispatching.
    irq.vector = Some(0x0040);
    assert_eq!(cpu.step_with_interrupts(&mut bus, &mut irq), Ok(4));
    assert!(!cpu.halted);
    assert_eq!(cpu.regs.a(), 0x01);
    assert_eq!(cpu.regs.pc, 0x0102);
    assert_eq!(irq.acknowledged, 0);
}

#[test]
fn interrupt_dispatch_pushes_pc_and_clears_ime() {
    let mut cpu = Cpu::new();
    // 0x0100: EI
    // 0x0101: HALT
    let mut bus = TestBus::with_program(0x0100, &[0xFB, 0x76]);
    let mut irq = OneShotInterrupt::default();

    step_ok(&mut cpu, &mut bus);
    step_ok(&mut cpu, &mut bus);
    assert!(cpu.halted && cpu.ime);

    irq.vector = Some(0x0050);
    assert_eq!(cpu.step_with_interrupts(&mut bus, &mut irq), Ok(20));
    assert!(!cpu.halted);
    assert!(!cpu.ime);
    assert_eq!(cpu.regs.pc, 0x0050);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.memory[0xFFFD], 0x01);
    assert_eq!(bus.memory[0xFFFC], 0x02);
    assert_eq!(irq.acknowledged, 1);
}

#[test]
fn reset_keeps_cycle_model() {
    let mut cpu = Cpu::new().with_cycle_model(CycleModel::BranchAccurate);
    let mut bus = TestBus::with_program(0x0100, &[0x3E, 0x42, 0x76]);

    step_ok(&mut cpu, &mut bus);
    step_ok(&mut cpu, &mut bus);
    assert!(cpu.halted);

    cpu.reset();
    assert!(!cpu.halted);
    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.regs.pc, 0x0100);
    assert_eq!(cpu.cycle_model(), CycleModel::BranchAccurate);
}
