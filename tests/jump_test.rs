//! JMP, JSR and RTS.

use mos6502_engine::Cpu;
use proptest::prelude::*;

fn setup_cpu() -> Cpu {
    let mut cpu = Cpu::new();
    cpu.poke(0xFFFC, 0x00);
    cpu.poke(0xFFFD, 0x80);
    cpu.reset();
    return cpu
}

#[test]
fn test_jmp_absolute() {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[0x4C, 0x00, 0x90]);

    let decoded = cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x9000);
    assert_eq!(decoded.cycles, 3);
}

#[test]
fn test_jmp_indirect() {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[0x6C, 0x00, 0x30]);
    cpu.load(0x3000, &[0x34, 0x12]);

    let decoded = cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x1234);
    assert_eq!(decoded.cycles, 5);
}

#[test]
fn test_jmp_indirect_reads_across_page_boundary() {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[0x6C, 0xFF, 0x30]);
    cpu.poke(0x30FF, 0x34);
    cpu.poke(0x3100, 0x12);
    cpu.poke(0x3000, 0x56);

    cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x1234);
}

#[test]
fn test_jsr_pushes_return_address_minus_one() {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[0x20, 0x00, 0x90]);

    let decoded = cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x9000);
    assert_eq!(cpu.peek(0x01FD), 0x80);
    assert_eq!(cpu.peek(0x01FC), 0x02);
    assert_eq!(cpu.sp(), 0xFB);
    assert_eq!(decoded.cycles, 6);
}

#[test]
fn test_rts_returns_after_the_call() {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[0x20, 0x00, 0x90, 0xEA]);
    cpu.load(0x9000, &[0x60]);

    cpu.step().unwrap();
    let decoded = cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(cpu.sp(), 0xFD);
    assert_eq!(decoded.cycles, 6);
}

#[test]
fn test_nested_subroutines() {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[0x20, 0x00, 0x90, 0xEA]);
    cpu.load(0x9000, &[0x20, 0x00, 0xA0, 0x60]);
    cpu.load(0xA000, &[0xE8, 0x60]);

    for _ in 0..5 {
        cpu.step().unwrap();
    }

    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(cpu.x(), 1);
    assert_eq!(cpu.sp(), 0xFD);
}

proptest! {
    #[test]
    fn prop_jsr_rts_returns_to_next_instruction(
        caller in 0x0200u16..0xF000,
        target in 0x0200u16..0xF000,
    ) {
        prop_assume!(target < caller || target >= caller + 3);

        let mut cpu = setup_cpu();
        let [target_lo, target_hi] = target.to_le_bytes();
        cpu.load(caller, &[0x20, target_lo, target_hi]);
        cpu.poke(target, 0x60);
        cpu.set_pc(caller);

        cpu.step().unwrap();
        prop_assert_eq!(cpu.pc(), target);

        cpu.step().unwrap();
        prop_assert_eq!(cpu.pc(), caller + 3);
        prop_assert_eq!(cpu.sp(), 0xFD);
    }
}
