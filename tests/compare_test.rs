//! CMP, CPX and CPY.
//!
//! Negative reports `register < operand`, not bit 7 of the difference.

use mos6502_engine::{Cpu, Flag};
use proptest::prelude::*;

fn setup_cpu() -> Cpu {
    let mut cpu = Cpu::new();
    cpu.poke(0xFFFC, 0x00);
    cpu.poke(0xFFFD, 0x80);
    cpu.reset();
    return cpu
}

fn compare_immediate(opcode: u8, register: u8, operand: u8) -> Cpu {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[opcode, operand]);
    cpu.set_ac(register);
    cpu.set_x(register);
    cpu.set_y(register);
    cpu.step().unwrap();
    return cpu
}

#[test]
fn test_cmp_equal() {
    let cpu = compare_immediate(0xC9, 0x42, 0x42);
    assert!(cpu.flag(Flag::Carry));
    assert!(cpu.flag(Flag::Zero));
    assert!(!cpu.flag(Flag::Negative));
}

#[test]
fn test_cmp_greater() {
    let cpu = compare_immediate(0xC9, 0x50, 0x10);
    assert!(cpu.flag(Flag::Carry));
    assert!(!cpu.flag(Flag::Zero));
    assert!(!cpu.flag(Flag::Negative));
}

#[test]
fn test_cmp_less() {
    let cpu = compare_immediate(0xC9, 0x10, 0x50);
    assert!(!cpu.flag(Flag::Carry));
    assert!(!cpu.flag(Flag::Zero));
    assert!(cpu.flag(Flag::Negative));
}

#[test]
fn test_cmp_greater_with_high_bit_difference() {
    // 0xFF - 0x01 = 0xFE has bit 7 set but the register is larger
    let cpu = compare_immediate(0xC9, 0xFF, 0x01);
    assert!(cpu.flag(Flag::Carry));
    assert!(!cpu.flag(Flag::Negative));
}

#[test]
fn test_compare_leaves_register_and_overflow() {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[0xC9, 0x01]);
    cpu.set_ac(0x80);
    cpu.set_flag(Flag::Overflow, true);
    cpu.step().unwrap();
    assert_eq!(cpu.ac(), 0x80);
    assert!(cpu.flag(Flag::Overflow));
}

#[test]
fn test_cpx_zero_page() {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[0xE4, 0x20]);
    cpu.poke(0x0020, 0x07);
    cpu.set_x(0x07);

    let decoded = cpu.step().unwrap();

    assert!(cpu.flag(Flag::Zero));
    assert!(cpu.flag(Flag::Carry));
    assert_eq!(decoded.cycles, 3);
}

#[test]
fn test_cpy_absolute() {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[0xCC, 0x00, 0x30]);
    cpu.poke(0x3000, 0x09);
    cpu.set_y(0x08);

    let decoded = cpu.step().unwrap();

    assert!(cpu.flag(Flag::Negative));
    assert!(!cpu.flag(Flag::Carry));
    assert_eq!(decoded.cycles, 4);
}

#[test]
fn test_cmp_absolute_y_page_cross() {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[0xD9, 0xFF, 0x30]);
    cpu.poke(0x3100, 0x01);
    cpu.set_y(0x01);
    cpu.set_ac(0x01);

    let decoded = cpu.step().unwrap();

    assert!(cpu.flag(Flag::Zero));
    assert_eq!(decoded.cycles, 5);
}

proptest! {
    #[test]
    fn prop_compare_flags(register in 0u8..=255u8, operand in 0u8..=255u8, opcode in prop::sample::select(vec![0xC9u8, 0xE0, 0xC0])) {
        let cpu = compare_immediate(opcode, register, operand);

        prop_assert_eq!(cpu.flag(Flag::Carry), register >= operand);
        prop_assert_eq!(cpu.flag(Flag::Zero), register == operand);
        prop_assert_eq!(cpu.flag(Flag::Negative), register < operand);
    }
}
