//! Flag set/clear instructions and NOP.

use mos6502_engine::{Cpu, Flag, ProcessorStatus};

fn setup_cpu() -> Cpu {
    let mut cpu = Cpu::new();
    cpu.poke(0xFFFC, 0x00);
    cpu.poke(0xFFFD, 0x80);
    cpu.reset();
    return cpu
}

#[test]
fn test_set_and_clear_each_flag() {
    let cases = [
        (0x38, Flag::Carry, true),
        (0x18, Flag::Carry, false),
        (0xF8, Flag::Decimal, true),
        (0xD8, Flag::Decimal, false),
        (0x78, Flag::InterruptDisable, true),
        (0x58, Flag::InterruptDisable, false),
        (0xB8, Flag::Overflow, false),
    ];

    for (opcode, flag, value) in cases {
        let mut cpu = setup_cpu();
        cpu.load(0x8000, &[opcode]);
        cpu.set_status(ProcessorStatus::all());
        cpu.set_flag(flag, !value);

        let decoded = cpu.step().unwrap();

        assert_eq!(cpu.flag(flag), value, "opcode {:02X}", opcode);
        assert_eq!(decoded.cycles, 2, "opcode {:02X}", opcode);

        let mut expected = ProcessorStatus::all();
        expected.set_flag(flag, value);
        assert_eq!(cpu.status(), expected, "opcode {:02X} touched another flag", opcode);
    }
}

#[test]
fn test_decimal_flag_does_not_change_adc() {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[0xF8, 0x18, 0xA9, 0x09, 0x69, 0x01]);

    cpu.run(true, Some(4));

    assert!(cpu.flag(Flag::Decimal));
    assert_eq!(cpu.ac(), 0x0A);
}

#[test]
fn test_nop() {
    let mut cpu = setup_cpu();
    cpu.load(0x8000, &[0xEA]);
    let status = cpu.status();

    let decoded = cpu.step().unwrap();

    assert_eq!(cpu.pc(), 0x8001);
    assert_eq!(cpu.status(), status);
    assert_eq!(cpu.ac(), 0);
    assert_eq!(decoded.cycles, 2);
}
