//! Operand and effective-address resolution.
//!
//! Every byte the resolver touches goes through [`Memory`] and is charged
//! there. The only cycle charged here directly is the index fix-up cycle of
//! the absolute-indexed and `(zp),Y` modes.

use crate::memory::{same_page, Memory};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, strum::Display, strum::EnumIter)]
pub enum AddressingMode {
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    /// `(zp,X)`
    IndexedIndirect,
    /// `(zp),Y`
    IndirectIndexed,
}

impl AddressingMode {
    pub fn operand_bytes(self) -> u16 {
        return match self {
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
            _ => 1,
        }
    }
}

/// When the index fix-up cycle of an indexed mode is charged.
///
/// Loads and arithmetic only pay it when the index carries into the high
/// byte. Stores and read-modify-write instructions always pay it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IndexPenalty {
    OnPageCross,
    Always,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EffectiveLocation {
    /// Immediate operand, already fetched.
    Value(u8),
    Address(u16),
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct IndexRegisters {
    pub x: u8,
    pub y: u8,
}

/// Consumes the operand bytes of `mode` starting at `pc`, leaving `pc` on the
/// next opcode.
///
/// Immediate operands are fetched here and returned as a value rather than
/// as the address of the operand byte.
pub fn resolve(
    mode: AddressingMode,
    pc: &mut u16,
    cycles: &mut u64,
    registers: IndexRegisters,
    memory: &Memory,
    penalty: IndexPenalty,
) -> EffectiveLocation {
    let address = match mode {
        AddressingMode::Immediate => {
            return EffectiveLocation::Value(memory.read_and_advance(pc, cycles))
        }
        AddressingMode::ZeroPage => memory.read_and_advance(pc, cycles) as u16,
        AddressingMode::ZeroPageX => zero_page_indexed(memory, pc, cycles, registers.x),
        AddressingMode::ZeroPageY => zero_page_indexed(memory, pc, cycles, registers.y),
        AddressingMode::Relative => {
            let offset = memory.read_and_advance(pc, cycles) as i8;
            pc.wrapping_add_signed(offset as i16)
        }
        AddressingMode::Absolute => memory.read_word_and_advance(pc, cycles),
        AddressingMode::AbsoluteX => {
            let base = memory.read_word_and_advance(pc, cycles);
            indexed(base, registers.x, cycles, penalty)
        }
        AddressingMode::AbsoluteY => {
            let base = memory.read_word_and_advance(pc, cycles);
            indexed(base, registers.y, cycles, penalty)
        }
        AddressingMode::Indirect => {
            let pointer = memory.read_word_and_advance(pc, cycles);
            memory.read_word(pointer, cycles)
        }
        AddressingMode::IndexedIndirect => {
            let base = memory.read_and_advance(pc, cycles);
            memory.read(base as u16, cycles);
            memory.read_zero_page_word(base.wrapping_add(registers.x), cycles)
        }
        AddressingMode::IndirectIndexed => {
            let pointer = memory.read_and_advance(pc, cycles);
            let base = memory.read_zero_page_word(pointer, cycles);
            indexed(base, registers.y, cycles, penalty)
        }
    };

    return EffectiveLocation::Address(address)
}

// The index add costs a dummy read of the unindexed zero-page address.
fn zero_page_indexed(memory: &Memory, pc: &mut u16, cycles: &mut u64, index: u8) -> u16 {
    let base = memory.read_and_advance(pc, cycles);
    memory.read(base as u16, cycles);
    return base.wrapping_add(index) as u16
}

fn indexed(base: u16, index: u8, cycles: &mut u64, penalty: IndexPenalty) -> u16 {
    let address = base.wrapping_add(index as u16);
    if penalty == IndexPenalty::Always || !same_page(base, address) {
        *cycles += 1;
    }
    return address
}
