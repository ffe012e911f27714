use std::fmt::{Display, Formatter};
use crate::instructions::Operand;
use crate::opcodes::Mnemonic;

/// An opcode byte with no entry in the opcode table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DecodeError {
    pub opcode: u8,
    pub address: u16,
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("illegal opcode {:02X} at {:04X}", self.opcode, self.address))
    }
}

impl std::error::Error for DecodeError {}

/// A store instruction wrote into the stack page.
///
/// Not an error: the write has already happened. Callers that want to treat
/// it as fatal can stop on it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StackBoundaryNotice {
    pub address: u16,
    pub value: u8,
}

impl Display for StackBoundaryNotice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("store of {:02X} into stack page at {:04X}", self.value, self.address))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EncodeError {
    NoSuchOpcode(Mnemonic, Operand),
    Truncated { needed: usize, available: usize },
    Illegal(u8),
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        return match self {
            EncodeError::NoSuchOpcode(mnemonic, operand) => {
                f.write_fmt(format_args!("{} has no form taking {}", mnemonic, operand.mode_name()))
            }
            EncodeError::Truncated { needed, available } => {
                f.write_fmt(format_args!("instruction needs {} bytes, only {} available", needed, available))
            }
            EncodeError::Illegal(byte) => f.write_fmt(format_args!("illegal opcode {:02X}", byte)),
        }
    }
}

impl std::error::Error for EncodeError {}
