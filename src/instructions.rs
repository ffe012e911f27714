use std::fmt::{Display, Formatter};
use crate::addressing::AddressingMode;
use crate::error::EncodeError;
use crate::opcodes::{find_opcode, lookup, Mnemonic};

/// A decoded operand, carrying its raw value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Operand {
    Impl,
    Imm(u8),
    Zpg(u8),
    ZpgX(u8),
    ZpgY(u8),
    Rel(i8),
    Abs(u16),
    AbsX(u16),
    AbsY(u16),
    Ind(u16),
    XInd(u8),
    IndY(u8),
}

impl Operand {
    pub fn mode(&self) -> Option<AddressingMode> {
        return match self {
            Operand::Impl => None,
            Operand::Imm(_) => Some(AddressingMode::Immediate),
            Operand::Zpg(_) => Some(AddressingMode::ZeroPage),
            Operand::ZpgX(_) => Some(AddressingMode::ZeroPageX),
            Operand::ZpgY(_) => Some(AddressingMode::ZeroPageY),
            Operand::Rel(_) => Some(AddressingMode::Relative),
            Operand::Abs(_) => Some(AddressingMode::Absolute),
            Operand::AbsX(_) => Some(AddressingMode::AbsoluteX),
            Operand::AbsY(_) => Some(AddressingMode::AbsoluteY),
            Operand::Ind(_) => Some(AddressingMode::Indirect),
            Operand::XInd(_) => Some(AddressingMode::IndexedIndirect),
            Operand::IndY(_) => Some(AddressingMode::IndirectIndexed),
        }
    }

    pub fn mode_name(&self) -> String {
        return match self.mode() {
            Some(mode) => mode.to_string(),
            None => String::from("Implied"),
        }
    }

    /// Builds the operand for `mode` from the little-endian bytes that follow
    /// the opcode.
    pub fn from_bytes(mode: Option<AddressingMode>, bytes: [u8; 2]) -> Self {
        let byte = bytes[0];
        let word = u16::from_le_bytes(bytes);
        return match mode {
            None => Operand::Impl,
            Some(AddressingMode::Immediate) => Operand::Imm(byte),
            Some(AddressingMode::ZeroPage) => Operand::Zpg(byte),
            Some(AddressingMode::ZeroPageX) => Operand::ZpgX(byte),
            Some(AddressingMode::ZeroPageY) => Operand::ZpgY(byte),
            Some(AddressingMode::Relative) => Operand::Rel(byte as i8),
            Some(AddressingMode::Absolute) => Operand::Abs(word),
            Some(AddressingMode::AbsoluteX) => Operand::AbsX(word),
            Some(AddressingMode::AbsoluteY) => Operand::AbsY(word),
            Some(AddressingMode::Indirect) => Operand::Ind(word),
            Some(AddressingMode::IndexedIndirect) => Operand::XInd(byte),
            Some(AddressingMode::IndirectIndexed) => Operand::IndY(byte),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        return match *self {
            Operand::Impl => vec![],
            Operand::Imm(v) | Operand::Zpg(v) | Operand::ZpgX(v) | Operand::ZpgY(v)
            | Operand::XInd(v) | Operand::IndY(v) => vec![v],
            Operand::Rel(v) => vec![v as u8],
            Operand::Abs(v) | Operand::AbsX(v) | Operand::AbsY(v) | Operand::Ind(v) => v.to_le_bytes().to_vec(),
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Operand::*;
        return match self {
            Impl => f.write_str(""),
            Imm(v) => f.write_fmt(format_args!("#${:02X}", v)),
            Zpg(v) => f.write_fmt(format_args!("${:02X}", v)),
            ZpgX(v) => f.write_fmt(format_args!("${:02X},X", v)),
            ZpgY(v) => f.write_fmt(format_args!("${:02X},Y", v)),
            Rel(v) => if *v >= 0 {
                f.write_fmt(format_args!("*+{}", v))
            } else {
                f.write_fmt(format_args!("*-{}", v.unsigned_abs()))
            },
            Abs(v) => f.write_fmt(format_args!("${:04X}", v)),
            AbsX(v) => f.write_fmt(format_args!("${:04X},X", v)),
            AbsY(v) => f.write_fmt(format_args!("${:04X},Y", v)),
            Ind(v) => f.write_fmt(format_args!("(${:04X})", v)),
            XInd(v) => f.write_fmt(format_args!("(${:02X},X)", v)),
            IndY(v) => f.write_fmt(format_args!("(${:02X}),Y", v)),
        }
    }
}

/// A single instruction in typed form. Used for listing and assembling
/// snippets; execution goes through the opcode table directly.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Instruction {
    mnemonic: Mnemonic,
    operand: Operand,
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        return match self.operand {
            Operand::Impl if self.uses_accumulator() => f.write_fmt(format_args!("{} A", self.mnemonic)),
            Operand::Impl => f.write_fmt(format_args!("{}", self.mnemonic)),
            operand => f.write_fmt(format_args!("{} {}", self.mnemonic, operand)),
        }
    }
}

impl Instruction {
    pub fn new(mnemonic: Mnemonic, operand: Operand) -> Self {
        return Self { mnemonic, operand }
    }

    pub fn mnemonic(&self) -> Mnemonic {
        return self.mnemonic
    }

    pub fn operand(&self) -> Operand {
        return self.operand
    }

    fn uses_accumulator(&self) -> bool {
        return matches!(self.mnemonic, Mnemonic::ASL | Mnemonic::LSR | Mnemonic::ROL | Mnemonic::ROR)
    }

    pub fn opcode(&self) -> Result<u8, EncodeError> {
        return find_opcode(self.mnemonic, self.operand.mode())
            .ok_or(EncodeError::NoSuchOpcode(self.mnemonic, self.operand))
    }

    pub fn len(&self) -> u16 {
        return 1 + self.operand.mode().map_or(0, AddressingMode::operand_bytes)
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut bytes = vec![self.opcode()?];
        bytes.extend(self.operand.to_bytes());
        return Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, EncodeError> {
        let opcode_byte = *bytes.first().ok_or(EncodeError::Truncated { needed: 1, available: 0 })?;
        let info = lookup(opcode_byte).ok_or(EncodeError::Illegal(opcode_byte))?;

        let needed = info.length() as usize;
        if bytes.len() < needed {
            return Err(EncodeError::Truncated { needed, available: bytes.len() })
        }

        let mut operand_bytes = [0u8; 2];
        operand_bytes[..needed - 1].copy_from_slice(&bytes[1..needed]);
        return Ok(Self::new(info.mnemonic, Operand::from_bytes(info.mode, operand_bytes)))
    }

    /// Text for an instruction located at `address`. Branch targets are
    /// shown as absolute addresses.
    pub fn text_at(&self, address: u16) -> String {
        return match self.operand {
            Operand::Rel(offset) => {
                let target = address.wrapping_add(self.len()).wrapping_add_signed(offset as i16);
                format!("{} ${:04X}", self.mnemonic, target)
            }
            _ => self.to_string(),
        }
    }
}
