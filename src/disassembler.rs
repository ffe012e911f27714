use crate::error::EncodeError;
use crate::instructions::{Instruction, Operand};
use crate::memory::Memory;
use crate::opcodes::lookup;

/// Walks a byte slice that is mapped at `origin`.
pub struct Decoder<'a> {
    data: &'a [u8],
    origin: u16,
    pointer: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8], origin: u16) -> Self {
        return Self {
            data,
            origin,
            pointer: 0,
        }
    }

    fn address(&self) -> u16 {
        return self.origin.wrapping_add(self.pointer as u16)
    }

    pub fn read_instruction(&mut self) -> Result<(u16, Instruction), EncodeError> {
        let address = self.address();
        let rest = self.data.get(self.pointer..).unwrap_or(&[]);
        let instruction = Instruction::decode(rest)?;
        self.pointer += instruction.len() as usize;
        return Ok((address, instruction))
    }

    /// Decodes until the end of the slice. On failure the instructions
    /// decoded so far are returned with the error.
    pub fn disassemble(&mut self) -> Result<Vec<(u16, Instruction)>, (Vec<(u16, Instruction)>, EncodeError)> {
        let mut stream = Vec::new();

        while self.pointer < self.data.len() {
            match self.read_instruction() {
                Ok(entry) => stream.push(entry),
                Err(e) => return Err((stream, e)),
            };
        }

        return Ok(stream)
    }
}

/// Display text for the instruction at `address` and its length in bytes.
/// Reads with `peek`, so the cycle count is untouched.
pub fn disassemble_at(memory: &Memory, address: u16) -> (String, u16) {
    let opcode_byte = memory.peek(address);
    let Some(info) = lookup(opcode_byte) else {
        return (format!(".byte ${:02X}", opcode_byte), 1)
    };

    let operand_bytes = [memory.peek(address.wrapping_add(1)), memory.peek(address.wrapping_add(2))];
    let instruction = Instruction::new(info.mnemonic, Operand::from_bytes(info.mode, operand_bytes));
    return (instruction.text_at(address), info.length())
}

/// `count` listing lines starting at `start`: address, raw bytes, text.
pub fn listing(memory: &Memory, start: u16, count: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(count);
    let mut address = start;

    for _ in 0..count {
        let (text, length) = disassemble_at(memory, address);
        let raw = (0..length)
            .map(|i| format!("{:02X}", memory.peek(address.wrapping_add(i))))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("{:04X}  {:<8}  {}", address, raw, text));
        address = address.wrapping_add(length);
    }

    return lines
}
