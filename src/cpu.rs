use std::collections::VecDeque;
use std::fmt::{Debug, Display, Formatter};
use debug_print::debug_println;
use crate::addressing::{resolve, AddressingMode, EffectiveLocation, IndexPenalty, IndexRegisters};
use crate::disassembler::disassemble_at;
use crate::error::{DecodeError, StackBoundaryNotice};
use crate::instructions::{Instruction, Operand};
use crate::memory::{same_page, Memory, IRQ_VECTOR, MEMORY_SIZE, NMI_VECTOR, RESET_VECTOR};
use crate::opcodes::{lookup, Mnemonic, OpcodeInfo};
use crate::status::{Flag, ProcessorStatus};

/// Cycle count right after the reset sequence.
pub const RESET_CYCLES: u64 = 7;

const POWER_ON_SP: u8 = 0xFD;
const HISTORY_LENGTH: usize = 16;

const ZN: ProcessorStatus = ProcessorStatus::ZERO.union(ProcessorStatus::NEGATIVE);
const CZN: ProcessorStatus = ZN.union(ProcessorStatus::CARRY);
const CVZN: ProcessorStatus = CZN.union(ProcessorStatus::OVERFLOW);
const VZN: ProcessorStatus = ZN.union(ProcessorStatus::OVERFLOW);

/// What a single `step` did.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DecodedOpcode {
    pub address: u16,
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub mode: Option<AddressingMode>,
    pub cycles: u64,
    pub stack_notice: Option<StackBoundaryNotice>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TerminationReason {
    /// A BRK was executed at `address` and the run was asked to stop on it.
    Break { address: u16 },
    InstructionLimit,
    /// The instruction at `address` jumped or branched to itself.
    Trapped { address: u16 },
    DecodeFailed(DecodeError),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Interrupt {
    Irq,
    Nmi,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum IndexRegister {
    X,
    Y,
}

pub struct Cpu {
    pc: u16,
    ac: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: ProcessorStatus,
    cycles: u64,
    memory: Memory,
    history: VecDeque<(u16, Instruction)>,
}

impl Debug for Cpu {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("PC: {:04X}, AC: {:02X}, X: {:02X}, Y: {:02X}, SP: {:02X}, SR: [{}], CYC: {}",
        self.pc,
        self.ac,
        self.x,
        self.y,
        self.sp,
        self.status,
        self.cycles))
    }
}

impl Display for Cpu {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}", self))
    }
}

impl Default for Cpu {
    fn default() -> Self {
        return Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        return Self::with_memory(Memory::new())
    }

    pub fn with_memory(memory: Memory) -> Self {
        return Self {
            pc: 0,
            ac: 0,
            x: 0,
            y: 0,
            sp: POWER_ON_SP,
            status: ProcessorStatus::empty(),
            cycles: 0,
            memory,
            history: VecDeque::with_capacity(HISTORY_LENGTH),
        }
    }

    /// Loads PC from the reset vector. Registers and memory are left as
    /// they are.
    pub fn reset(&mut self) {
        let mut vector_cycles = 0;
        self.pc = self.memory.read_word(RESET_VECTOR, &mut vector_cycles);
        self.cycles = RESET_CYCLES;
        self.status.insert(ProcessorStatus::INTERRUPT_DISABLE);
        self.history.clear();

        debug_println!("Reset to {:04X}", self.pc);
    }

    pub fn replace_memory(&mut self, memory: Memory) {
        self.memory = memory;
    }

    pub fn load_image(&mut self, image: &[u8; MEMORY_SIZE]) {
        self.memory = Memory::from_image(image);
    }

    /// Copies a program or data block into memory without charging cycles.
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        self.memory.load(start, bytes);
    }

    pub fn memory(&self) -> &Memory {
        return &self.memory
    }

    pub fn peek(&self, address: u16) -> u8 {
        return self.memory.peek(address)
    }

    pub fn poke(&mut self, address: u16, value: u8) {
        self.memory.poke(address, value);
    }

    pub fn disassemble_at(&self, address: u16) -> (String, u16) {
        return disassemble_at(&self.memory, address)
    }

    pub fn pc(&self) -> u16 {
        return self.pc
    }

    pub fn ac(&self) -> u8 {
        return self.ac
    }

    pub fn x(&self) -> u8 {
        return self.x
    }

    pub fn y(&self) -> u8 {
        return self.y
    }

    pub fn sp(&self) -> u8 {
        return self.sp
    }

    pub fn status(&self) -> ProcessorStatus {
        return self.status
    }

    pub fn status_byte(&self) -> u8 {
        return self.status.to_byte()
    }

    pub fn flag(&self, flag: Flag) -> bool {
        return self.status.flag(flag)
    }

    pub fn cycles(&self) -> u64 {
        return self.cycles
    }

    // Register setters are for loaders, debuggers and tests.

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    pub fn set_ac(&mut self, ac: u8) {
        self.ac = ac;
    }

    pub fn set_x(&mut self, x: u8) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: u8) {
        self.y = y;
    }

    pub fn set_sp(&mut self, sp: u8) {
        self.sp = sp;
    }

    pub fn set_status(&mut self, status: ProcessorStatus) {
        self.status = status;
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        self.status.set_flag(flag, value);
    }

    /// The last few executed instructions, oldest first.
    pub fn recent_instructions(&self) -> impl Iterator<Item = &(u16, Instruction)> {
        return self.history.iter()
    }

    fn push_history(&mut self, address: u16, info: OpcodeInfo) {
        let operand_bytes = [self.memory.peek(address.wrapping_add(1)), self.memory.peek(address.wrapping_add(2))];
        let instruction = Instruction::new(info.mnemonic, Operand::from_bytes(info.mode, operand_bytes));
        if self.history.len() == HISTORY_LENGTH {
            self.history.pop_front();
        }
        self.history.push_back((address, instruction));
    }

    /// Executes exactly one instruction.
    pub fn step(&mut self) -> Result<DecodedOpcode, DecodeError> {
        let address = self.pc;
        let start_cycles = self.cycles;
        let opcode = self.memory.read_and_advance(&mut self.pc, &mut self.cycles);

        let Some(info) = lookup(opcode) else {
            let error = DecodeError { opcode, address };
            log::warn!("{}", error);
            for (pc, instruction) in self.history.iter() {
                debug_println!("{:04X}: {}", pc, instruction.text_at(*pc));
            }
            return Err(error)
        };

        self.push_history(address, info);
        let stack_notice = self.execute(info);
        if let Some(notice) = stack_notice {
            log::warn!("{:04X}: {}", address, notice);
        }

        let decoded = DecodedOpcode {
            address,
            opcode,
            mnemonic: info.mnemonic,
            mode: info.mode,
            cycles: self.cycles - start_cycles,
            stack_notice,
        };

        debug_println!("{:04X}  {:<16} {} cycles\t{}", address, disassemble_at(&self.memory, address).0, decoded.cycles, self);

        return Ok(decoded)
    }

    /// Steps until a BRK (if `stop_on_break`), the instruction budget runs
    /// out, an instruction traps on itself, or an opcode fails to decode.
    pub fn run(&mut self, stop_on_break: bool, max_instructions: Option<usize>) -> TerminationReason {
        let mut executed = 0;

        loop {
            if max_instructions.is_some_and(|max| executed >= max) {
                return TerminationReason::InstructionLimit
            }

            let decoded = match self.step() {
                Ok(decoded) => decoded,
                Err(e) => return TerminationReason::DecodeFailed(e),
            };
            executed += 1;

            if stop_on_break && decoded.mnemonic == Mnemonic::BRK {
                return TerminationReason::Break { address: decoded.address }
            }
            if self.pc == decoded.address {
                debug_println!("Trap at {:04X} after {} instructions", decoded.address, executed);
                return TerminationReason::Trapped { address: decoded.address }
            }
        }
    }

    /// Requests a hardware interrupt. Returns false if an IRQ was masked by
    /// InterruptDisable; NMI is always taken.
    pub fn interrupt(&mut self, kind: Interrupt) -> bool {
        if kind == Interrupt::Irq && self.status.contains(ProcessorStatus::INTERRUPT_DISABLE) {
            return false
        }

        self.cycles += 2;
        self.push_word(self.pc);
        let pushed = self.status.difference(ProcessorStatus::BREAK).to_byte();
        self.push_byte(pushed);
        self.status.insert(ProcessorStatus::INTERRUPT_DISABLE);

        let vector = match kind {
            Interrupt::Irq => IRQ_VECTOR,
            Interrupt::Nmi => NMI_VECTOR,
        };
        self.pc = self.memory.read_word(vector, &mut self.cycles);

        debug_println!("{:?} to {:04X}", kind, self.pc);
        return true
    }

    fn execute(&mut self, info: OpcodeInfo) -> Option<StackBoundaryNotice> {
        use Mnemonic::*;
        let penalty = info.mnemonic.index_penalty();

        match (info.mnemonic, info.mode) {
            (ADC, Some(mode)) => { let value = self.read_operand(mode); self.adc(value); }
            (SBC, Some(mode)) => { let value = self.read_operand(mode); self.sbc(value); }
            (AND, Some(mode)) => { let value = self.read_operand(mode); self.and(value); }
            (ORA, Some(mode)) => { let value = self.read_operand(mode); self.ora(value); }
            (EOR, Some(mode)) => { let value = self.read_operand(mode); self.eor(value); }
            (BIT, Some(mode)) => { let value = self.read_operand(mode); self.bit(value); }

            (CMP, Some(mode)) => { let value = self.read_operand(mode); self.compare(self.ac, value); }
            (CPX, Some(mode)) => { let value = self.read_operand(mode); self.compare(self.x, value); }
            (CPY, Some(mode)) => { let value = self.read_operand(mode); self.compare(self.y, value); }

            (LDA, Some(mode)) => { self.ac = self.read_operand(mode); self.set_zero_negative(self.ac); }
            (LDX, Some(mode)) => { self.x = self.read_operand(mode); self.set_zero_negative(self.x); }
            (LDY, Some(mode)) => { self.y = self.read_operand(mode); self.set_zero_negative(self.y); }

            (STA, Some(mode)) => return self.store(mode, penalty, self.ac),
            (STX, Some(mode)) => return self.store(mode, penalty, self.x),
            (STY, Some(mode)) => return self.store(mode, penalty, self.y),

            (ASL, None) => { self.cycles += 1; self.ac = self.asl(self.ac); }
            (LSR, None) => { self.cycles += 1; self.ac = self.lsr(self.ac); }
            (ROL, None) => { self.cycles += 1; self.ac = self.rol(self.ac); }
            (ROR, None) => { self.cycles += 1; self.ac = self.ror(self.ac); }
            (ASL, Some(mode)) => return self.modify(mode, penalty, Self::asl),
            (LSR, Some(mode)) => return self.modify(mode, penalty, Self::lsr),
            (ROL, Some(mode)) => return self.modify(mode, penalty, Self::rol),
            (ROR, Some(mode)) => return self.modify(mode, penalty, Self::ror),
            (INC, Some(mode)) => return self.modify(mode, penalty, Self::inc),
            (DEC, Some(mode)) => return self.modify(mode, penalty, Self::dec),

            (INX, None) => self.step_index(IndexRegister::X, 1),
            (INY, None) => self.step_index(IndexRegister::Y, 1),
            (DEX, None) => self.step_index(IndexRegister::X, -1),
            (DEY, None) => self.step_index(IndexRegister::Y, -1),

            (BCC, Some(_)) => self.branch(Flag::Carry, false),
            (BCS, Some(_)) => self.branch(Flag::Carry, true),
            (BNE, Some(_)) => self.branch(Flag::Zero, false),
            (BEQ, Some(_)) => self.branch(Flag::Zero, true),
            (BPL, Some(_)) => self.branch(Flag::Negative, false),
            (BMI, Some(_)) => self.branch(Flag::Negative, true),
            (BVC, Some(_)) => self.branch(Flag::Overflow, false),
            (BVS, Some(_)) => self.branch(Flag::Overflow, true),

            (JMP, Some(mode)) => self.pc = self.effective_address(mode, IndexPenalty::OnPageCross),
            (JSR, Some(_)) => self.jsr(),
            (RTS, None) => self.rts(),
            (BRK, None) => self.brk(),
            (RTI, None) => self.rti(),

            (PHA, None) => { self.cycles += 1; self.push_byte(self.ac); }
            (PHP, None) => { self.cycles += 1; self.push_byte(self.status.union(ProcessorStatus::BREAK).to_byte()); }
            (PLA, None) => { self.cycles += 2; self.ac = self.pull_byte(); self.set_zero_negative(self.ac); }
            (PLP, None) => { self.cycles += 2; let byte = self.pull_byte(); self.restore_status(byte); }

            (TAX, None) => { self.cycles += 1; self.x = self.ac; self.set_zero_negative(self.x); }
            (TAY, None) => { self.cycles += 1; self.y = self.ac; self.set_zero_negative(self.y); }
            (TXA, None) => { self.cycles += 1; self.ac = self.x; self.set_zero_negative(self.ac); }
            (TYA, None) => { self.cycles += 1; self.ac = self.y; self.set_zero_negative(self.ac); }
            (TSX, None) => { self.cycles += 1; self.x = self.sp; self.set_zero_negative(self.x); }
            (TXS, None) => { self.cycles += 1; self.sp = self.x; }

            (CLC, None) => self.write_flag(Flag::Carry, false),
            (SEC, None) => self.write_flag(Flag::Carry, true),
            (CLD, None) => self.write_flag(Flag::Decimal, false),
            (SED, None) => self.write_flag(Flag::Decimal, true),
            (CLI, None) => self.write_flag(Flag::InterruptDisable, false),
            (SEI, None) => self.write_flag(Flag::InterruptDisable, true),
            (CLV, None) => self.write_flag(Flag::Overflow, false),

            (NOP, None) => self.cycles += 1,

            (mnemonic, mode) => unreachable!("opcode table pairs {} with {:?}", mnemonic, mode),
        }

        return None
    }

    fn effective_address(&mut self, mode: AddressingMode, penalty: IndexPenalty) -> u16 {
        let registers = IndexRegisters { x: self.x, y: self.y };
        return match resolve(mode, &mut self.pc, &mut self.cycles, registers, &self.memory, penalty) {
            EffectiveLocation::Address(address) => address,
            EffectiveLocation::Value(_) => unreachable!("{} has no effective address", mode),
        }
    }

    fn read_operand(&mut self, mode: AddressingMode) -> u8 {
        let registers = IndexRegisters { x: self.x, y: self.y };
        return match resolve(mode, &mut self.pc, &mut self.cycles, registers, &self.memory, IndexPenalty::OnPageCross) {
            EffectiveLocation::Value(value) => value,
            EffectiveLocation::Address(address) => self.memory.read(address, &mut self.cycles),
        }
    }

    fn store(&mut self, mode: AddressingMode, penalty: IndexPenalty, value: u8) -> Option<StackBoundaryNotice> {
        let address = self.effective_address(mode, penalty);
        return self.memory.write(address, value, &mut self.cycles)
    }

    /// Read, one internal cycle, write back.
    fn modify(&mut self, mode: AddressingMode, penalty: IndexPenalty, operation: fn(&mut Self, u8) -> u8) -> Option<StackBoundaryNotice> {
        let address = self.effective_address(mode, penalty);
        let value = self.memory.read(address, &mut self.cycles);
        self.cycles += 1;
        let result = operation(self, value);
        return self.memory.write(address, result, &mut self.cycles)
    }

    fn push_byte(&mut self, value: u8) {
        self.memory.push(&mut self.sp, value, &mut self.cycles);
    }

    fn push_word(&mut self, word: u16) {
        let [word_lo, word_hi] = word.to_le_bytes();
        self.push_byte(word_hi);
        self.push_byte(word_lo);
    }

    fn pull_byte(&mut self) -> u8 {
        return self.memory.pull(&mut self.sp, &mut self.cycles)
    }

    fn pull_word(&mut self) -> u16 {
        let word_lo = self.pull_byte();
        let word_hi = self.pull_byte();
        return u16::from_le_bytes([word_lo, word_hi])
    }

    // Break is not a stored flag; pulling the status byte clears it.
    fn restore_status(&mut self, byte: u8) {
        self.status = ProcessorStatus::from_byte(byte).difference(ProcessorStatus::BREAK);
    }

    fn set_zero_negative(&mut self, result: u8) {
        self.status.apply(ZN, ProcessorStatus::zero_negative(result));
    }

    fn write_flag(&mut self, flag: Flag, value: bool) {
        self.cycles += 1;
        self.status.set_flag(flag, value);
    }

    fn adc(&mut self, operand: u8) {
        let carry_in = self.status.flag(Flag::Carry) as i16;
        let unsigned = self.ac as i16 + operand as i16 + carry_in;
        let signed = self.ac as i8 as i16 + operand as i8 as i16 + carry_in;
        self.finish_arithmetic(unsigned as u8, unsigned > 0xFF, signed);
    }

    fn sbc(&mut self, operand: u8) {
        let borrow_in = 1 - self.status.flag(Flag::Carry) as i16;
        let unsigned = self.ac as i16 - operand as i16 - borrow_in;
        let signed = self.ac as i8 as i16 - operand as i8 as i16 - borrow_in;
        self.finish_arithmetic(unsigned as u8, unsigned >= 0, signed);
    }

    // Carry is decided in the 0..=255 domain, overflow in the i8 domain.
    fn finish_arithmetic(&mut self, result: u8, carry: bool, signed: i16) {
        let flags = ProcessorStatus::carry_if(carry)
            | ProcessorStatus::overflow_if(i8::try_from(signed).is_err())
            | ProcessorStatus::zero_negative(result);
        self.status.apply(CVZN, flags);
        self.ac = result;
    }

    fn and(&mut self, operand: u8) {
        self.ac &= operand;
        self.set_zero_negative(self.ac);
    }

    fn ora(&mut self, operand: u8) {
        self.ac |= operand;
        self.set_zero_negative(self.ac);
    }

    fn eor(&mut self, operand: u8) {
        self.ac ^= operand;
        self.set_zero_negative(self.ac);
    }

    fn bit(&mut self, operand: u8) {
        let mut flags = ProcessorStatus::from_byte(operand) & (ProcessorStatus::NEGATIVE | ProcessorStatus::OVERFLOW);
        flags.set(ProcessorStatus::ZERO, self.ac & operand == 0);
        self.status.apply(VZN, flags);
    }

    /// Carry = register >= operand, Zero = equal, Negative = register < operand.
    fn compare(&mut self, register: u8, operand: u8) {
        let mut flags = ProcessorStatus::carry_if(register >= operand);
        flags.set(ProcessorStatus::ZERO, register == operand);
        flags.set(ProcessorStatus::NEGATIVE, register < operand);
        self.status.apply(CZN, flags);
    }

    fn shifted(&mut self, result: u8, carry_out: bool) -> u8 {
        self.status.apply(CZN, ProcessorStatus::carry_if(carry_out) | ProcessorStatus::zero_negative(result));
        return result
    }

    fn asl(&mut self, value: u8) -> u8 {
        return self.shifted(value << 1, value & 0x80 != 0)
    }

    fn lsr(&mut self, value: u8) -> u8 {
        return self.shifted(value >> 1, value & 0x01 != 0)
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = self.status.flag(Flag::Carry) as u8;
        return self.shifted((value << 1) | carry_in, value & 0x80 != 0)
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = self.status.flag(Flag::Carry) as u8;
        return self.shifted((value >> 1) | (carry_in << 7), value & 0x01 != 0)
    }

    fn inc(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_zero_negative(result);
        return result
    }

    fn dec(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_zero_negative(result);
        return result
    }

    fn step_index(&mut self, register: IndexRegister, delta: i8) {
        self.cycles += 1;
        let target = match register {
            IndexRegister::X => &mut self.x,
            IndexRegister::Y => &mut self.y,
        };
        *target = target.wrapping_add_signed(delta);
        let result = *target;
        self.set_zero_negative(result);
    }

    fn branch(&mut self, flag: Flag, expected: bool) {
        let target = self.effective_address(AddressingMode::Relative, IndexPenalty::OnPageCross);
        if self.status.flag(flag) != expected {
            return
        }

        self.cycles += if same_page(target, self.pc) { 1 } else { 2 };
        self.pc = target;
    }

    fn jsr(&mut self) {
        let target = self.effective_address(AddressingMode::Absolute, IndexPenalty::OnPageCross);
        self.cycles += 1;
        self.push_word(self.pc.wrapping_sub(1));
        self.pc = target;
    }

    fn rts(&mut self) {
        self.cycles += 2;
        self.pc = self.pull_word().wrapping_add(1);
        self.cycles += 1;
    }

    fn brk(&mut self) {
        // The byte after BRK is padding.
        self.memory.read_and_advance(&mut self.pc, &mut self.cycles);
        self.push_word(self.pc.wrapping_add(1));
        self.push_byte(self.status.union(ProcessorStatus::BREAK).to_byte());
        self.status.insert(ProcessorStatus::BREAK | ProcessorStatus::INTERRUPT_DISABLE);
        self.pc = self.memory.read_word(IRQ_VECTOR, &mut self.cycles);
    }

    fn rti(&mut self) {
        self.cycles += 2;
        let byte = self.pull_byte();
        self.restore_status(byte);
        self.pc = self.pull_word();
    }
}
