use crate::addressing::{AddressingMode, IndexPenalty};
use crate::addressing::AddressingMode::*;
use Mnemonic::*;

#[derive(strum::Display, strum::EnumString, strum::EnumIter, Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Mnemonic {
    ADC,
    AND,
    ASL,
    BCC,
    BCS,
    BEQ,
    BIT,
    BMI,
    BNE,
    BPL,
    BRK,
    BVC,
    BVS,
    CLC,
    CLD,
    CLI,
    CLV,
    CMP,
    CPX,
    CPY,
    DEC,
    DEX,
    DEY,
    EOR,
    INC,
    INX,
    INY,
    JMP,
    JSR,
    LDA,
    LDX,
    LDY,
    LSR,
    NOP,
    ORA,
    PHA,
    PHP,
    PLA,
    PLP,
    ROL,
    ROR,
    RTI,
    RTS,
    SBC,
    SEC,
    SED,
    SEI,
    STA,
    STX,
    STY,
    TAX,
    TAY,
    TSX,
    TXA,
    TXS,
    TYA
}

impl Mnemonic {
    /// Read-modify-write instructions spend one cycle between the read and
    /// the write.
    pub fn is_read_modify_write(self) -> bool {
        return matches!(self, ASL | LSR | ROL | ROR | INC | DEC)
    }

    pub fn is_store(self) -> bool {
        return matches!(self, STA | STX | STY)
    }

    /// Stores and read-modify-write instructions pay the index cycle even
    /// when no page is crossed.
    pub fn index_penalty(self) -> IndexPenalty {
        return if self.is_store() || self.is_read_modify_write() {
            IndexPenalty::Always
        } else {
            IndexPenalty::OnPageCross
        }
    }
}

/// One row of the opcode table. `mode` is `None` for implied and
/// accumulator forms.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct OpcodeInfo {
    pub mnemonic: Mnemonic,
    pub mode: Option<AddressingMode>,
}

impl OpcodeInfo {
    pub fn operand_bytes(&self) -> u16 {
        return match self.mode {
            None => 0,
            Some(mode) => mode.operand_bytes(),
        }
    }

    pub fn length(&self) -> u16 {
        return 1 + self.operand_bytes()
    }
}

const fn op(mnemonic: Mnemonic, mode: AddressingMode) -> Option<OpcodeInfo> {
    return Some(OpcodeInfo { mnemonic, mode: Some(mode) })
}

const fn imp(mnemonic: Mnemonic) -> Option<OpcodeInfo> {
    return Some(OpcodeInfo { mnemonic, mode: None })
}

const ___: Option<OpcodeInfo> = None;

pub const OPCODE_TABLE: [Option<OpcodeInfo>; 256] = [
//  0                    1                         2                    3    4                    5                    6                    7    8          9                    A          B    C                    D                    E                    F
    imp(BRK),            op(ORA, IndexedIndirect), ___,                 ___, ___,                 op(ORA, ZeroPage),   op(ASL, ZeroPage),   ___, imp(PHP),  op(ORA, Immediate),  imp(ASL),  ___, ___,                 op(ORA, Absolute),   op(ASL, Absolute),   ___,
    op(BPL, Relative),   op(ORA, IndirectIndexed), ___,                 ___, ___,                 op(ORA, ZeroPageX),  op(ASL, ZeroPageX),  ___, imp(CLC),  op(ORA, AbsoluteY),  ___,       ___, ___,                 op(ORA, AbsoluteX),  op(ASL, AbsoluteX),  ___,
    op(JSR, Absolute),   op(AND, IndexedIndirect), ___,                 ___, op(BIT, ZeroPage),   op(AND, ZeroPage),   op(ROL, ZeroPage),   ___, imp(PLP),  op(AND, Immediate),  imp(ROL),  ___, op(BIT, Absolute),   op(AND, Absolute),   op(ROL, Absolute),   ___,
    op(BMI, Relative),   op(AND, IndirectIndexed), ___,                 ___, ___,                 op(AND, ZeroPageX),  op(ROL, ZeroPageX),  ___, imp(SEC),  op(AND, AbsoluteY),  ___,       ___, ___,                 op(AND, AbsoluteX),  op(ROL, AbsoluteX),  ___,
    imp(RTI),            op(EOR, IndexedIndirect), ___,                 ___, ___,                 op(EOR, ZeroPage),   op(LSR, ZeroPage),   ___, imp(PHA),  op(EOR, Immediate),  imp(LSR),  ___, op(JMP, Absolute),   op(EOR, Absolute),   op(LSR, Absolute),   ___,
    op(BVC, Relative),   op(EOR, IndirectIndexed), ___,                 ___, ___,                 op(EOR, ZeroPageX),  op(LSR, ZeroPageX),  ___, imp(CLI),  op(EOR, AbsoluteY),  ___,       ___, ___,                 op(EOR, AbsoluteX),  op(LSR, AbsoluteX),  ___,
    imp(RTS),            op(ADC, IndexedIndirect), ___,                 ___, ___,                 op(ADC, ZeroPage),   op(ROR, ZeroPage),   ___, imp(PLA),  op(ADC, Immediate),  imp(ROR),  ___, op(JMP, Indirect),   op(ADC, Absolute),   op(ROR, Absolute),   ___,
    op(BVS, Relative),   op(ADC, IndirectIndexed), ___,                 ___, ___,                 op(ADC, ZeroPageX),  op(ROR, ZeroPageX),  ___, imp(SEI),  op(ADC, AbsoluteY),  ___,       ___, ___,                 op(ADC, AbsoluteX),  op(ROR, AbsoluteX),  ___,

    ___,                 op(STA, IndexedIndirect), ___,                 ___, op(STY, ZeroPage),   op(STA, ZeroPage),   op(STX, ZeroPage),   ___, imp(DEY),  ___,                 imp(TXA),  ___, op(STY, Absolute),   op(STA, Absolute),   op(STX, Absolute),   ___,
    op(BCC, Relative),   op(STA, IndirectIndexed), ___,                 ___, op(STY, ZeroPageX),  op(STA, ZeroPageX),  op(STX, ZeroPageY),  ___, imp(TYA),  op(STA, AbsoluteY),  imp(TXS),  ___, ___,                 op(STA, AbsoluteX),  ___,                 ___,
    op(LDY, Immediate),  op(LDA, IndexedIndirect), op(LDX, Immediate),  ___, op(LDY, ZeroPage),   op(LDA, ZeroPage),   op(LDX, ZeroPage),   ___, imp(TAY),  op(LDA, Immediate),  imp(TAX),  ___, op(LDY, Absolute),   op(LDA, Absolute),   op(LDX, Absolute),   ___,
    op(BCS, Relative),   op(LDA, IndirectIndexed), ___,                 ___, op(LDY, ZeroPageX),  op(LDA, ZeroPageX),  op(LDX, ZeroPageY),  ___, imp(CLV),  op(LDA, AbsoluteY),  imp(TSX),  ___, op(LDY, AbsoluteX),  op(LDA, AbsoluteX),  op(LDX, AbsoluteY),  ___,
    op(CPY, Immediate),  op(CMP, IndexedIndirect), ___,                 ___, op(CPY, ZeroPage),   op(CMP, ZeroPage),   op(DEC, ZeroPage),   ___, imp(INY),  op(CMP, Immediate),  imp(DEX),  ___, op(CPY, Absolute),   op(CMP, Absolute),   op(DEC, Absolute),   ___,
    op(BNE, Relative),   op(CMP, IndirectIndexed), ___,                 ___, ___,                 op(CMP, ZeroPageX),  op(DEC, ZeroPageX),  ___, imp(CLD),  op(CMP, AbsoluteY),  ___,       ___, ___,                 op(CMP, AbsoluteX),  op(DEC, AbsoluteX),  ___,
    op(CPX, Immediate),  op(SBC, IndexedIndirect), ___,                 ___, op(CPX, ZeroPage),   op(SBC, ZeroPage),   op(INC, ZeroPage),   ___, imp(INX),  op(SBC, Immediate),  imp(NOP),  ___, op(CPX, Absolute),   op(SBC, Absolute),   op(INC, Absolute),   ___,
    op(BEQ, Relative),   op(SBC, IndirectIndexed), ___,                 ___, ___,                 op(SBC, ZeroPageX),  op(INC, ZeroPageX),  ___, imp(SED),  op(SBC, AbsoluteY),  ___,       ___, ___,                 op(SBC, AbsoluteX),  op(INC, AbsoluteX),  ___,
];

pub fn lookup(opcode: u8) -> Option<OpcodeInfo> {
    return OPCODE_TABLE[opcode as usize]
}

/// Reverse lookup used by the encoder.
pub fn find_opcode(mnemonic: Mnemonic, mode: Option<AddressingMode>) -> Option<u8> {
    return OPCODE_TABLE.iter()
        .position(|entry| *entry == Some(OpcodeInfo { mnemonic, mode }))
        .map(|index| index as u8)
}
